//! Helpers for URLs, listing dates and scraped text.
//!
//! - URL metadata used to absolutise listing links and fill in the year
//! - Parsing of `DD/Month/YYYY` listing dates
//! - Whitespace normalisation and log truncation for scraped text

use crate::error::{Result, TrackerError};
use crate::models::UrlMetadata;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;
use url::Url;

/// Format of a complete listing date, e.g. `05/January/2024`.
pub const LISTING_DATE_FORMAT: &str = "%d/%B/%Y";

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

/// Split a listing URL into its base domain and optional `year` parameter.
///
/// The domain is `scheme://host[:port]`; path, query and fragment are dropped.
/// `year` is taken from the first `year` query value when it is all ASCII
/// digits. A URL that does not parse yields an empty domain and no year.
///
/// # Examples
///
/// ```ignore
/// let meta = parse_url_metadata("https://www.proofpoint.com/us/newsroom/press-releases?year=2024");
/// assert_eq!(meta.main_domain, "https://www.proofpoint.com");
/// assert_eq!(meta.year, Some(2024));
/// ```
pub fn parse_url_metadata(url: &str) -> UrlMetadata {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(%url, error = %e, "Listing URL does not parse; links will be left relative");
            return UrlMetadata {
                main_domain: String::new(),
                year: None,
            };
        }
    };

    let host = parsed.host_str().unwrap_or_default();
    let main_domain = match parsed.port() {
        Some(port) => format!("{}://{}:{}", parsed.scheme(), host, port),
        None => format!("{}://{}", parsed.scheme(), host),
    }
    .trim_end_matches('/')
    .to_string();

    let year = parsed
        .query_pairs()
        .find(|(key, _)| key == "year")
        .and_then(|(_, value)| {
            if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
                value.parse::<i32>().ok()
            } else {
                None
            }
        });

    UrlMetadata { main_domain, year }
}

/// Parse a listing date such as `05/January/2024`.
///
/// The month must be the full English month name, in any letter case, and
/// the year must be present; `05/Jan/2024` and `05/January` fail.
pub fn parse_listing_date(date: &str) -> Result<NaiveDate> {
    let trimmed = date.trim();
    let bad_date = |reason: String| TrackerError::Date {
        date: date.to_string(),
        reason,
    };

    // chrono's %B also takes abbreviations; only full names are valid here.
    if let Some(month) = trimmed.split('/').nth(1) {
        if !MONTH_NAMES.iter().any(|name| name.eq_ignore_ascii_case(month)) {
            return Err(bad_date(format!("{month:?} is not a full month name")));
        }
    }

    NaiveDate::parse_from_str(trimmed, LISTING_DATE_FORMAT).map_err(|e| bad_date(e.to_string()))
}

/// Join a relative link onto the listing's base domain.
///
/// Links that are already absolute are returned unchanged.
pub fn absolutize_link(main_domain: &str, href: &str) -> String {
    if Url::parse(href).is_ok() {
        return href.to_string();
    }
    if href.starts_with('/') || main_domain.is_empty() {
        format!("{}{}", main_domain, href)
    } else {
        format!("{}/{}", main_domain, href)
    }
}

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn normalize_text(s: &str) -> String {
    WHITESPACE.replace_all(s.trim(), " ").into_owned()
}

/// Truncate a string for logging purposes.
///
/// Strings longer than `max` bytes are cut at the nearest character
/// boundary and get `"…(+N bytes)"` appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_url_metadata_with_year() {
        let meta = parse_url_metadata("https://www.proofpoint.com/us/newsroom/press-releases?year=2024");
        assert_eq!(meta.main_domain, "https://www.proofpoint.com");
        assert_eq!(meta.year, Some(2024));
    }

    #[test]
    fn test_parse_url_metadata_without_year() {
        let meta = parse_url_metadata("https://www.proofpoint.com/us/newsroom/press-releases/");
        assert_eq!(meta.main_domain, "https://www.proofpoint.com");
        assert_eq!(meta.year, None);
    }

    #[test]
    fn test_parse_url_metadata_non_numeric_year() {
        assert_eq!(parse_url_metadata("https://example.com/news?year=latest").year, None);
        assert_eq!(parse_url_metadata("https://example.com/news?year=-2024").year, None);
        assert_eq!(parse_url_metadata("https://example.com/news?year=").year, None);
    }

    #[test]
    fn test_parse_url_metadata_keeps_port() {
        let meta = parse_url_metadata("http://127.0.0.1:8080/newsroom?page=2&year=2023");
        assert_eq!(meta.main_domain, "http://127.0.0.1:8080");
        assert_eq!(meta.year, Some(2023));
    }

    #[test]
    fn test_parse_url_metadata_malformed() {
        let meta = parse_url_metadata("not a url");
        assert_eq!(meta.main_domain, "");
        assert_eq!(meta.year, None);
    }

    #[test]
    fn test_parse_listing_date() {
        let date = parse_listing_date("05/January/2024").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert!(parse_listing_date("20/December/2023").unwrap() < date);
    }

    #[test]
    fn test_parse_listing_date_rejects_incomplete() {
        assert!(matches!(parse_listing_date("05/January"), Err(TrackerError::Date { .. })));
        assert!(parse_listing_date("05/Janvier/2024").is_err());
        assert!(parse_listing_date("").is_err());
    }

    #[test]
    fn test_parse_listing_date_requires_full_month_name() {
        assert!(matches!(parse_listing_date("05/Jan/2024"), Err(TrackerError::Date { .. })));
        assert!(parse_listing_date("05/Sept/2024").is_err());
        assert_eq!(
            parse_listing_date("05/january/2024").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
        );
        assert_eq!(
            parse_listing_date("05/MAY/2024").unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 5).unwrap()
        );
    }

    #[test]
    fn test_absolutize_link() {
        assert_eq!(
            absolutize_link("https://example.com", "/us/newsroom/a"),
            "https://example.com/us/newsroom/a"
        );
        assert_eq!(absolutize_link("https://example.com", "us/a"), "https://example.com/us/a");
        assert_eq!(
            absolutize_link("https://example.com", "https://other.org/a"),
            "https://other.org/a"
        );
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  Acme\n   ships\twidget "), "Acme ships widget");
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("Hello, world!", 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_char_boundary() {
        let result = truncate_for_log("ééé", 3);
        assert_eq!(result, "é…(+4 bytes)");
    }
}
