//! Turn raw listing tiles into [`ListingEntry`] values.

use super::compile_selector;
use crate::config::ListingSelectors;
use crate::error::{Result, TrackerError};
use crate::models::{ListingEntry, UrlMetadata};
use crate::utils::{absolutize_link, normalize_text};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument, warn};

/// Compiled form of [`ListingSelectors`].
pub struct ListingExtractor {
    title: Selector,
    date: Selector,
    day: Selector,
    month: Selector,
    link_attribute: String,
    meta: UrlMetadata,
}

impl ListingExtractor {
    pub fn new(selectors: &ListingSelectors, meta: UrlMetadata) -> Result<Self> {
        Ok(Self {
            title: compile_selector(&selectors.title)?,
            date: compile_selector(&selectors.date)?,
            day: compile_selector(&selectors.day)?,
            month: compile_selector(&selectors.month)?,
            link_attribute: selectors.link_attribute.clone(),
            meta,
        })
    }

    /// Extract every well-formed tile.
    ///
    /// Tiles with a missing node or an empty field are logged and skipped;
    /// the rest of the batch is unaffected. Output order follows input order.
    #[instrument(level = "info", skip_all, fields(tiles = raw_items.len()))]
    pub fn extract(&self, raw_items: &[String]) -> Vec<ListingEntry> {
        let mut entries = Vec::with_capacity(raw_items.len());
        for (index, raw) in raw_items.iter().enumerate() {
            match self.extract_one(raw) {
                Ok(Some(entry)) => {
                    debug!(index, title = %entry.title, date = %entry.date, "Extracted listing entry");
                    entries.push(entry);
                }
                Ok(None) => warn!(index, "Incomplete data found, skipping entry"),
                Err(e) => warn!(index, error = %e, "Error extracting data"),
            }
        }
        info!(count = entries.len(), skipped = raw_items.len() - entries.len(), "Extracted listing entries");
        entries
    }

    /// `Err` when a node is missing, `Ok(None)` when a field is empty.
    fn extract_one(&self, raw: &str) -> Result<Option<ListingEntry>> {
        let fragment = Html::parse_fragment(raw);
        let item = fragment
            .root_element()
            .children()
            .find_map(ElementRef::wrap)
            .ok_or(TrackerError::MissingElement("listing item"))?;

        let title = item
            .select(&self.title)
            .next()
            .map(element_text)
            .ok_or(TrackerError::MissingElement("title"))?;

        let href = item
            .value()
            .attr(&self.link_attribute)
            .map(str::trim)
            .ok_or(TrackerError::MissingElement("link"))?;

        let date_block = item
            .select(&self.date)
            .next()
            .ok_or(TrackerError::MissingElement("date"))?;
        let day = date_block
            .select(&self.day)
            .next()
            .map(element_text)
            .ok_or(TrackerError::MissingElement("day"))?;
        let month = date_block
            .select(&self.month)
            .next()
            .map(element_text)
            .ok_or(TrackerError::MissingElement("month"))?;

        if title.is_empty() || href.is_empty() || day.is_empty() || month.is_empty() {
            return Ok(None);
        }

        let date = match self.meta.year {
            Some(year) => format!("{}/{}/{}", day, month, year),
            None => format!("{}/{}", day, month),
        };

        Ok(Some(ListingEntry {
            title,
            link: absolutize_link(&self.meta.main_domain, href),
            date,
        }))
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    normalize_text(&element.text().collect::<String>())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(href: &str, title: &str, day: &str, month: &str) -> String {
        format!(
            r#"<a href="{href}">
                 <div class="press-releases-v4__hit-date">
                   <span class="press-releases-v4__hit-date-day">{day}</span>
                   <span class="press-releases-v4__hit-date-month">{month}</span>
                 </div>
                 <h3>{title}</h3>
               </a>"#
        )
    }

    fn extractor(year: Option<i32>) -> ListingExtractor {
        let meta = UrlMetadata {
            main_domain: "https://www.proofpoint.com".to_string(),
            year,
        };
        ListingExtractor::new(&ListingSelectors::default(), meta).unwrap()
    }

    #[test]
    fn test_extract_full_tile() {
        let raw = vec![tile("/us/newsroom/press-releases/acme", " Acme\n  ships widget ", "05", "January")];

        let entries = extractor(Some(2024)).extract(&raw);

        assert_eq!(
            entries,
            vec![ListingEntry {
                title: "Acme ships widget".to_string(),
                link: "https://www.proofpoint.com/us/newsroom/press-releases/acme".to_string(),
                date: "05/January/2024".to_string(),
            }]
        );
    }

    #[test]
    fn test_extract_without_year() {
        let raw = vec![tile("/a", "Title", "12", "March")];
        let entries = extractor(None).extract(&raw);
        assert_eq!(entries[0].date, "12/March");
    }

    #[test]
    fn test_extract_skips_tiles_missing_fields() {
        let missing_title = r#"<a href="/b">
              <div class="press-releases-v4__hit-date">
                <span class="press-releases-v4__hit-date-day">02</span>
                <span class="press-releases-v4__hit-date-month">May</span>
              </div>
            </a>"#
            .to_string();
        let missing_link = r#"<a>
              <div class="press-releases-v4__hit-date">
                <span class="press-releases-v4__hit-date-day">03</span>
                <span class="press-releases-v4__hit-date-month">May</span>
              </div>
              <h3>No link</h3>
            </a>"#
            .to_string();
        let missing_date = r#"<a href="/d"><h3>No date</h3></a>"#.to_string();
        let raw = vec![
            tile("/a", "First", "01", "May"),
            missing_title,
            missing_link,
            missing_date,
            tile("/e", "Last", "04", "May"),
        ];

        let entries = extractor(Some(2024)).extract(&raw);

        let titles: Vec<&str> = entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Last"]);
    }

    #[test]
    fn test_extract_skips_empty_fields() {
        let raw = vec![tile("/a", "   ", "01", "May"), tile("/b", "Kept", "02", "May"), tile("/c", "No day", "", "May")];

        let entries = extractor(Some(2024)).extract(&raw);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Kept");
    }

    #[test]
    fn test_extract_garbage_input() {
        let raw = vec!["plain text, no markup".to_string(), String::new()];
        assert!(extractor(Some(2024)).extract(&raw).is_empty());
    }

    #[test]
    fn test_extract_keeps_absolute_link() {
        let raw = vec![tile("https://investors.example.com/release/1", "Abs", "09", "June")];
        let entries = extractor(Some(2024)).extract(&raw);
        assert_eq!(entries[0].link, "https://investors.example.com/release/1");
    }
}
