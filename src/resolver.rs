//! Decide which scraped listing entries have not been seen before.
//!
//! Novelty is decided by date alone: an entry is new when its date is
//! strictly later than the watermark, the latest date already in the store.
//! Two releases published on the watermark day are therefore treated as
//! already seen.

use crate::config::OnFailure;
use crate::error::Result;
use crate::models::{ListingEntry, StoreRecord};
use crate::utils::parse_listing_date;
use chrono::NaiveDate;
use tracing::{debug, info, instrument, warn};

/// Latest date among the stored records, or `None` for an empty store.
///
/// Under [`OnFailure::Skip`] records with unparseable dates are ignored;
/// under [`OnFailure::Abort`] the first one is returned as an error.
pub fn watermark(store: &[StoreRecord], on_bad_date: OnFailure) -> Result<Option<NaiveDate>> {
    let mut latest: Option<NaiveDate> = None;
    for record in store {
        let date = match parse_listing_date(&record.date) {
            Ok(date) => date,
            Err(e) if on_bad_date == OnFailure::Skip => {
                warn!(link = %record.link, error = %e, "Ignoring stored record with unparseable date");
                continue;
            }
            Err(e) => return Err(e),
        };
        latest = Some(latest.map_or(date, |current| current.max(date)));
    }
    Ok(latest)
}

/// Return the subsequence of `scraped` that is newer than everything in `store`.
///
/// An empty store returns the whole batch. Input order is preserved.
///
/// # Errors
///
/// Under [`OnFailure::Abort`], the first date (stored or scraped) that does
/// not parse as `DD/Month/YYYY`.
#[instrument(level = "info", skip_all, fields(stored = store.len(), scraped = scraped.len()))]
pub fn resolve_new_entries(
    store: &[StoreRecord],
    scraped: &[ListingEntry],
    on_bad_date: OnFailure,
) -> Result<Vec<ListingEntry>> {
    if store.is_empty() {
        info!(count = scraped.len(), "Empty store; every scraped entry is new");
        return Ok(scraped.to_vec());
    }

    let Some(latest) = watermark(store, on_bad_date)? else {
        warn!("No stored record has a usable date; treating every scraped entry as new");
        return Ok(scraped.to_vec());
    };
    debug!(%latest, "Computed watermark");

    let mut fresh = Vec::new();
    for entry in scraped {
        let date = match parse_listing_date(&entry.date) {
            Ok(date) => date,
            Err(e) if on_bad_date == OnFailure::Skip => {
                warn!(link = %entry.link, error = %e, "Skipping scraped entry with unparseable date");
                continue;
            }
            Err(e) => return Err(e),
        };
        if date > latest {
            fresh.push(entry.clone());
        }
    }

    info!(count = fresh.len(), %latest, "Resolved new entries");
    Ok(fresh)
}
