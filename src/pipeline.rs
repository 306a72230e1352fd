//! One watcher run: listing → new entries → detail pages → store.
//!
//! The run is strictly sequential. Every new entry costs one blocking
//! round trip to its detail page, in listing order.

use crate::config::{OnFailure, TrackerConfig};
use crate::error::Result;
use crate::models::StoreRecord;
use crate::resolver::resolve_new_entries;
use crate::scrapers::article::ArticleScraper;
use crate::scrapers::extract::ListingExtractor;
use crate::scrapers::listing::{ListingSource, fetch_listing};
use crate::store::JsonStore;
use crate::utils::{parse_url_metadata, truncate_for_log};
use tracing::{debug, error, info, instrument, warn};

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub scraped: usize,
    pub new_entries: usize,
    /// New entries stored without article text because their page failed.
    pub failed_details: usize,
    pub stored: usize,
    /// Whether the store file was rewritten.
    pub saved: bool,
}

/// Run the watcher once.
///
/// # Errors
///
/// Reading a corrupt store, and any failure the configured
/// [`FailurePolicy`](crate::config::FailurePolicy) marks as fatal. An empty
/// listing is not an error; the store is then left untouched.
#[instrument(level = "info", skip_all, fields(listing_url = %config.listing_url))]
pub async fn run<S: ListingSource>(
    config: &TrackerConfig,
    source: &S,
    articles: &ArticleScraper,
    store: &JsonStore,
) -> Result<RunSummary> {
    let mut summary = RunSummary::default();

    let stored = store.read().await?;
    let meta = parse_url_metadata(&config.listing_url);
    debug!(main_domain = %meta.main_domain, year = ?meta.year, "Parsed listing URL");
    let extractor = ListingExtractor::new(&config.listing.selectors, meta)?;

    let raw_items = fetch_listing(source, &config.listing_url, &config.listing).await;
    let scraped = extractor.extract(&raw_items);
    summary.scraped = scraped.len();
    if scraped.is_empty() {
        info!("No data extracted");
        summary.stored = stored.len();
        return Ok(summary);
    }
    info!(count = scraped.len(), "Scraped press releases successfully");

    let new_entries = resolve_new_entries(&stored, &scraped, config.policy.date_parse)?;
    summary.new_entries = new_entries.len();
    info!(count = new_entries.len(), "New entries found");

    let mut merged: Vec<StoreRecord> = Vec::with_capacity(new_entries.len() + stored.len());
    for entry in new_entries {
        let content = match articles.scrape(&entry.link).await {
            Ok(Some(details)) => {
                debug!(
                    link = %entry.link,
                    page_title = ?details.title,
                    page_date = ?details.date,
                    image_url = ?details.image_url,
                    "Scraped article details"
                );
                details.content.unwrap_or_default()
            }
            Ok(None) => {
                warn!(link = %entry.link, "No article details found");
                String::new()
            }
            Err(e) if config.policy.detail_fetch == OnFailure::Skip => {
                warn!(link = %entry.link, error = %e, "Article fetch failed; storing without content");
                summary.failed_details += 1;
                String::new()
            }
            Err(e) => {
                error!(link = %entry.link, error = %e, "Article fetch failed");
                return Err(e);
            }
        };
        debug!(link = %entry.link, preview = %truncate_for_log(&content, 120), "Article content");
        merged.push(entry.into_record(content));
    }
    merged.extend(stored);
    summary.stored = merged.len();

    match store.write(&merged).await {
        Ok(()) => summary.saved = true,
        Err(e) if config.policy.persistence == OnFailure::Skip => {
            error!(path = %store.path().display(), error = %e, "Failed to save data to store");
        }
        Err(e) => return Err(e),
    }

    Ok(summary)
}
