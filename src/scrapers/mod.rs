//! Scrapers for the newsroom's listing and detail pages.
//!
//! Scraping happens in two stages:
//!
//! 1. **Listing**: a browser session renders the listing page and hands back
//!    the outer HTML of each press-release tile ([`listing`]), which is then
//!    turned into [`ListingEntry`](crate::models::ListingEntry) values
//!    ([`extract`]).
//! 2. **Detail**: each new entry's page is fetched over plain HTTP and its
//!    body text extracted ([`article`]).
//!
//! Every selector comes from the configured
//! [`ListingSelectors`](crate::config::ListingSelectors) and
//! [`ArticleSelectors`](crate::config::ArticleSelectors); nothing here names
//! the site's markup directly.

use crate::error::{Result, TrackerError};
use scraper::Selector;

pub mod article;
pub mod extract;
pub mod listing;

/// Compile a configured CSS selector.
pub(crate) fn compile_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| TrackerError::Selector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}
