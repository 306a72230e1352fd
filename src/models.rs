//! Data models for scraped press releases and their persisted form.
//!
//! - [`ListingEntry`]: one tile from the listing page
//! - [`ArticleDetails`]: what the detail page yields for a single release
//! - [`StoreRecord`]: a listing entry merged with its article text, as stored on disk
//! - [`UrlMetadata`]: domain and year derived from the listing URL

use serde::{Deserialize, Serialize};

/// A press release as it appears on the listing page.
///
/// The `date` is `DD/Month/YYYY` when the listing URL carries a `year`
/// parameter and `DD/Month` otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Headline shown on the tile.
    pub title: String,
    /// Absolute URL of the detail page.
    pub link: String,
    /// Publication date assembled from the tile's day and month fields.
    pub date: String,
}

impl ListingEntry {
    /// Attach article text, producing the record that gets persisted.
    pub fn into_record(self, content: String) -> StoreRecord {
        StoreRecord {
            title: self.title,
            link: self.link,
            date: self.date,
            content,
        }
    }
}

/// Fields extracted from a press release's detail page.
///
/// Each field is independent; a missing node only empties its own field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleDetails {
    pub title: Option<String>,
    pub date: Option<String>,
    pub image_url: Option<String>,
    /// Body paragraphs joined with newlines.
    pub content: Option<String>,
}

/// One element of the persisted collection.
///
/// The file holds these newest first. Nothing re-sorts them; new records are
/// prepended in listing order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StoreRecord {
    pub title: String,
    pub link: String,
    pub date: String,
    #[serde(default)]
    pub content: String,
}

/// Base domain and optional `year` query parameter of the listing URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlMetadata {
    /// `scheme://host[:port]`, without a trailing slash.
    pub main_domain: String,
    pub year: Option<i32>,
}
