//! Run configuration and the declarative site profile.
//!
//! Everything the watcher needs to know about the target site lives here:
//! where the listing is, which CSS selectors locate each field, how long to
//! wait for the listing to render and which failures end the run. The
//! defaults describe the Proofpoint newsroom; a YAML file can override any
//! subset of fields.
//!
//! ```yaml
//! listing_url: "https://www.proofpoint.com/us/newsroom/press-releases?year=2023"
//! listing:
//!   wait_timeout_secs: 30
//! policy:
//!   persistence: abort
//! ```

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, instrument};

pub const DEFAULT_LISTING_URL: &str = "https://www.proofpoint.com/us/newsroom/press-releases?year=2024";
pub const DEFAULT_STORE_PATH: &str = "press_releases.json";
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";

/// Top-level configuration for one run.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub listing_url: String,
    pub store_path: PathBuf,
    pub webdriver_url: String,
    /// Run the browser without a window.
    pub headless: bool,
    pub listing: ListingSettings,
    pub article: ArticleSettings,
    pub policy: FailurePolicy,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            listing_url: DEFAULT_LISTING_URL.to_string(),
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            headless: true,
            listing: ListingSettings::default(),
            article: ArticleSettings::default(),
            policy: FailurePolicy::default(),
        }
    }
}

/// How the listing page is loaded and where its fields are.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ListingSettings {
    pub max_retries: u32,
    pub wait_timeout_secs: u64,
    pub retry_backoff_secs: u64,
    pub selectors: ListingSelectors,
}

impl ListingSettings {
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_secs(self.retry_backoff_secs)
    }
}

impl Default for ListingSettings {
    fn default() -> Self {
        Self {
            max_retries: 3,
            wait_timeout_secs: 20,
            retry_backoff_secs: 5,
            selectors: ListingSelectors::default(),
        }
    }
}

/// Locators for one listing tile. All but `item` are relative to the tile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ListingSelectors {
    /// The tile itself; also the element carrying the link attribute.
    pub item: String,
    pub title: String,
    pub link_attribute: String,
    pub date: String,
    pub day: String,
    pub month: String,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            item: "article.press-releases-v4__hit a".to_string(),
            title: "h3".to_string(),
            link_attribute: "href".to_string(),
            date: "div.press-releases-v4__hit-date".to_string(),
            day: ".press-releases-v4__hit-date-day".to_string(),
            month: ".press-releases-v4__hit-date-month".to_string(),
        }
    }
}

/// How detail pages are fetched and where their fields are.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ArticleSettings {
    /// No timeout when unset.
    pub request_timeout_secs: Option<u64>,
    pub selectors: ArticleSelectors,
}

impl Default for ArticleSettings {
    fn default() -> Self {
        Self {
            request_timeout_secs: None,
            selectors: ArticleSelectors::default(),
        }
    }
}

/// Locators for a detail page. All but `container` are relative to it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ArticleSelectors {
    pub container: String,
    pub title: String,
    pub date: String,
    pub image: String,
    pub image_attribute: String,
    pub body: String,
    pub paragraph: String,
}

impl Default for ArticleSelectors {
    fn default() -> Self {
        Self {
            container: "article.node--type--news".to_string(),
            title: "h3.news-main-content__title span".to_string(),
            date: "time".to_string(),
            image: "div.news-main-content__image img".to_string(),
            image_attribute: "src".to_string(),
            body: "div.node-full__body".to_string(),
            paragraph: "p".to_string(),
        }
    }
}

/// What to do when a step fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OnFailure {
    /// End the run with the error.
    Abort,
    /// Log the error and carry on without the failed item.
    Skip,
}

/// Which failures end a run. Listing fetches and per-tile extraction are
/// always recoverable and have no entry here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FailurePolicy {
    /// Transport error or non-200 status on a detail page.
    pub detail_fetch: OnFailure,
    /// A listing or store date that does not parse as `DD/Month/YYYY`.
    pub date_parse: OnFailure,
    /// Writing the store file.
    pub persistence: OnFailure,
}

impl Default for FailurePolicy {
    fn default() -> Self {
        Self {
            detail_fetch: OnFailure::Abort,
            date_parse: OnFailure::Abort,
            persistence: OnFailure::Skip,
        }
    }
}

/// Load a configuration file. Fields missing from the file keep their defaults.
#[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
pub async fn load_config(path: impl AsRef<Path>) -> Result<TrackerConfig> {
    let raw = tokio::fs::read_to_string(path.as_ref()).await?;
    let config: TrackerConfig = serde_yaml::from_str(&raw)?;
    info!(listing_url = %config.listing_url, store = %config.store_path.display(), "Loaded configuration");
    Ok(config)
}
