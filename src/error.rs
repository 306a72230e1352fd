//! Error type shared by every stage of the watcher.
//!
//! Which of these errors end a run and which are only logged is decided by
//! [`FailurePolicy`](crate::config::FailurePolicy), not by the variant itself.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("failed to fetch {url}: status code {status}")]
    Status { url: String, status: u16 },
    #[error("browser session error: {0}")]
    Browser(#[from] thirtyfour::error::WebDriverError),
    #[error("unparseable date {date:?}: {reason}")]
    Date { date: String, reason: String },
    #[error("invalid selector {selector:?}: {reason}")]
    Selector { selector: String, reason: String },
    #[error("missing {0} element")]
    MissingElement(&'static str),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config error: {0}")]
    Config(#[from] serde_yaml::Error),
}

pub type Result<T, E = TrackerError> = std::result::Result<T, E>;
