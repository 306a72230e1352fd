//! JSON file holding every known press release.
//!
//! The whole collection is one pretty-printed JSON array, newest first:
//!
//! ```text
//! [
//!     {
//!         "title": "...",
//!         "link": "https://...",
//!         "date": "05/January/2024",
//!         "content": "..."
//!     }
//! ]
//! ```
//!
//! Each run reads the file once and rewrites it wholesale. There is no
//! partial-write protection.

use crate::error::Result;
use crate::models::StoreRecord;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored collection. A missing file is an empty store.
    #[instrument(level = "info", skip_all, fields(path = %self.path.display()))]
    pub async fn read(&self) -> Result<Vec<StoreRecord>> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("Store file not found; starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        let records: Vec<StoreRecord> = serde_json::from_slice(&bytes)?;
        info!(count = records.len(), "Loaded store");
        Ok(records)
    }

    /// Replace the file with `records`.
    #[instrument(level = "info", skip_all, fields(path = %self.path.display(), count = records.len()))]
    pub async fn write(&self, records: &[StoreRecord]) -> Result<()> {
        let mut buf = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        records.serialize(&mut serializer)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.path, buf).await?;
        info!("Data saved to store");
        Ok(())
    }
}
