//! # Press Release Watch
//!
//! Watches a newsroom's press-release listing, detects releases that have
//! appeared since the last run and archives their full text in a single JSON
//! file, newest first.
//!
//! ## Usage
//!
//! ```sh
//! chromedriver --port=9515 &
//! press_release_watch
//! ```
//!
//! ## Architecture
//!
//! Each run is one sequential pass:
//! 1. **Load**: read the existing store (a missing file is an empty store)
//! 2. **Listing**: render the listing page in a headless browser and extract its tiles
//! 3. **Resolve**: keep the tiles dated after the newest stored release
//! 4. **Detail**: fetch each new release's page over HTTP and extract its body
//! 5. **Save**: prepend the new releases and rewrite the store

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod error;
mod models;
mod pipeline;
mod resolver;
mod scrapers;
mod store;
mod utils;

use cli::Cli;
use config::{TrackerConfig, load_config};
use scrapers::article::ArticleScraper;
use scrapers::listing::WebDriverSession;
use store::JsonStore;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("press_release_watch starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let mut config = match &args.config {
        Some(path) => load_config(path).await?,
        None => TrackerConfig::default(),
    };
    args.apply(&mut config);
    info!(
        listing_url = %config.listing_url,
        store = %config.store_path.display(),
        webdriver_url = %config.webdriver_url,
        "Configuration resolved"
    );

    let store = JsonStore::new(&config.store_path);
    let articles = ArticleScraper::new(reqwest::Client::new(), &config.article)?;

    // ---- Browser session lives for the whole run ----
    let session = WebDriverSession::connect(&config.webdriver_url, config.headless).await?;
    let outcome = pipeline::run(&config, &session, &articles, &store).await;
    if let Err(e) = session.close().await {
        error!(error = %e, "Failed to close browser session");
    }

    let summary = match outcome {
        Ok(summary) => summary,
        Err(e) => {
            error!(error = %e, "Run failed");
            return Err(e.into());
        }
    };

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        scraped = summary.scraped,
        new_entries = summary.new_entries,
        failed_details = summary.failed_details,
        stored = summary.stored,
        saved = summary.saved,
        "Execution complete"
    );

    Ok(())
}
