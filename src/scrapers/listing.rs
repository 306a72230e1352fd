//! Browser-driven fetch of the press-release listing.
//!
//! The listing is rendered client-side, so it is loaded in a real browser
//! through a WebDriver endpoint (chromedriver). The browser is hidden behind
//! [`ListingSource`] so the retry logic and the rest of the pipeline can run
//! against a fake in tests.

use crate::config::ListingSettings;
use crate::error::Result;
use std::time::{Duration, Instant};
use thirtyfour::ChromiumLikeCapabilities;
use thirtyfour::prelude::*;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

/// How often the browser is polled while waiting for tiles to appear.
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Something that can load a page and return the outer HTML of every element
/// matching a selector.
pub trait ListingSource {
    /// Navigate to `url` and wait up to `timeout` for at least one element
    /// matching `selector`.
    ///
    /// # Returns
    ///
    /// The outer HTML of each matching element in document order, or an
    /// error if navigation fails or nothing appears in time.
    async fn fetch_items(&self, url: &str, selector: &str, timeout: Duration) -> Result<Vec<String>>;
}

/// A WebDriver-controlled Chrome session.
///
/// The session must be released with [`WebDriverSession::close`]; dropping it
/// leaves the browser process to chromedriver.
pub struct WebDriverSession {
    driver: WebDriver,
}

impl WebDriverSession {
    /// Start a Chrome session on the WebDriver server at `server_url`.
    #[instrument(level = "info", skip_all, fields(%server_url, headless))]
    pub async fn connect(server_url: &str, headless: bool) -> Result<Self> {
        let mut caps = DesiredCapabilities::chrome();
        if headless {
            caps.set_headless()?;
        }
        caps.set_no_sandbox()?;
        caps.set_disable_dev_shm_usage()?;

        let driver = WebDriver::new(server_url, caps).await.inspect_err(|e| {
            error!(error = %e, "Failed to initialize WebDriver");
        })?;
        info!("Driver initialized successfully");
        Ok(Self { driver })
    }

    /// End the browser session.
    #[instrument(level = "info", skip_all)]
    pub async fn close(self) -> Result<()> {
        self.driver.quit().await?;
        info!("Driver closed successfully");
        Ok(())
    }
}

impl ListingSource for WebDriverSession {
    #[instrument(level = "info", skip(self, timeout), fields(timeout_secs = timeout.as_secs()))]
    async fn fetch_items(&self, url: &str, selector: &str, timeout: Duration) -> Result<Vec<String>> {
        self.driver.goto(url).await?;
        info!("Navigated to the listing URL");

        let elements = self
            .driver
            .query(By::Css(selector))
            .wait(timeout, POLL_INTERVAL)
            .all_from_selector_required()
            .await?;

        let mut items = Vec::with_capacity(elements.len());
        for element in elements {
            items.push(element.outer_html().await?);
        }
        Ok(items)
    }
}

/// Fetch the raw listing tiles, retrying failed attempts.
///
/// Each attempt navigates and waits up to the configured timeout. A failed
/// attempt is logged and followed by the configured backoff. Once
/// `max_retries` attempts have failed an empty list is returned, which the
/// caller cannot tell apart from a listing that is genuinely empty.
///
/// # Arguments
///
/// * `source` - The browser (or fake) to load the page with
/// * `url` - The listing URL
/// * `settings` - Retry budget, timings and the tile selector
#[instrument(level = "info", skip(source, settings), fields(max_retries = settings.max_retries))]
pub async fn fetch_listing<S: ListingSource>(source: &S, url: &str, settings: &ListingSettings) -> Vec<String> {
    let t0 = Instant::now();

    for attempt in 1..=settings.max_retries {
        match source
            .fetch_items(url, &settings.selectors.item, settings.wait_timeout())
            .await
        {
            Ok(items) => {
                info!(count = items.len(), attempt, "Found press releases");
                return items;
            }
            Err(e) => {
                let backoff = settings.retry_backoff();
                warn!(attempt, max = settings.max_retries, ?backoff, error = %e, "Listing fetch attempt failed");
                sleep(backoff).await;
            }
        }
    }

    error!(
        attempts = settings.max_retries,
        elapsed_ms_total = t0.elapsed().as_millis(),
        "Failed to fetch press releases after retries"
    );
    Vec::new()
}
