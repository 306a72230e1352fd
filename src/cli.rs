//! Command-line interface definitions for Press Release Watch.
//!
//! No argument is required: with none, the watcher runs against the built-in
//! newsroom profile and writes `press_releases.json` in the working
//! directory. Flags override the YAML configuration, which overrides the
//! built-in defaults.

use crate::config::TrackerConfig;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the Press Release Watch application.
///
/// # Examples
///
/// ```sh
/// # Defaults: Proofpoint newsroom, chromedriver on localhost:9515
/// press_release_watch
///
/// # Another year, another store file
/// press_release_watch --url "https://www.proofpoint.com/us/newsroom/press-releases?year=2023" \
///     --store releases-2023.json
///
/// # Selectors and failure policy from a file
/// press_release_watch --config site.yaml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Listing page URL; a `year` query parameter completes the listing dates
    #[arg(short, long, env = "PRESS_WATCH_URL")]
    pub url: Option<String>,

    /// Path of the JSON store file
    #[arg(short, long, env = "PRESS_WATCH_STORE")]
    pub store: Option<PathBuf>,

    /// Optional path to a YAML configuration file
    #[arg(short, long, env = "PRESS_WATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// WebDriver server (e.g. chromedriver) to drive the browser through
    #[arg(long, env = "WEBDRIVER_URL")]
    pub webdriver_url: Option<String>,

    /// Number of attempts at loading the listing page
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Show the browser window instead of running headless
    #[arg(long)]
    pub headful: bool,
}

impl Cli {
    /// Apply the flags that were given on top of `config`.
    pub fn apply(&self, config: &mut TrackerConfig) {
        if let Some(url) = &self.url {
            config.listing_url = url.clone();
        }
        if let Some(store) = &self.store {
            config.store_path = store.clone();
        }
        if let Some(webdriver_url) = &self.webdriver_url {
            config.webdriver_url = webdriver_url.clone();
        }
        if let Some(max_retries) = self.max_retries {
            config.listing.max_retries = max_retries;
        }
        if self.headful {
            config.headless = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_no_arguments() {
        let cli = Cli::parse_from(["press_release_watch"]);
        let mut config = TrackerConfig::default();

        cli.apply(&mut config);

        // Flags without an env fallback always keep their defaults.
        let defaults = TrackerConfig::default();
        assert_eq!(config.headless, defaults.headless);
        assert_eq!(config.listing, defaults.listing);
        assert_eq!(config.article, defaults.article);
        assert_eq!(config.policy, defaults.policy);

        // The rest keep theirs unless the shell exports the variable.
        let unset = |name: &str| std::env::var_os(name).is_none();
        if unset("PRESS_WATCH_URL") {
            assert_eq!(config.listing_url, defaults.listing_url);
        }
        if unset("PRESS_WATCH_STORE") {
            assert_eq!(config.store_path, defaults.store_path);
        }
        if unset("PRESS_WATCH_CONFIG") {
            assert!(cli.config.is_none());
        }
        if unset("WEBDRIVER_URL") {
            assert_eq!(config.webdriver_url, defaults.webdriver_url);
        }
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "press_release_watch",
            "--url",
            "https://example.com/news?year=2023",
            "-s",
            "/tmp/store.json",
            "--webdriver-url",
            "http://chromedriver:4444",
            "--max-retries",
            "5",
            "--headful",
        ]);
        let mut config = TrackerConfig::default();

        cli.apply(&mut config);

        assert_eq!(config.listing_url, "https://example.com/news?year=2023");
        assert_eq!(config.store_path, PathBuf::from("/tmp/store.json"));
        assert_eq!(config.webdriver_url, "http://chromedriver:4444");
        assert_eq!(config.listing.max_retries, 5);
        assert!(!config.headless);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(["press_release_watch", "-u", "https://example.com/", "-c", "site.yaml"]);

        assert_eq!(cli.url.as_deref(), Some("https://example.com/"));
        assert_eq!(cli.config, Some(PathBuf::from("site.yaml")));
    }
}
