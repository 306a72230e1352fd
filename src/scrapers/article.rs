//! Press-release detail page scraper.
//!
//! Detail pages are server-rendered, so a plain HTTP GET is enough. Only a
//! `200 OK` is accepted; anything else is reported as
//! [`TrackerError::Status`] and never retried.

use super::compile_selector;
use crate::config::ArticleSettings;
use crate::error::{Result, TrackerError};
use crate::models::ArticleDetails;
use crate::utils::normalize_text;
use itertools::Itertools;
use reqwest::{Client, StatusCode};
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

/// Fetches and parses detail pages with a shared HTTP client.
pub struct ArticleScraper {
    client: Client,
    request_timeout: Option<Duration>,
    container: Selector,
    title: Selector,
    date: Selector,
    image: Selector,
    image_attribute: String,
    body: Selector,
    paragraph: Selector,
}

impl ArticleScraper {
    pub fn new(client: Client, settings: &ArticleSettings) -> Result<Self> {
        let selectors = &settings.selectors;
        Ok(Self {
            client,
            request_timeout: settings.request_timeout_secs.map(Duration::from_secs),
            container: compile_selector(&selectors.container)?,
            title: compile_selector(&selectors.title)?,
            date: compile_selector(&selectors.date)?,
            image: compile_selector(&selectors.image)?,
            image_attribute: selectors.image_attribute.clone(),
            body: compile_selector(&selectors.body)?,
            paragraph: compile_selector(&selectors.paragraph)?,
        })
    }

    /// Fetch a detail page and extract its fields.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when the page has no article container, otherwise the
    /// extracted [`ArticleDetails`].
    ///
    /// # Errors
    ///
    /// Transport errors and any status other than `200 OK`.
    #[instrument(level = "info", skip(self))]
    pub async fn scrape(&self, url: &str) -> Result<Option<ArticleDetails>> {
        let mut request = self.client.get(url);
        if let Some(timeout) = self.request_timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(TrackerError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        info!(bytes = body.len(), "Fetched article page");
        Ok(self.parse(&body, url))
    }

    /// Extract fields from an already fetched page.
    ///
    /// `page_url` is used to resolve a relative image URL.
    pub fn parse(&self, html: &str, page_url: &str) -> Option<ArticleDetails> {
        let document = Html::parse_document(html);
        let article = document.select(&self.container).next()?;

        let title = article
            .select(&self.title)
            .next()
            .map(text_of)
            .filter(|t| !t.is_empty());
        let date = article
            .select(&self.date)
            .next()
            .map(text_of)
            .filter(|t| !t.is_empty());
        let image_url = article
            .select(&self.image)
            .next()
            .and_then(|img| img.value().attr(&self.image_attribute))
            .map(|src| resolve_against(page_url, src.trim()));
        let content = article.select(&self.body).next().map(|body| {
            body.select(&self.paragraph)
                .map(text_of)
                .filter(|p| !p.is_empty())
                .join("\n")
        });

        debug!(
            has_title = title.is_some(),
            has_date = date.is_some(),
            has_image = image_url.is_some(),
            content_bytes = content.as_ref().map_or(0, String::len),
            "Parsed article"
        );

        Some(ArticleDetails {
            title,
            date,
            image_url,
            content,
        })
    }
}

fn text_of(element: ElementRef<'_>) -> String {
    normalize_text(&element.text().collect::<String>())
}

fn resolve_against(page_url: &str, src: &str) -> String {
    match Url::parse(page_url).and_then(|base| base.join(src)) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => src.to_string(),
    }
}
