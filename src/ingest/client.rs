//! Fetches the feed and degrades to an empty board on any failure.
//!
//! The remote source is a published spreadsheet. When no sheet is configured
//! the local JSON document is read instead.

use std::path::PathBuf;

use reqwest::header::CACHE_CONTROL;
use reqwest::Client;
use thiserror::Error;

use crate::config::BoardConfig;
use crate::models::FeedSnapshot;

use super::{locator, mapper};

/// How many leading characters are inspected to spot an HTML page.
const SNIFF_CHARS: usize = 50;

/// Feed loading errors. None of these reach the board: [`FeedLoader::load`]
/// logs them and returns [`FeedSnapshot::unavailable`].
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed returned status {0}")]
    Status(u16),

    #[error("Fetched HTML instead of CSV from {url}; check the sheet's publish settings")]
    HtmlResponse { url: String },

    #[error("Failed to read local feed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid local feed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where the board's data comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    /// A published sheet link in any supported shape.
    Sheet(String),
    /// A JSON snapshot on disk.
    Local(PathBuf),
}

impl FeedSource {
    /// The sheet when one is configured, the local document otherwise.
    pub fn from_config(config: &BoardConfig) -> Self {
        match config.sheet_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Self::Sheet(url.to_string()),
            _ => Self::Local(config.fallback_path.clone()),
        }
    }
}

/// Loads one [`FeedSnapshot`] per call.
#[derive(Debug, Clone)]
pub struct FeedLoader {
    source: FeedSource,
    client: Client,
}

impl FeedLoader {
    pub fn new(source: FeedSource) -> Self {
        Self {
            source,
            client: Client::new(),
        }
    }

    pub fn from_config(config: &BoardConfig) -> Self {
        Self::new(FeedSource::from_config(config))
    }

    pub fn source(&self) -> &FeedSource {
        &self.source
    }

    /// Load the feed, never failing. Errors are logged and replaced by the
    /// empty placeholder board.
    pub async fn load(&self) -> FeedSnapshot {
        match self.try_load().await {
            Ok(snapshot) => {
                tracing::info!(notes = snapshot.items.len(), "Loaded feed");
                snapshot
            }
            Err(e) => {
                tracing::error!("Data load failed: {}", e);
                FeedSnapshot::unavailable()
            }
        }
    }

    /// Load the feed, surfacing the reason it could not be used.
    pub async fn try_load(&self) -> Result<FeedSnapshot, FeedError> {
        match &self.source {
            FeedSource::Sheet(url) => {
                let text = self.fetch_sheet(url).await?;
                Ok(mapper::csv_to_feed(&text))
            }
            FeedSource::Local(path) => {
                let content = tokio::fs::read_to_string(path).await?;
                let snapshot: FeedSnapshot = serde_json::from_str(&content)?;
                Ok(snapshot.normalized())
            }
        }
    }

    async fn fetch_sheet(&self, url: &str) -> Result<String, FeedError> {
        let url = locator::normalize(url);
        tracing::debug!("Fetching feed from {}", url);

        let response = self
            .client
            .get(&url)
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        if looks_like_html(&text) {
            return Err(FeedError::HtmlResponse { url });
        }
        Ok(text)
    }
}

/// Whether a response body is an HTML page rather than CSV.
pub fn looks_like_html(body: &str) -> bool {
    let head: String = body
        .trim()
        .chars()
        .take(SNIFF_CHARS)
        .collect::<String>()
        .to_lowercase();
    head.starts_with("<!doctype") || head.starts_with("<html")
}
