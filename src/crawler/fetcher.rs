//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the user agent and request timeout
//! - The `DocumentFetcher` seam used by the rest of the pipeline
//! - Fetching a listing page and splitting it into item blocks
//! - Error classification
//!
//! There is no retry: a failed request is reported once and its page or
//! film falls back to an empty result.

use crate::config::Config;
use crate::crawler::parser::{extract_item_blocks, RawItem};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug, Clone)]
pub enum FetchResult {
    /// Successfully fetched the document
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Document body
        body: String,
    },

    /// Server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, unreadable body, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// Returns the body of a successful fetch
    pub fn into_body(self) -> Result<String, String> {
        match self {
            Self::Success { body, .. } => Ok(body),
            Self::HttpError { status_code } => Err(format!("HTTP {}", status_code)),
            Self::NetworkError { error } => Err(error),
        }
    }
}

/// Outcome of fetching one listing page
#[derive(Debug, Clone)]
pub enum PageFetchOutcome {
    /// The page held at least one item block
    Success(Vec<RawItem>),

    /// The page was fetched but contained no item blocks
    Empty,

    /// The page could not be fetched
    TransportError(String),
}

impl PageFetchOutcome {
    /// Item blocks to process; failure and empty pages both yield none
    pub fn into_items(self) -> Vec<RawItem> {
        match self {
            Self::Success(items) => items,
            Self::Empty | Self::TransportError(_) => Vec::new(),
        }
    }
}

/// Source of fetched documents
///
/// The crawl pipeline only talks to the network through this trait so that
/// the transport can be replaced.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Fetches the document at `url`
    async fn fetch(&self, url: &str) -> FetchResult;
}

/// Production fetcher backed by a shared `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds the client from the configuration and wraps it
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult {
        fetch_url(&self.client, url).await
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The crawler configuration (user agent and timeout)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use film_scraper::config::Config;
/// use film_scraper::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    // Format: CrawlerName/Version
    let user_agent = format!(
        "{}/{}",
        config.user_agent.crawler_name, config.user_agent.crawler_version
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_millis(config.crawler.fetch_timeout_ms))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL once and classifies the outcome
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx with readable body | Success |
/// | Any other status | HttpError |
/// | Timeout | NetworkError ("Request timeout") |
/// | Connection refused | NetworkError ("Connection refused") |
/// | Body read failure | NetworkError |
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    match client.get(url).send().await {
        Ok(response) => {
            let status = response.status();
            let final_url = response.url().to_string();

            if !status.is_success() {
                return FetchResult::HttpError {
                    status_code: status.as_u16(),
                };
            }

            match response.text().await {
                Ok(body) => FetchResult::Success {
                    final_url,
                    status_code: status.as_u16(),
                    body,
                },
                Err(e) => FetchResult::NetworkError {
                    error: classify_error(&e),
                },
            }
        }
        Err(e) => FetchResult::NetworkError {
            error: classify_error(&e),
        },
    }
}

fn classify_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        "Connection refused".to_string()
    } else {
        e.to_string()
    }
}

/// Fetches one listing page and splits it into raw item blocks
///
/// Fetch failures and pages without items are logged differently but give
/// the caller the same thing: no items.
pub async fn fetch_listing_page(fetcher: &dyn DocumentFetcher, url: &str) -> PageFetchOutcome {
    let body = match fetcher.fetch(url).await.into_body() {
        Ok(body) => body,
        Err(error) => {
            tracing::warn!("Failed to fetch listing page {}: {}", url, error);
            return PageFetchOutcome::TransportError(error);
        }
    };

    let items = extract_item_blocks(&body);
    if items.is_empty() {
        tracing::info!("No films found on page {}", url);
        return PageFetchOutcome::Empty;
    }

    tracing::debug!("Found {} item blocks on {}", items.len(), url);
    PageFetchOutcome::Success(items)
}
