//! Per-item film assembly
//!
//! Turns one listing item block into a `FilmRecord`: fields read from the
//! listing markup, plus stream links and metadata read from the film's detail
//! page. Network and parse problems fall back to defaults; only a failure to
//! build the record itself rejects the item.

use crate::crawler::fetcher::DocumentFetcher;
use crate::crawler::parser::{
    extract_film_details, extract_stream_links, parse_listing_entry, RawItem,
};
use crate::film::{FilmDetails, FilmRecord, StreamLink};
use crate::url::absolutize;
use crate::ScraperError;
use std::sync::Arc;
use url::Url;

/// Builds film records from listing item blocks
pub struct ItemProcessor {
    fetcher: Arc<dyn DocumentFetcher>,
    site_root: Url,
}

impl ItemProcessor {
    /// Creates a processor qualifying relative links against `site_root`
    pub fn new(fetcher: Arc<dyn DocumentFetcher>, site_root: Url) -> Self {
        Self { fetcher, site_root }
    }

    /// Assembles the film record for one item block
    ///
    /// The detail page is requested twice, once for stream links and once
    /// for metadata. A missing detail link skips both requests.
    ///
    /// # Errors
    ///
    /// Returns `ScraperError::Item` when a link in the item cannot be turned
    /// into an absolute URL. The whole item is then dropped rather than
    /// recorded with partial data.
    pub async fn process(&self, item: RawItem) -> Result<FilmRecord, ScraperError> {
        let entry = parse_listing_entry(&item.html);

        let image_url = self
            .qualify(entry.image_src.as_deref(), &entry.title)?
            .unwrap_or_default();
        let detail_url = self
            .qualify(entry.detail_href.as_deref(), &entry.title)?
            .unwrap_or_default();

        let links = self.get_stream_links(&detail_url).await;
        let details = self.get_film_details(&detail_url).await;

        tracing::debug!("Processed film: {}", entry.title);
        Ok(FilmRecord::new(entry.title, image_url, details, links))
    }

    fn qualify(&self, href: Option<&str>, title: &str) -> Result<Option<String>, ScraperError> {
        absolutize(&self.site_root, href).map_err(|e| ScraperError::Item {
            message: format!("invalid link {:?} for '{}': {}", href.unwrap_or_default(), title, e),
        })
    }

    /// Fetches the allow-listed stream links of a detail page
    ///
    /// An empty URL or a failed fetch yields no links.
    pub async fn get_stream_links(&self, url: &str) -> Vec<StreamLink> {
        if url.is_empty() {
            return Vec::new();
        }

        match self.fetcher.fetch(url).await.into_body() {
            Ok(body) => extract_stream_links(&body),
            Err(error) => {
                tracing::warn!("Failed to fetch stream links from {}: {}", url, error);
                Vec::new()
            }
        }
    }

    /// Fetches genres, release date, actors and description of a detail page
    ///
    /// An empty URL or a failed fetch yields `FilmDetails::default()`.
    pub async fn get_film_details(&self, url: &str) -> FilmDetails {
        if url.is_empty() {
            return FilmDetails::default();
        }

        match self.fetcher.fetch(url).await.into_body() {
            Ok(body) => extract_film_details(&body),
            Err(error) => {
                tracing::warn!("Failed to fetch film details from {}: {}", url, error);
                FilmDetails::default()
            }
        }
    }
}
