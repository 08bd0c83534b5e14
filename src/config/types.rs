use serde::Deserialize;

/// Main configuration structure for Film-Scraper
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Upper bound on films the crawl expects to collect
    pub fn expected_films(&self) -> u64 {
        u64::from(self.site.total_pages) * u64::from(self.site.films_per_page)
    }
}

/// The listing site being crawled
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Scheme and host of the site; relative links are qualified against it
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path segment under which numbered listing pages live
    #[serde(rename = "listing-path")]
    pub listing_path: String,

    /// Number of listing pages to walk
    #[serde(rename = "total-pages")]
    pub total_pages: u32,

    /// Films shown per listing page (used for the progress ratio)
    #[serde(rename = "films-per-page")]
    pub films_per_page: u32,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.cpasmieux.ad".to_string(),
            listing_path: "filmstreaming".to_string(),
            total_pages: 961,
            films_per_page: 20,
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of items processed concurrently on one page
    #[serde(rename = "max-concurrency")]
    pub max_concurrency: u32,

    /// Timeout applied to every request (milliseconds)
    #[serde(rename = "fetch-timeout-ms")]
    pub fetch_timeout_ms: u64,

    /// Page the cursor starts at when no progress is resumed
    #[serde(rename = "start-page")]
    pub start_page: u32,

    /// Write the accumulated records after every page instead of only at the end
    #[serde(rename = "checkpoint-results")]
    pub checkpoint_results: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 200,
            fetch_timeout_ms: 10_000,
            start_page: 1,
            checkpoint_results: false,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "film-scraper".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the JSON array of film records
    #[serde(rename = "results-path")]
    pub results_path: String,

    /// Path to the JSON progress marker
    #[serde(rename = "progress-path")]
    pub progress_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_path: "film_data_results.json".to_string(),
            progress_path: "progression.json".to_string(),
        }
    }
}
