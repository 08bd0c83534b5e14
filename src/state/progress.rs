use serde::{Deserialize, Serialize};

/// Resumable position of a crawl
///
/// `last_page` is always the next page to fetch, never one already completed.
/// Values are replaced wholesale after each page rather than mutated in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlProgress {
    /// Next listing page to fetch (1-based)
    pub last_page: u32,

    /// Films appended so far across the run, including resumed runs
    pub total_scraped: u64,
}

impl Default for CrawlProgress {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl CrawlProgress {
    /// Progress for a crawl that has not scraped anything yet
    pub fn starting_at(page: u32) -> Self {
        Self {
            last_page: page.max(1),
            total_scraped: 0,
        }
    }

    /// Progress read back from disk with the cursor kept on a real page
    pub fn clamped(self) -> Self {
        Self {
            last_page: self.last_page.max(1),
            ..self
        }
    }

    /// Progress after `page` completed with `films` records
    pub fn advance(self, page: u32, films: usize) -> Self {
        Self {
            last_page: page + 1,
            total_scraped: self.total_scraped + films as u64,
        }
    }

    /// Whether the crawl loop should fetch another page
    pub fn has_remaining(&self, total_pages: u32, expected_films: u64) -> bool {
        self.last_page <= total_pages && self.total_scraped < expected_films
    }

    /// Completion percentage against the expected film count, clamped to 0..=100
    pub fn percent(&self, expected_films: u64) -> f64 {
        if expected_films == 0 {
            return 100.0;
        }
        let ratio = self.total_scraped as f64 / expected_films as f64 * 100.0;
        ratio.clamp(0.0, 100.0)
    }
}
