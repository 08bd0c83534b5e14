//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the page loop that coordinates the whole crawl:
//! - Resolving the starting cursor (fresh or resumed)
//! - Fetching listing pages strictly one after another
//! - Fanning each page's items out to the worker pool
//! - Persisting progress after every page and results at the end

use crate::config::Config;
use crate::crawler::fetcher::{
    fetch_listing_page, DocumentFetcher, HttpFetcher, PageFetchOutcome,
};
use crate::crawler::processor::ItemProcessor;
use crate::crawler::scheduler::WorkerPool;
use crate::film::FilmRecord;
use crate::state::{CrawlPhase, CrawlProgress};
use crate::storage::{open_storage, JsonStorage, Storage};
use crate::url::{listing_page_url, site_root};
use crate::ScraperError;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// Status notifications emitted while crawling
#[derive(Debug, Clone, PartialEq)]
pub enum CrawlEvent {
    /// A listing page is about to be fetched
    PageStarted { page: u32, url: String },

    /// A film record was assembled
    FilmProcessed { title: String },

    /// A page or item failed; the crawl carries on
    Error { context: String },

    /// Progress after a page was persisted
    Progress {
        last_page: u32,
        total_scraped: u64,
        percent: f64,
    },

    /// Results were written and the run is over
    Finished { total_scraped: u64 },
}

/// Summary returned by a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlReport {
    /// Listing pages fetched by this run
    pub pages_fetched: u32,

    /// Films collected by this run
    pub films_scraped: usize,

    /// Progress persisted at the end of the run
    pub progress: CrawlProgress,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    storage: JsonStorage,
    fetcher: Arc<dyn DocumentFetcher>,
    processor: Arc<ItemProcessor>,
    pool: WorkerPool,
    events: Option<UnboundedSender<CrawlEvent>>,
    phase: CrawlPhase,
    start: CrawlProgress,
    resumed: bool,
}

impl Coordinator {
    /// Creates a new coordinator instance using the HTTP fetcher
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `fresh` - Whether to ignore persisted progress
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(ScraperError)` - Failed to build the client or read progress
    pub fn new(config: Config, fresh: bool) -> Result<Self, ScraperError> {
        let fetcher = HttpFetcher::from_config(&config)?;
        Self::with_fetcher(config, fresh, Arc::new(fetcher))
    }

    /// Creates a coordinator fetching documents through `fetcher`
    pub fn with_fetcher(
        config: Config,
        fresh: bool,
        fetcher: Arc<dyn DocumentFetcher>,
    ) -> Result<Self, ScraperError> {
        let root = site_root(&config.site.base_url)?;
        let storage = open_storage(&config.output);

        let saved = if fresh {
            tracing::info!("Starting fresh crawl at page {}", config.crawler.start_page);
            None
        } else {
            storage.load_progress()?
        };

        let resumed = saved.is_some();
        let start = match saved {
            Some(progress) => {
                let progress = progress.clamped();
                tracing::info!(
                    "Resuming from page {} ({} films already scraped)",
                    progress.last_page,
                    progress.total_scraped
                );
                progress
            }
            None => {
                if !fresh {
                    tracing::info!(
                        "No saved progress found, starting at page {}",
                        config.crawler.start_page
                    );
                }
                CrawlProgress::starting_at(config.crawler.start_page)
            }
        };

        let processor = ItemProcessor::new(Arc::clone(&fetcher), root);
        let pool = WorkerPool::new(config.crawler.max_concurrency as usize);

        Ok(Self {
            config: Arc::new(config),
            storage,
            fetcher,
            processor: Arc::new(processor),
            pool,
            events: None,
            phase: CrawlPhase::Idle,
            start,
            resumed,
        })
    }

    /// Sends status events to `events` while crawling
    pub fn with_events(mut self, events: UnboundedSender<CrawlEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// Progress the run will start from
    pub fn start_progress(&self) -> CrawlProgress {
        self.start
    }

    /// Runs the page loop until the pages or the expected film count run out
    ///
    /// Progress is written after every page, including pages that yielded
    /// nothing. Results are written once at the end, or after every page when
    /// `checkpoint-results` is enabled.
    pub async fn run(&mut self) -> Result<CrawlReport, ScraperError> {
        self.transition(CrawlPhase::Running)?;

        let total_pages = self.config.site.total_pages;
        let expected = self.config.expected_films();
        let checkpoint = self.config.crawler.checkpoint_results;

        let mut progress = self.start;
        let mut films = self.initial_films()?;
        let mut pages_fetched = 0u32;
        let mut films_scraped = 0usize;

        let start_time = std::time::Instant::now();

        while progress.has_remaining(total_pages, expected) {
            let page = progress.last_page;
            let page_films = self.crawl_page(page).await;

            films_scraped += page_films.len();
            progress = progress.advance(page, page_films.len());
            films.extend(page_films);
            pages_fetched += 1;

            // Records first: a page whose progress is saved is never fetched again
            if checkpoint {
                self.storage.save_results(&films)?;
            }
            self.storage.save_progress(&progress)?;

            let percent = progress.percent(expected);
            tracing::info!(
                "Films scraped: {} ({:.1}%), next page {}",
                progress.total_scraped,
                percent,
                progress.last_page
            );
            self.emit(CrawlEvent::Progress {
                last_page: progress.last_page,
                total_scraped: progress.total_scraped,
                percent,
            });
        }

        if pages_fetched == 0 {
            tracing::info!(
                "Nothing left to crawl at page {}; leaving results untouched",
                progress.last_page
            );
        } else {
            self.storage.save_results(&films)?;
        }

        self.transition(CrawlPhase::Completed)?;
        tracing::info!(
            "Crawl completed: {} pages, {} films in {:?}",
            pages_fetched,
            films_scraped,
            start_time.elapsed()
        );
        self.emit(CrawlEvent::Finished {
            total_scraped: progress.total_scraped,
        });

        Ok(CrawlReport {
            pages_fetched,
            films_scraped,
            progress,
        })
    }

    /// Fetches one listing page and processes all of its items
    ///
    /// Returns once every item task has finished. Records are in completion
    /// order.
    async fn crawl_page(&self, page: u32) -> Vec<FilmRecord> {
        let url = listing_page_url(&self.config.site, page);
        tracing::info!("Scraping page: {}", url);
        self.emit(CrawlEvent::PageStarted {
            page,
            url: url.clone(),
        });

        let items = match fetch_listing_page(self.fetcher.as_ref(), &url).await {
            PageFetchOutcome::TransportError(error) => {
                self.emit(CrawlEvent::Error {
                    context: format!("Failed to fetch page {}: {}", url, error),
                });
                return Vec::new();
            }
            outcome => outcome.into_items(),
        };

        let processor = Arc::clone(&self.processor);
        let events = self.events.clone();

        self.pool
            .run_all(items, move |item| {
                let processor = Arc::clone(&processor);
                let events = events.clone();
                async move {
                    match processor.process(item).await {
                        Ok(film) => {
                            send_event(
                                &events,
                                CrawlEvent::FilmProcessed {
                                    title: film.title.clone(),
                                },
                            );
                            Some(film)
                        }
                        Err(e) => {
                            tracing::warn!("Skipping film: {}", e);
                            send_event(
                                &events,
                                CrawlEvent::Error {
                                    context: e.to_string(),
                                },
                            );
                            None
                        }
                    }
                }
            })
            .await
    }

    /// Records the accumulator starts from
    ///
    /// A run resumed from saved progress with checkpointing picks up the
    /// records already written, otherwise the accumulator starts empty.
    fn initial_films(&self) -> Result<Vec<FilmRecord>, ScraperError> {
        if !self.resumed || !self.config.crawler.checkpoint_results {
            return Ok(Vec::new());
        }

        let films = self.storage.load_results()?.unwrap_or_default();
        if !films.is_empty() {
            tracing::info!("Loaded {} films from previous checkpoint", films.len());
        }
        Ok(films)
    }

    fn transition(&mut self, next: CrawlPhase) -> Result<(), ScraperError> {
        if !self.phase.can_transition_to(next) {
            return Err(ScraperError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::debug!("Crawl phase: {} -> {}", self.phase, next);
        self.phase = next;
        Ok(())
    }

    fn emit(&self, event: CrawlEvent) {
        send_event(&self.events, event);
    }
}

fn send_event(events: &Option<UnboundedSender<CrawlEvent>>, event: CrawlEvent) {
    if let Some(tx) = events {
        let _ = tx.send(event);
    }
}

/// Runs the main crawl operation
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `fresh` - Ignore persisted progress and start at the configured page
///
/// # Example
///
/// ```no_run
/// use film_scraper::config::load_config;
/// use film_scraper::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("scraper.toml"))?;
/// let report = run_crawl(config, false).await?;
/// println!("{} films", report.films_scraped);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config, fresh: bool) -> Result<CrawlReport, ScraperError> {
    let mut coordinator = Coordinator::new(config, fresh)?;
    coordinator.run().await
}
