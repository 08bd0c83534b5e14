//! Statistics generation from persisted crawl files
//!
//! This module provides functionality for extracting and displaying
//! crawl statistics from the storage layer.

use crate::config::Config;
use crate::film::StreamService;
use crate::state::CrawlProgress;
use crate::storage::Storage;
use crate::ScraperError;
use std::collections::BTreeMap;

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlStatistics {
    /// Persisted progress, if a crawl has started
    pub progress: Option<CrawlProgress>,

    /// Listing pages configured for the crawl
    pub total_pages: u32,

    /// Films the crawl expects to collect
    pub expected_films: u64,

    /// Completion percentage according to the progress marker
    pub percent_complete: f64,

    /// Records in the result file (zero if it does not exist yet)
    pub films_in_results: usize,

    /// Stream link count per service
    pub links_by_service: BTreeMap<StreamService, usize>,

    /// Records with no stream link at all
    pub films_without_links: usize,

    /// Records still carrying the unknown-title placeholder
    pub untitled_films: usize,
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to read
/// * `config` - The configuration the crawl runs with
///
/// # Returns
///
/// * `Ok(CrawlStatistics)` - Successfully computed statistics
/// * `Err(ScraperError)` - A persisted file exists but cannot be read
pub fn load_statistics(
    storage: &dyn Storage,
    config: &Config,
) -> Result<CrawlStatistics, ScraperError> {
    let progress = storage.load_progress()?;
    let films = storage.load_results()?.unwrap_or_default();
    let expected_films = config.expected_films();

    let mut links_by_service = BTreeMap::new();
    for link in films.iter().flat_map(|film| &film.links) {
        *links_by_service.entry(link.service).or_insert(0) += 1;
    }

    let films_without_links = films.iter().filter(|film| film.links.is_empty()).count();
    let untitled_films = films
        .iter()
        .filter(|film| film.title == crate::film::UNKNOWN_TITLE)
        .count();

    Ok(CrawlStatistics {
        progress,
        total_pages: config.site.total_pages,
        expected_films,
        percent_complete: progress.map_or(0.0, |p| p.percent(expected_films)),
        films_in_results: films.len(),
        links_by_service,
        films_without_links,
        untitled_films,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Progress:");
    match stats.progress {
        Some(progress) => {
            println!("  Next page: {} / {}", progress.last_page, stats.total_pages);
            println!(
                "  Films scraped: {} / {} ({:.1}%)",
                progress.total_scraped, stats.expected_films, stats.percent_complete
            );
        }
        None => println!("  No crawl has been started"),
    }
    println!();

    println!("Result File:");
    println!("  Films: {}", stats.films_in_results);
    println!("  Without stream links: {}", stats.films_without_links);
    println!("  Unknown titles: {}", stats.untitled_films);
    println!();

    if !stats.links_by_service.is_empty() {
        println!("Stream Links by Service:");
        for (service, count) in &stats.links_by_service {
            println!("  {}: {}", service, count);
        }
    }
}
