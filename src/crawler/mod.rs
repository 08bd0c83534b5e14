//! Crawler module for listing and detail page processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching of listing and detail pages
//! - HTML parsing of item blocks, stream links and film details
//! - Per-item film assembly
//! - Bounded concurrent fan-out of a page's items
//! - Overall crawl coordination and persistence

mod coordinator;
mod fetcher;
mod parser;
mod processor;
mod scheduler;

pub use coordinator::{run_crawl, Coordinator, CrawlEvent, CrawlReport};
pub use fetcher::{
    build_http_client, fetch_listing_page, fetch_url, DocumentFetcher, FetchResult, HttpFetcher,
    PageFetchOutcome,
};
pub use parser::{
    extract_film_details, extract_item_blocks, extract_stream_links, parse_listing_entry,
    ListingEntry, RawItem,
};
pub use processor::ItemProcessor;
pub use scheduler::WorkerPool;
