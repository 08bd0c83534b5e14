//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlProgress`: the resumable cursor and scraped-film counter
//! - `CrawlPhase`: the lifecycle of a single crawl run

mod crawl_phase;
mod progress;

// Re-export main types
pub use crawl_phase::CrawlPhase;
pub use progress::CrawlProgress;
