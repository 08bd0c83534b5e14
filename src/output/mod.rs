//! Output module for reporting on crawl results
//!
//! This module handles:
//! - Summarising the persisted progress marker and result file
//! - Printing those statistics for the command line

pub mod stats;

pub use stats::{load_statistics, print_statistics, CrawlStatistics};
