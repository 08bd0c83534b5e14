//! Storage module for persisting crawl data
//!
//! This module handles everything the crawler writes to disk:
//! - The progress marker, rewritten after every listing page
//! - The result file, a JSON array of film records

mod json;
mod traits;

pub use json::JsonStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::config::OutputConfig;

/// Opens the JSON storage described by the output configuration
///
/// Nothing is touched on disk until the first save.
pub fn open_storage(output: &OutputConfig) -> JsonStorage {
    JsonStorage::new(&output.progress_path, &output.results_path)
}
