//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::film::FilmRecord;
use crate::state::CrawlProgress;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// Saves overwrite what was stored before; nothing is ever appended.
pub trait Storage {
    // ===== Progress =====

    /// Loads the persisted progress marker, if one exists
    fn load_progress(&self) -> StorageResult<Option<CrawlProgress>>;

    /// Replaces the persisted progress marker
    fn save_progress(&mut self, progress: &CrawlProgress) -> StorageResult<()>;

    // ===== Results =====

    /// Loads the persisted film records, if a result file exists
    fn load_results(&self) -> StorageResult<Option<Vec<FilmRecord>>>;

    /// Replaces the persisted film records
    fn save_results(&mut self, films: &[FilmRecord]) -> StorageResult<()>;
}
