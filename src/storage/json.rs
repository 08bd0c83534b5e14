//! JSON file storage implementation
//!
//! This module provides a file-based implementation of the Storage trait.
//! Files are pretty-printed with four-space indentation and UTF-8 text is
//! written literally, never as `\u` escapes.

use crate::film::FilmRecord;
use crate::state::CrawlProgress;
use crate::storage::traits::{Storage, StorageResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// JSON file storage backend
#[derive(Debug, Clone)]
pub struct JsonStorage {
    progress_path: PathBuf,
    results_path: PathBuf,
}

impl JsonStorage {
    /// Creates a storage writing the progress marker and results to the given paths
    pub fn new(progress_path: impl AsRef<Path>, results_path: impl AsRef<Path>) -> Self {
        Self {
            progress_path: progress_path.as_ref().to_path_buf(),
            results_path: results_path.as_ref().to_path_buf(),
        }
    }

    pub fn progress_path(&self) -> &Path {
        &self.progress_path
    }

    pub fn results_path(&self) -> &Path {
        &self.results_path
    }
}

impl Storage for JsonStorage {
    fn load_progress(&self) -> StorageResult<Option<CrawlProgress>> {
        read_json(&self.progress_path)
    }

    fn save_progress(&mut self, progress: &CrawlProgress) -> StorageResult<()> {
        write_json(&self.progress_path, progress)?;
        tracing::trace!(
            "Saved progress to {}: page {}, {} scraped",
            self.progress_path.display(),
            progress.last_page,
            progress.total_scraped
        );
        Ok(())
    }

    fn load_results(&self) -> StorageResult<Option<Vec<FilmRecord>>> {
        read_json(&self.results_path)
    }

    fn save_results(&mut self, films: &[FilmRecord]) -> StorageResult<()> {
        write_json(&self.results_path, films)?;
        tracing::debug!(
            "Saved {} films to {}",
            films.len(),
            self.results_path.display()
        );
        Ok(())
    }
}

/// Reads a JSON file, treating a missing file as `None`
fn read_json<T: DeserializeOwned>(path: &Path) -> StorageResult<Option<T>> {
    let content = match std::fs::read(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(serde_json::from_slice(&content)?))
}

/// Serializes `value` with four-space indentation and replaces `path`
///
/// The document is written to a temporary file next to `path` and renamed
/// over it, so readers only ever see the old or the new contents.
fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> StorageResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent)?;
            parent
        }
        _ => Path::new("."),
    };

    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    buffer.push(b'\n');

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(&buffer)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
