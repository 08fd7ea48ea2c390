//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::state::CrawlRecord;
use crate::storage::PageArtifacts;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: String,
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// Backends only move bytes; freshness and validity decisions live in the
/// cache loader and the scheduler.
pub trait Storage {
    // ===== Initialization =====

    /// Creates the output locations
    ///
    /// Failure here is fatal for the run.
    fn initialize(&mut self) -> StorageResult<()>;

    // ===== Page Records =====

    /// Lists every record key with at least one persisted artifact
    fn list_record_keys(&self) -> StorageResult<Vec<String>>;

    /// Reads whatever artifacts exist for a key
    fn read_artifacts(&self, key: &str) -> StorageResult<PageArtifacts>;

    /// Persists a record with its raw and rendered documents
    ///
    /// Returns the record key the page was stored under.
    fn save_page(
        &mut self,
        record: &CrawlRecord,
        raw_html: &str,
        rendered: &str,
    ) -> StorageResult<String>;

    // ===== Run Artifacts =====

    /// Writes the run manifest
    fn write_manifest(&mut self, manifest_json: &str) -> StorageResult<()>;

    /// Reads the manifest of the last run, if any
    fn read_manifest(&self) -> StorageResult<Option<String>>;

    /// Writes the concatenated corpus
    fn write_corpus(&mut self, corpus: &str) -> StorageResult<()>;
}
