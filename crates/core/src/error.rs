//! Error taxonomy for the retrieval core.
//!
//! [`ConfigurationError`] covers everything that can go wrong while binding the
//! corpus and vector store at startup; the process must not serve traffic after
//! one. [`RetrievalError`] covers per-query failures of the external
//! collaborators (embedding model, vector store) and is surfaced to the caller
//! as a failed request.
//!
//! A ranked id without a stored document is not an error: hydration drops it.

use std::io;
use std::path::PathBuf;

/// Startup failure: the corpus or vector store is unavailable or unusable.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("snapshot I/O failed for {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("snapshot {path:?} is corrupt: {reason}")]
    CorruptSnapshot { path: PathBuf, reason: String },
    #[error("collection '{0}' not found")]
    CollectionNotFound(String),
    #[error("collection '{name}' has dimension {expected}, got {got}")]
    DimensionMismatch {
        name: String,
        expected: usize,
        got: usize,
    },
    #[error("duplicate document id '{0}'")]
    DuplicateDocument(String),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Per-query failure of an external collaborator.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("embedding failed: {0}")]
    Embedding(String),
    #[error("query vector has dimension {got}, store expects {expected}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("vector store failed: {0}")]
    Store(String),
}
