//! # sustainsearch-core
//!
//! Hybrid retrieval engine for a static corpus of climate-news articles.
//! Queries run against an in-memory BM25 index and an embedding-based vector
//! store; the two rankings are merged with Reciprocal Rank Fusion and then
//! filtered by sentiment.
//!
//! This crate has no async dependencies. The embedding model and the vector
//! store are reached through the synchronous [`embedding::Embedder`] and
//! [`storage::VectorStore`] traits.

/// BM25 full-text search: tokenizer, inverted index and Okapi BM25 scoring.
pub mod bm25;
/// Global configuration constants: limits, defaults, and tuning parameters.
pub mod config;
/// Core document type: `Document` struct and `MetadataValue` enum.
pub mod document;
/// Embedding model seam.
pub mod embedding;
/// Startup and per-query error types.
pub mod error;
/// Retrieval strategies, rank fusion, sentiment and the query orchestrator.
pub mod search;
/// Storage layer: exact-scan collections, the snapshot database, and disk persistence.
pub mod storage;

pub use config::PoolSizing;
pub use document::{Document, MetadataValue};
pub use embedding::Embedder;
pub use error::{ConfigurationError, RetrievalError};
pub use search::{SearchEngine, SearchOutcome, SearchQuery};
pub use storage::{Collection, CorpusSource, Database, DistanceMetric, VectorStore};
