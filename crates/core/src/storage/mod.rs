//! Storage layer: the vector store behind semantic retrieval.
//!
//! Documents and embeddings live in-memory in a [`Collection`]; a [`Database`]
//! maps collection names to bincode snapshots (atomic temp-file + rename,
//! CRC32 footer) in a data directory. Serving treats a loaded collection as
//! immutable, so it is shared without locks.

/// Collection and database data structures.
pub mod collection;
/// Distance metrics: cosine, euclidean, and dot product.
pub mod distance;
/// Disk persistence: snapshot save/load with atomic writes.
pub mod persistence;

pub use collection::{Collection, Database};
pub use distance::DistanceMetric;
pub use persistence::{load_collection, save_collection};

use crate::document::Document;
use crate::error::RetrievalError;
use std::sync::Arc;

/// Nearest-neighbour store queried by the semantic retriever and used to
/// hydrate ranked ids.
pub trait VectorStore: Send + Sync {
    /// Dimension of the stored embeddings.
    fn dimension(&self) -> usize;

    /// Ids of the `n` documents closest to `vector`, nearest first.
    fn query(&self, vector: &[f32], n: usize) -> Result<Vec<String>, RetrievalError>;

    /// Documents for `ids`, in request order. Unknown ids are omitted.
    fn get(&self, ids: &[&str]) -> Result<Vec<Arc<Document>>, RetrievalError>;
}

/// Bulk read of the whole corpus, used once at startup to build the lexical index.
pub trait CorpusSource {
    /// Every document, in insertion order.
    fn documents(&self) -> Vec<Arc<Document>>;
}
