//! Embedding model seam.

use crate::error::RetrievalError;

/// Maps text to a fixed-length vector.
///
/// Implementations must be deterministic for a given model version: the corpus
/// is embedded once offline and queries are embedded with the same model.
pub trait Embedder: Send + Sync {
    fn encode(&self, text: &str) -> Result<Vec<f32>, RetrievalError>;
}
