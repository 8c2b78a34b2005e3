//! Semantic retrieval: embed the query, rank by the store's nearest-neighbour order.

use crate::embedding::Embedder;
use crate::error::RetrievalError;
use crate::search::types::CandidateRanking;
use crate::storage::VectorStore;
use std::sync::Arc;

/// Adapter over an external embedding model and vector store.
///
/// The store's ordering (ascending distance) is trusted as is; ranks are
/// assigned over it without re-scoring.
#[derive(Clone)]
pub struct SemanticRetriever {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
}

impl SemanticRetriever {
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn VectorStore>) -> Self {
        Self { embedder, store }
    }

    pub fn search(&self, query: &str, n: usize) -> Result<CandidateRanking, RetrievalError> {
        let vector = self.embedder.encode(query)?;
        let ids = self.store.query(&vector, n)?;
        Ok(CandidateRanking::from_ordered_ids(ids))
    }
}

impl std::fmt::Debug for SemanticRetriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticRetriever")
            .field("dimension", &self.store.dimension())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::storage::{Collection, DistanceMetric};

    struct FixedEmbedder(Vec<f32>);

    impl Embedder for FixedEmbedder {
        fn encode(&self, _text: &str) -> Result<Vec<f32>, RetrievalError> {
            Ok(self.0.clone())
        }
    }

    struct FailingEmbedder;

    impl Embedder for FailingEmbedder {
        fn encode(&self, _text: &str) -> Result<Vec<f32>, RetrievalError> {
            Err(RetrievalError::Embedding("model offline".into()))
        }
    }

    fn store() -> Arc<Collection> {
        let mut col = Collection::new("test", 2, DistanceMetric::Euclidean);
        for (id, v) in [("far", [5.0, 5.0]), ("near", [1.0, 0.0]), ("mid", [2.0, 2.0])] {
            col.insert(Document::with_fields(id, id, id, None, 0.0), v.to_vec())
                .unwrap();
        }
        Arc::new(col)
    }

    #[test]
    fn test_ranks_follow_store_order() {
        let retriever = SemanticRetriever::new(Arc::new(FixedEmbedder(vec![1.0, 0.0])), store());
        let ranking = retriever.search("q", 2).unwrap();
        let pairs: Vec<(&str, usize)> = ranking.iter().map(|c| (c.id.as_str(), c.rank)).collect();
        assert_eq!(pairs, vec![("near", 1), ("mid", 2)]);
    }

    #[test]
    fn test_embedding_failure_propagates() {
        let retriever = SemanticRetriever::new(Arc::new(FailingEmbedder), store());
        assert!(matches!(
            retriever.search("q", 2),
            Err(RetrievalError::Embedding(_))
        ));
    }

    #[test]
    fn test_dimension_mismatch_is_retrieval_error() {
        let retriever =
            SemanticRetriever::new(Arc::new(FixedEmbedder(vec![1.0, 0.0, 0.0])), store());
        assert!(matches!(
            retriever.search("q", 2),
            Err(RetrievalError::DimensionMismatch { expected: 2, got: 3 })
        ));
    }
}
