//! Hybrid retrieval: lexical and semantic rankings, reciprocal rank fusion,
//! sentiment labelling and the query orchestrator that ties them together.

/// Query orchestrator: pool sizing, retrieval dispatch, hydration, filter and limit.
pub mod engine;
/// Reciprocal Rank Fusion over candidate rankings.
pub mod hybrid;
/// Process-wide BM25 index over the corpus.
pub mod lexical;
/// Embedding + nearest-neighbour retrieval adapter.
pub mod semantic;
/// Three-way sentiment label and filter.
pub mod sentiment;
/// Retrieval modes and candidate rankings.
pub mod types;

pub use engine::{
    DisplayScore, ResultItem, RetrievalOutcome, ScoreDetail, SearchEngine, SearchOutcome,
    SearchQuery,
};
pub use hybrid::{rrf_merge, FusedEntry, FusedScores};
pub use lexical::LexicalIndex;
pub use semantic::SemanticRetriever;
pub use sentiment::{sentiment_label, SentimentFilter, SentimentLabel};
pub use types::{CandidateRanking, RankedCandidate, RetrievalMode};
