//! BM25 full-text search engine.
//!
//! Implements Okapi BM25 scoring with an inverted index for keyword search.
//! Documents are tokenized into lowercase ASCII alphanumeric terms. No stop
//! words and no stemming are applied.

/// Inverted index data structure with postings lists and IDF table.
pub mod inverted_index;
/// BM25 Okapi scoring and stable top-n ranking.
pub mod scorer;
/// Lowercase alphanumeric tokenizer.
pub mod tokenizer;

pub use inverted_index::InvertedIndex;
pub use scorer::{bm25_scores, bm25_search};
pub use tokenizer::{tokenize, Tokens};
