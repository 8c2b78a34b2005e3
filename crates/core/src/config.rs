//! Global configuration constants for SustainSearch.
//!
//! Ranking parameters, request limits, and server defaults are defined here.
//! These are compile-time constants; runtime configuration is handled via CLI
//! arguments and environment variables in the server binary.

/// BM25 Okapi term frequency saturation parameter.
///
/// Controls how quickly term frequency saturates. Higher values allow TF to grow more.
pub const BM25_K1: f64 = 1.5;

/// BM25 Okapi document length normalization parameter.
///
/// 0.0 = no normalization, 1.0 = full normalization.
pub const BM25_B: f64 = 0.75;

/// Floor factor for negative IDF values.
///
/// A term that appears in more than half of the corpus has a negative raw IDF;
/// its IDF is replaced by `BM25_EPSILON * average_idf`.
pub const BM25_EPSILON: f64 = 0.25;

/// Reciprocal Rank Fusion (RRF) constant `k`.
///
/// Used in the formula `1 / (k + rank)` to combine ranked lists.
pub const RRF_K: usize = 60;

/// Default number of results returned by a search.
pub const DEFAULT_LIMIT: usize = 8;

/// Maximum number of results per search request.
pub const MAX_LIMIT: usize = 100;

/// Candidate pool multiplier applied to the requested limit.
///
/// Sentiment filtering discards an unpredictable share of the pool, so each
/// retrieval strategy is asked for `limit * CANDIDATE_POOL_MULTIPLIER` candidates.
pub const CANDIDATE_POOL_MULTIPLIER: usize = 6;

/// Lower bound on the candidate pool size.
pub const CANDIDATE_POOL_FLOOR: usize = 40;

/// Sentiment values at or above this are labelled positive.
pub const SENTIMENT_POSITIVE_THRESHOLD: f64 = 0.5;

/// Sentiment values at or below this are labelled critical.
pub const SENTIMENT_CRITICAL_THRESHOLD: f64 = -0.5;

/// Sentiment assumed when a document carries no usable sentiment value.
pub const DEFAULT_SENTIMENT: f64 = 0.0;

/// Decimal places kept when displaying fused RRF scores.
pub const SCORE_DECIMALS: i32 = 6;

/// Title used when a document carries none.
pub const DEFAULT_TITLE: &str = "Untitled";

/// Name of the collection holding the climate-news corpus.
pub const DEFAULT_COLLECTION: &str = "climate_search";

/// Default HTTP server port.
pub const DEFAULT_PORT: u16 = 7860;

/// Default directory for collection snapshots.
pub const DEFAULT_DATA_DIR: &str = "./vector_db";

/// Default directory of cleaned JSON records read by the index builder.
pub const DEFAULT_INPUT_DIR: &str = "data/cleaned";

/// Maximum allowed embedding dimension.
pub const MAX_DIMENSION: usize = 4096;

/// Per-request timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of concurrent in-flight requests.
pub const MAX_CONCURRENT_REQUESTS: usize = 256;

/// Embedding model requested from the embedding service.
pub const DEFAULT_EMBEDDING_MODEL: &str = "all-MiniLM-L6-v2";

/// OpenAI-compatible embeddings endpoint.
pub const DEFAULT_EMBEDDING_URL: &str = "http://127.0.0.1:8080/v1/embeddings";

/// Log index-build progress every this many documents.
pub const BUILD_PROGRESS_INTERVAL: usize = 50;

/// Candidate pool sizing heuristic.
///
/// `pool_size(limit) = max(limit * multiplier, floor)`. This is a tuning knob
/// against filter starvation, not a proven bound: heavy sentiment filtering
/// can still leave fewer than `limit` results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSizing {
    pub multiplier: usize,
    pub floor: usize,
}

impl PoolSizing {
    /// Number of candidates each retrieval strategy should return for `limit`.
    pub fn pool_size(&self, limit: usize) -> usize {
        limit.saturating_mul(self.multiplier).max(self.floor)
    }
}

impl Default for PoolSizing {
    fn default() -> Self {
        Self {
            multiplier: CANDIDATE_POOL_MULTIPLIER,
            floor: CANDIDATE_POOL_FLOOR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_size_floor() {
        let sizing = PoolSizing::default();
        assert_eq!(sizing.pool_size(1), 40);
        assert_eq!(sizing.pool_size(6), 40);
        assert_eq!(sizing.pool_size(0), 40);
    }

    #[test]
    fn test_pool_size_multiplier() {
        let sizing = PoolSizing::default();
        assert_eq!(sizing.pool_size(7), 42);
        assert_eq!(sizing.pool_size(100), 600);
    }

    #[test]
    fn test_pool_size_custom() {
        let sizing = PoolSizing {
            multiplier: 2,
            floor: 3,
        };
        assert_eq!(sizing.pool_size(1), 3);
        assert_eq!(sizing.pool_size(5), 10);
    }
}
