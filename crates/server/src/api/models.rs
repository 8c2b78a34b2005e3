//! Request and response data transfer objects for the REST API.

use serde::{Deserialize, Serialize};

/// The search response is the orchestrator's payload, serialized as is.
pub use sustainsearch_core::search::SearchOutcome as SearchResponse;

/// Query string of `GET /search`.
///
/// Every field stays a string here so malformed values are reported with a
/// JSON error body instead of the extractor's plain-text one.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub limit: Option<String>,
    pub mode: Option<String>,
    pub sentiment_filter: Option<String>,
}

/// Response body for `GET /health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub documents: usize,
    pub collection: String,
}
