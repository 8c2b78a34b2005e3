//! HTTP surface and index builder for SustainSearch.
//!
//! Provides the REST API, the HTTP embedding client, and the offline corpus
//! build. Retrieval logic lives in `sustainsearch-core`.

/// REST API layer: Axum router, HTTP handlers, models, metrics.
pub mod api;
/// Offline index build from cleaned JSON records.
pub mod corpus;
/// OpenAI-compatible HTTP embedding client.
pub mod embedder;
