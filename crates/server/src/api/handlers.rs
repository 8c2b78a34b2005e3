//! HTTP request handlers and shared application state.

use crate::api::errors::ApiError;
use crate::api::metrics;
use crate::api::models::{HealthResponse, SearchParams, SearchResponse};
use axum::extract::{Query, State};
use axum::Json;
use metrics_exporter_prometheus::PrometheusHandle;
use std::time::Instant;
use sustainsearch_core::config;
use sustainsearch_core::search::{RetrievalMode, SentimentFilter};
use sustainsearch_core::{SearchEngine, SearchQuery};

/// Shared application state passed to all handlers via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub engine: SearchEngine,
    /// Name of the served collection, reported by `/health`.
    pub collection: String,
    pub prometheus_handle: PrometheusHandle,
    pub start_time: Instant,
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        documents: state.engine.document_count(),
        collection: state.collection.clone(),
    })
}

/// `GET /search?q=&limit=&mode=&sentiment_filter=`
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let q = params
        .q
        .ok_or_else(|| ApiError::BadRequest("missing query parameter 'q'".to_string()))?;

    let limit = match params.limit.as_deref() {
        Some(raw) => raw.trim().parse::<usize>().ok(),
        None => Some(config::DEFAULT_LIMIT),
    }
    .filter(|limit| (1..=config::MAX_LIMIT).contains(limit))
    .ok_or_else(|| {
        ApiError::BadRequest(format!("limit must be an integer in 1-{}", config::MAX_LIMIT))
    })?;

    let mode: RetrievalMode = match params.mode.as_deref() {
        Some(raw) => raw.parse().map_err(ApiError::BadRequest)?,
        None => RetrievalMode::default(),
    };
    let sentiment_filter: SentimentFilter = match params.sentiment_filter.as_deref() {
        Some(raw) => raw.parse().map_err(ApiError::BadRequest)?,
        None => SentimentFilter::default(),
    };

    let query = SearchQuery::new(q)
        .with_limit(limit)
        .with_mode(mode)
        .with_sentiment_filter(sentiment_filter);

    // Collaborators are synchronous; keep them off the async workers
    let engine = state.engine.clone();
    let outcome = tokio::task::spawn_blocking(move || engine.search(&query))
        .await
        .map_err(|e| {
            tracing::error!("Search worker failed: {}", e);
            ApiError::Internal("search worker failed".to_string())
        })??;

    metrics::record_search(mode.as_str(), sentiment_filter.as_str(), outcome.total_results);
    Ok(Json(outcome))
}

/// `GET /metrics`
pub async fn metrics_endpoint(State(state): State<AppState>) -> String {
    metrics::set_document_count(&state.collection, state.engine.document_count());
    state.prometheus_handle.render()
}
