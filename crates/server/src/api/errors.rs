//! API error types mapped to HTTP status codes.
//!
//! Each [`ApiError`] variant maps to a specific HTTP status code and produces
//! a JSON response body `{"error": "message"}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use sustainsearch_core::RetrievalError;

/// Application-level error type that implements `IntoResponse`.
///
/// - `BadRequest` → 400
/// - `BadGateway` → 502
/// - `Internal` → 500
#[derive(Debug)]
pub enum ApiError {
    /// Invalid query parameters (400).
    BadRequest(String),
    /// The embedding service or vector store failed mid-query (502).
    BadGateway(String),
    /// Unexpected server error (500).
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        let body = axum::Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

impl From<RetrievalError> for ApiError {
    fn from(err: RetrievalError) -> Self {
        tracing::warn!(error = %err, "Retrieval failed");
        ApiError::BadGateway(err.to_string())
    }
}
