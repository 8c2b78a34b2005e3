//! HTTP client for an OpenAI-compatible embeddings endpoint.
//!
//! The retrieval core calls [`Embedder::encode`] synchronously from a blocking
//! worker; the request itself runs on the tokio runtime through a stored
//! [`Handle`]. Async callers (the index builder) use [`HttpEmbedder::embed`]
//! directly.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use sustainsearch_core::config;
use sustainsearch_core::{Embedder, RetrievalError};
use tokio::runtime::Handle;

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Embedding function backed by a remote model server.
#[derive(Debug, Clone)]
pub struct HttpEmbedder {
    client: Client,
    url: String,
    model: String,
    handle: Handle,
}

impl HttpEmbedder {
    /// Must be called from within a tokio runtime.
    pub fn new(url: impl Into<String>, model: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config::REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
            model: model.into(),
            handle: Handle::current(),
        })
    }

    /// Embeds `text` with one request. No retries.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>, RetrievalError> {
        let request = EmbeddingRequest {
            model: &self.model,
            input: text,
        };
        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| RetrievalError::Embedding(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Embedding service error");
            return Err(RetrievalError::Embedding(format!(
                "embedding service returned HTTP {}",
                status
            )));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| RetrievalError::Embedding(format!("invalid response: {}", e)))?;
        parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| RetrievalError::Embedding("response carried no embedding".to_string()))
    }
}

impl Embedder for HttpEmbedder {
    fn encode(&self, text: &str) -> Result<Vec<f32>, RetrievalError> {
        self.handle.block_on(self.embed(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/v1/embeddings", addr)
    }

    fn echo_length_router() -> Router {
        Router::new().route(
            "/v1/embeddings",
            post(|Json(body): Json<Value>| async move {
                let len = body["input"].as_str().map(str::len).unwrap_or(0) as f32;
                Json(json!({ "data": [{ "embedding": [len, 1.0] }] }))
            }),
        )
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_embed_parses_first_embedding() {
        let url = spawn_stub(echo_length_router()).await;
        let embedder = HttpEmbedder::new(url, "test-model").unwrap();
        assert_eq!(embedder.embed("four").await.unwrap(), vec![4.0, 1.0]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_encode_from_blocking_thread() {
        let url = spawn_stub(echo_length_router()).await;
        let embedder = HttpEmbedder::new(url, "test-model").unwrap();
        let vector = tokio::task::spawn_blocking(move || embedder.encode("abc"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(vector, vec![3.0, 1.0]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_error_status_is_embedding_error() {
        let router = Router::new().route(
            "/v1/embeddings",
            post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "model loading") }),
        );
        let url = spawn_stub(router).await;
        let embedder = HttpEmbedder::new(url, "test-model").unwrap();
        assert!(matches!(
            embedder.embed("x").await,
            Err(RetrievalError::Embedding(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_empty_data_is_embedding_error() {
        let router = Router::new().route(
            "/v1/embeddings",
            post(|| async { Json(json!({ "data": [] })) }),
        );
        let url = spawn_stub(router).await;
        let embedder = HttpEmbedder::new(url, "test-model").unwrap();
        assert!(embedder.embed("x").await.is_err());
    }
}
