//! Prometheus metrics recording.

use metrics::{counter, gauge, histogram};
use std::time::Duration;

/// Records HTTP request metrics.
pub fn record_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];
    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());
}

/// Records a completed search and how many results it returned.
pub fn record_search(mode: &str, sentiment_filter: &str, results: usize) {
    counter!(
        "sustainsearch_search_total",
        "mode" => mode.to_string(),
        "sentiment_filter" => sentiment_filter.to_string()
    )
    .increment(1);
    histogram!("sustainsearch_search_results", "mode" => mode.to_string()).record(results as f64);
}

/// Sets the `sustainsearch_documents_total` gauge for the served collection.
pub fn set_document_count(collection: &str, documents: usize) {
    gauge!("sustainsearch_documents_total", "collection" => collection.to_string())
        .set(documents as f64);
}
