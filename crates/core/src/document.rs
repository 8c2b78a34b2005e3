//! Core document types for SustainSearch.
//!
//! A `Document` is an immutable climate-news record: a unique string id, the
//! article body that both retrieval strategies index, and key-value metadata
//! carrying `title`, `url` and `sentiment`. Documents are written once by the
//! offline index build and never mutated at query time.

use crate::config;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata key holding the article headline.
pub const TITLE_KEY: &str = "title";
/// Metadata key holding the source link.
pub const URL_KEY: &str = "url";
/// Metadata key holding the sentiment score.
pub const SENTIMENT_KEY: &str = "sentiment";

/// A typed metadata value attached to a document.
///
/// Uses the default externally-tagged serde representation for bincode compatibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MetadataValue {
    /// Boolean value (`true` / `false`).
    Boolean(bool),
    /// 64-bit signed integer.
    Integer(i64),
    /// 64-bit floating-point number.
    Float(f64),
    /// UTF-8 string.
    String(String),
}

impl MetadataValue {
    /// Numeric view of the value. Strings are parsed; booleans and
    /// unparseable strings have no numeric value.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetadataValue::Float(f) => Some(*f),
            MetadataValue::Integer(i) => Some(*i as f64),
            MetadataValue::String(s) => s.trim().parse().ok(),
            MetadataValue::Boolean(_) => None,
        }
    }

    /// String view of the value, `None` for non-string values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetadataValue::String(s) => Some(s),
            _ => None,
        }
    }
}

/// A stored document with text content, unique ID, and metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier, e.g. `news_42`.
    pub id: String,
    /// Article body, indexed by BM25 and embedded for vector search.
    pub text: String,
    /// Arbitrary key-value metadata.
    pub metadata: HashMap<String, MetadataValue>,
}

impl Document {
    /// Creates a document with the given id, body and metadata.
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        metadata: HashMap<String, MetadataValue>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            metadata,
        }
    }

    /// Creates a document carrying the three well-known metadata fields.
    pub fn with_fields(
        id: impl Into<String>,
        text: impl Into<String>,
        title: impl Into<String>,
        url: Option<String>,
        sentiment: f64,
    ) -> Self {
        let mut metadata = HashMap::with_capacity(3);
        metadata.insert(TITLE_KEY.to_string(), MetadataValue::String(title.into()));
        metadata.insert(
            URL_KEY.to_string(),
            MetadataValue::String(url.unwrap_or_default()),
        );
        metadata.insert(SENTIMENT_KEY.to_string(), MetadataValue::Float(sentiment));
        Self::new(id, text, metadata)
    }

    /// Headline, or `"Untitled"` when absent.
    pub fn title(&self) -> &str {
        self.metadata
            .get(TITLE_KEY)
            .and_then(MetadataValue::as_str)
            .unwrap_or(config::DEFAULT_TITLE)
    }

    /// Source link; an empty string counts as absent.
    pub fn url(&self) -> Option<&str> {
        self.metadata
            .get(URL_KEY)
            .and_then(MetadataValue::as_str)
            .filter(|u| !u.is_empty())
    }

    /// Sentiment score. Missing or non-numeric values coerce to neutral (0.0).
    pub fn sentiment(&self) -> f64 {
        self.metadata
            .get(SENTIMENT_KEY)
            .and_then(MetadataValue::as_f64)
            .filter(|v| !v.is_nan())
            .unwrap_or(config::DEFAULT_SENTIMENT)
    }
}
