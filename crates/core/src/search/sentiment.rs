//! Three-way sentiment labelling and the matching query filter.

use crate::config;
use serde::{Deserialize, Serialize};

/// Sentiment class of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Critical,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Critical => "critical",
        }
    }
}

/// Classify a continuous sentiment score.
///
/// `>= 0.5` is positive, `<= -0.5` is critical, anything else (NaN included)
/// is neutral. Values outside [-1, 1] are not clamped.
pub fn sentiment_label(value: f64) -> SentimentLabel {
    if value >= config::SENTIMENT_POSITIVE_THRESHOLD {
        SentimentLabel::Positive
    } else if value <= config::SENTIMENT_CRITICAL_THRESHOLD {
        SentimentLabel::Critical
    } else {
        SentimentLabel::Neutral
    }
}

/// Post-retrieval sentiment filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentFilter {
    Positive,
    Neutral,
    Critical,
    #[default]
    All,
}

impl SentimentFilter {
    /// Whether a document labelled `label` passes the filter.
    pub fn matches(&self, label: SentimentLabel) -> bool {
        match self {
            SentimentFilter::All => true,
            SentimentFilter::Positive => label == SentimentLabel::Positive,
            SentimentFilter::Neutral => label == SentimentLabel::Neutral,
            SentimentFilter::Critical => label == SentimentLabel::Critical,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentFilter::Positive => "positive",
            SentimentFilter::Neutral => "neutral",
            SentimentFilter::Critical => "critical",
            SentimentFilter::All => "all",
        }
    }
}

impl std::str::FromStr for SentimentFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(SentimentFilter::Positive),
            "neutral" => Ok(SentimentFilter::Neutral),
            "critical" => Ok(SentimentFilter::Critical),
            "all" => Ok(SentimentFilter::All),
            other => Err(format!(
                "unknown sentiment_filter '{}', expected one of: positive, neutral, critical, all",
                other
            )),
        }
    }
}
