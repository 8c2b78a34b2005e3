//! Offline index build from cleaned JSON news records.
//!
//! Reads one record per `*.json` file, embeds its content, and writes a fresh
//! collection snapshot. An existing snapshot is replaced wholesale.

use crate::embedder::HttpEmbedder;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use sustainsearch_core::config;
use sustainsearch_core::{
    Collection, ConfigurationError, Database, DistanceMetric, Document, RetrievalError,
};

/// Index build failure.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid record {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no JSON files found in {0:?}")]
    Empty(PathBuf),
    #[error("embedding '{id}' failed: {source}")]
    Embedding {
        id: String,
        #[source]
        source: RetrievalError,
    },
    #[error(transparent)]
    Store(#[from] ConfigurationError),
}

/// One cleaned news record.
#[derive(Debug, Clone, Deserialize)]
pub struct NewsRecord {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// Kept loose: upstream data carries numbers, numeric strings, or junk.
    #[serde(default)]
    pub sentiment: Option<Value>,
    pub content: String,
}

impl NewsRecord {
    /// Numeric sentiment, coerced to neutral when missing or non-numeric.
    pub fn sentiment_score(&self) -> f64 {
        let value = match &self.sentiment {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        };
        value
            .filter(|v| v.is_finite())
            .unwrap_or(config::DEFAULT_SENTIMENT)
    }

    pub fn into_document(self) -> Document {
        let sentiment = self.sentiment_score();
        Document::with_fields(
            self.id,
            self.content,
            self.title.unwrap_or_else(|| config::DEFAULT_TITLE.to_string()),
            self.url,
            sentiment,
        )
    }
}

/// Reads every `*.json` record in `dir`, ordered by file name.
pub fn read_records(dir: &Path) -> Result<Vec<NewsRecord>, BuildError> {
    let io_err = |path: &Path, source: std::io::Error| BuildError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|e| io_err(dir, e))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    if files.is_empty() {
        return Err(BuildError::Empty(dir.to_path_buf()));
    }

    files
        .iter()
        .map(|path| {
            let raw = fs::read(path).map_err(|e| io_err(path, e))?;
            serde_json::from_slice(&raw).map_err(|source| BuildError::Parse {
                path: path.clone(),
                source,
            })
        })
        .collect()
}

/// Embeds `records` and writes them as collection `name` into `db`.
///
/// The embedding dimension is taken from the first record. The collection is
/// built in memory and only replaces an existing snapshot once every record has
/// been embedded, so a failed rebuild leaves the previous snapshot intact.
pub async fn build_collection(
    db: &Database,
    name: &str,
    records: Vec<NewsRecord>,
    embedder: &HttpEmbedder,
) -> Result<PathBuf, BuildError> {
    let total = records.len();
    let mut collection: Option<Collection> = None;

    for (i, record) in records.into_iter().enumerate() {
        let embedding = embedder
            .embed(&record.content)
            .await
            .map_err(|source| BuildError::Embedding {
                id: record.id.clone(),
                source,
            })?;
        let col = collection.get_or_insert_with(|| {
            Collection::new(name, embedding.len(), DistanceMetric::default())
        });
        col.insert(record.into_document(), embedding)?;

        if (i + 1) % config::BUILD_PROGRESS_INTERVAL == 0 {
            tracing::info!(indexed = i + 1, total, "Indexing progress");
        }
    }

    let collection = collection.ok_or_else(|| BuildError::Empty(db.data_dir().to_path_buf()))?;
    let path = db.save(&collection)?;
    tracing::info!(
        collection = %name,
        documents = collection.len(),
        dimension = collection.dimension,
        path = %path.display(),
        "Index build complete"
    );
    Ok(path)
}
