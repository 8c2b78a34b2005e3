//! Collection and database data structures.
//!
//! A [`Collection`] holds the climate-news documents in insertion order together
//! with one embedding per document, stored contiguously in a single arena.
//! Nearest-neighbour queries are an exact scan. A collection is filled by the
//! offline index build, saved as a snapshot, and loaded read-only for serving.
//! [`Database`] binds collection names to snapshot files in a data directory.

use crate::document::Document;
use crate::error::{ConfigurationError, RetrievalError};
use crate::storage::distance::DistanceMetric;
use crate::storage::persistence::{load_collection, save_collection, SNAPSHOT_EXTENSION};
use crate::storage::{CorpusSource, VectorStore};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::collections::{BinaryHeap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Named set of documents and their embeddings.
#[derive(Debug, Serialize, Deserialize)]
pub struct Collection {
    pub name: String,
    pub dimension: usize,
    pub metric: DistanceMetric,
    /// Documents in insertion order. Position = internal id.
    pub documents: Vec<Arc<Document>>,
    /// `documents.len() * dimension` floats, row-major.
    pub embeddings: Vec<f32>,
    /// Document id → internal id. Rebuilt after deserialization.
    #[serde(skip)]
    id_to_internal: HashMap<String, u32>,
}

impl Collection {
    /// Creates a new empty collection.
    pub fn new(name: impl Into<String>, dimension: usize, metric: DistanceMetric) -> Self {
        Self {
            name: name.into(),
            dimension,
            metric,
            documents: Vec::new(),
            embeddings: Vec::new(),
            id_to_internal: HashMap::new(),
        }
    }

    /// Appends a document with its embedding. Returns the internal id.
    pub fn insert(
        &mut self,
        doc: Document,
        embedding: Vec<f32>,
    ) -> Result<u32, ConfigurationError> {
        if embedding.len() != self.dimension {
            return Err(ConfigurationError::DimensionMismatch {
                name: self.name.clone(),
                expected: self.dimension,
                got: embedding.len(),
            });
        }
        if self.id_to_internal.contains_key(&doc.id) {
            return Err(ConfigurationError::DuplicateDocument(doc.id));
        }
        let internal_id = self.documents.len() as u32;
        self.id_to_internal.insert(doc.id.clone(), internal_id);
        self.embeddings.extend_from_slice(&embedding);
        self.documents.push(Arc::new(doc));
        Ok(internal_id)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Retrieves a document by id, or `None` if not found.
    pub fn get_document(&self, id: &str) -> Option<&Arc<Document>> {
        let internal_id = *self.id_to_internal.get(id)?;
        self.documents.get(internal_id as usize)
    }

    /// Embedding of the document at `internal_id`.
    pub fn embedding(&self, internal_id: u32) -> &[f32] {
        let start = internal_id as usize * self.dimension;
        &self.embeddings[start..start + self.dimension]
    }

    /// Exact k-nearest-neighbour scan.
    ///
    /// Returns up to `n` `(distance, internal_id)` pairs by ascending distance;
    /// equal distances keep insertion order.
    pub fn nearest(&self, query: &[f32], n: usize) -> Vec<(f32, u32)> {
        if n == 0 {
            return Vec::new();
        }
        // Max-heap of size n: the worst kept candidate sits on top
        let mut heap: BinaryHeap<(OrderedFloat<f32>, u32)> = BinaryHeap::with_capacity(n + 1);
        for internal_id in 0..self.documents.len() as u32 {
            let distance = self.metric.distance(query, self.embedding(internal_id));
            heap.push((OrderedFloat(distance), internal_id));
            if heap.len() > n {
                heap.pop();
            }
        }
        heap.into_sorted_vec()
            .into_iter()
            .map(|(d, id)| (d.0, id))
            .collect()
    }

    /// Rebuild the id lookup from `documents`. Called after deserialization.
    pub(crate) fn rebuild_lookup(&mut self) -> Result<(), String> {
        self.id_to_internal.clear();
        self.id_to_internal.reserve(self.documents.len());
        for (i, doc) in self.documents.iter().enumerate() {
            if self.id_to_internal.insert(doc.id.clone(), i as u32).is_some() {
                return Err(format!("duplicate document id '{}'", doc.id));
            }
        }
        Ok(())
    }

    /// Validate internal invariants after deserialization.
    pub fn validate(&self) -> Result<(), String> {
        if self.dimension == 0 || self.dimension > crate::config::MAX_DIMENSION {
            return Err(format!(
                "dimension {} out of range 1-{}",
                self.dimension,
                crate::config::MAX_DIMENSION
            ));
        }
        let expected = self.documents.len() * self.dimension;
        if self.embeddings.len() != expected {
            return Err(format!(
                "embedding arena holds {} floats, expected {} ({} docs x {} dims)",
                self.embeddings.len(),
                expected,
                self.documents.len(),
                self.dimension
            ));
        }
        if self.id_to_internal.len() != self.documents.len() {
            return Err("id lookup out of sync with documents".to_string());
        }
        Ok(())
    }
}

impl VectorStore for Collection {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn query(&self, vector: &[f32], n: usize) -> Result<Vec<String>, RetrievalError> {
        if vector.len() != self.dimension {
            return Err(RetrievalError::DimensionMismatch {
                expected: self.dimension,
                got: vector.len(),
            });
        }
        Ok(self
            .nearest(vector, n)
            .into_iter()
            .map(|(_, internal_id)| self.documents[internal_id as usize].id.clone())
            .collect())
    }

    fn get(&self, ids: &[&str]) -> Result<Vec<Arc<Document>>, RetrievalError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.get_document(id).cloned())
            .collect())
    }
}

impl CorpusSource for Collection {
    fn documents(&self) -> Vec<Arc<Document>> {
        self.documents.clone()
    }
}

/// Directory of named collection snapshots.
#[derive(Debug, Clone)]
pub struct Database {
    data_dir: PathBuf,
}

impl Database {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Snapshot file backing collection `name`.
    pub fn snapshot_path(&self, name: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}.{}", name, SNAPSHOT_EXTENSION))
    }

    /// Loads an existing collection. Fails if no snapshot exists for `name`.
    pub fn get_collection(&self, name: &str) -> Result<Collection, ConfigurationError> {
        validate_collection_name(name)?;
        let path = self.snapshot_path(name);
        if !path.exists() {
            return Err(ConfigurationError::CollectionNotFound(name.to_string()));
        }
        load_collection(&path)
    }

    /// Loads collection `name`, or creates an empty one with `dimension` and
    /// `metric` if it has no snapshot yet.
    pub fn get_or_create_collection(
        &self,
        name: &str,
        dimension: usize,
        metric: DistanceMetric,
    ) -> Result<Collection, ConfigurationError> {
        match self.get_collection(name) {
            Ok(collection) if collection.dimension != dimension => {
                Err(ConfigurationError::DimensionMismatch {
                    name: name.to_string(),
                    expected: collection.dimension,
                    got: dimension,
                })
            }
            Ok(collection) => Ok(collection),
            Err(ConfigurationError::CollectionNotFound(_)) => {
                Ok(Collection::new(name, dimension, metric))
            }
            Err(e) => Err(e),
        }
    }

    /// Writes the collection's snapshot into the data directory.
    pub fn save(&self, collection: &Collection) -> Result<PathBuf, ConfigurationError> {
        validate_collection_name(&collection.name)?;
        save_collection(collection, &self.data_dir)
    }
}

fn validate_collection_name(name: &str) -> Result<(), ConfigurationError> {
    if name.is_empty()
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ConfigurationError::Invalid(format!(
            "collection name '{}' must be non-empty and contain only alphanumeric characters, '_', or '-'",
            name
        )));
    }
    Ok(())
}
