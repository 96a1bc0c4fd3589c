//! In-memory vector storage

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::distance::DistanceMetric;
use crate::element::{Element, ElementKind};
use crate::error::{Result, VectorDbError};
use crate::flat_index::FlatIndex;
use crate::index::IndexBackend;
use crate::search::Scored;
use crate::vector::{Values, Vector};

/// Metadata associated with a vector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Metadata {
    fields: HashMap<String, String>,
}

impl Metadata {
    pub fn new() -> Self {
        Self {
            fields: HashMap::new(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.fields.get(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.fields.iter()
    }
}

impl From<HashMap<String, String>> for Metadata {
    fn from(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }
}

/// Ordered in-memory collection of vectors with a pluggable search backend.
///
/// Identifiers are not required to be unique. [`get`](Self::get) and
/// [`remove`](Self::remove) act on the first record with a matching id.
/// Dimensions are not enforced across records; a mismatch only surfaces when
/// a metric compares the two vectors.
#[derive(Debug)]
pub struct VectorStore<T: Element, I: IndexBackend<T> = FlatIndex> {
    index: I,
    /// Records in insertion order
    vectors: Vec<Vector<T>>,
    /// Metadata, parallel to `vectors`
    metadata: Vec<Metadata>,
}

impl<T: Element> VectorStore<T, FlatIndex> {
    /// Create an empty vector store with a brute-force flat index.
    pub fn new() -> Self {
        Self::with_index(FlatIndex)
    }
}

impl<T: Element> Default for VectorStore<T, FlatIndex> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Element, I: IndexBackend<T>> VectorStore<T, I> {
    /// Create an empty vector store with the given index.
    pub fn with_index(index: I) -> Self {
        Self {
            index,
            vectors: Vec::new(),
            metadata: Vec::new(),
        }
    }

    /// Append a vector. Never fails; an existing record with the same id is
    /// left in place.
    pub fn add(&mut self, id: impl Into<String>, values: impl Into<Values<T>>) {
        self.add_with_metadata(id, values, Metadata::new());
    }

    /// Append a vector with metadata
    pub fn add_with_metadata(
        &mut self,
        id: impl Into<String>,
        values: impl Into<Values<T>>,
        metadata: Metadata,
    ) {
        let vector = Vector::new(id, values);
        let position = self.vectors.len();
        debug!(
            id = vector.id(),
            dims = vector.dimensions(),
            sparse = vector.is_sparse(),
            position,
            "add vector"
        );
        self.vectors.push(vector);
        self.metadata.push(metadata);
        self.index.on_add(position, &self.vectors[position]);
    }

    /// Remove the first vector with this id. Returns whether one was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(position) = self.position(id) else {
            debug!(id, "remove: not found");
            return false;
        };
        self.vectors.remove(position);
        self.metadata.remove(position);
        self.index.on_remove(position);
        debug!(id, position, "removed vector");
        true
    }

    /// Get the first vector with this id
    pub fn get(&self, id: &str) -> Result<&Vector<T>> {
        self.get_with_metadata(id).map(|(vector, _)| vector)
    }

    /// Get the first vector with this id along with its metadata
    pub fn get_with_metadata(&self, id: &str) -> Result<(&Vector<T>, &Metadata)> {
        self.position(id)
            .map(|p| (&self.vectors[p], &self.metadata[p]))
            .ok_or_else(|| VectorDbError::NotFound { id: id.to_string() })
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.vectors.iter().position(|v| v.id() == id)
    }

    /// Dimension of the first stored vector. Other records are not checked.
    pub fn dimensions(&self) -> Result<usize> {
        self.vectors
            .first()
            .map(Vector::dimensions)
            .ok_or(VectorDbError::EmptyStore)
    }

    /// Largest dimension across all stored vectors.
    pub fn max_dimensions(&self) -> Result<usize> {
        self.vectors
            .iter()
            .map(Vector::dimensions)
            .max()
            .ok_or(VectorDbError::EmptyStore)
    }

    /// Get the number of vectors in the store
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Iterate over vectors in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Vector<T>> {
        self.vectors.iter()
    }

    /// All stored vectors in insertion order; the candidate set for search.
    pub fn vectors(&self) -> &[Vector<T>] {
        &self.vectors
    }

    /// List all vector IDs in insertion order, duplicates included
    pub fn ids(&self) -> Vec<&str> {
        self.vectors.iter().map(Vector::id).collect()
    }

    /// Search for the `k` nearest (or most similar) vectors to `query`.
    pub fn search(&self, query: &Vector<T>, k: usize, metric: DistanceMetric) -> Result<Vec<&Vector<T>>> {
        Ok(self
            .search_scored(query, k, metric)?
            .into_iter()
            .map(|s| s.vector)
            .collect())
    }

    /// Like [`search`](Self::search), keeping each result's score.
    pub fn search_scored(
        &self,
        query: &Vector<T>,
        k: usize,
        metric: DistanceMetric,
    ) -> Result<Vec<Scored<'_, T>>> {
        let results = self.index.rank(&self.vectors, query, k, metric)?;
        debug!(
            backend = self.index.name(),
            %metric,
            k,
            candidates = self.vectors.len(),
            returned = results.len(),
            "search"
        );
        Ok(results)
    }

    pub fn element_kind(&self) -> ElementKind {
        T::KIND
    }

    /// Get a reference to the underlying index.
    pub fn index(&self) -> &I {
        &self.index
    }
}
