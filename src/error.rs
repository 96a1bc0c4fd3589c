//! Error types for the vector store

use thiserror::Error;

/// Result type alias for store, metric and search operations
pub type Result<T> = std::result::Result<T, VectorDbError>;

/// Error types that can occur in vector store operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VectorDbError {
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Cosine similarity is undefined for a zero-magnitude vector")]
    ZeroMagnitude,

    #[error("Vector not found: {id}")]
    NotFound { id: String },

    #[error("Store is empty")]
    EmptyStore,

    #[error("Invalid vector: {reason}")]
    InvalidVector { reason: String },

    #[error("Unknown metric: {name}")]
    UnknownMetric { name: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}
