//! # VectorDB
//!
//! An in-memory vector store with exact similarity search.
//!
//! This library provides:
//! - Dense and sparse vectors over `i32`, `i64`, `f32` or `f64` elements
//! - Distance metrics (Euclidean, Cosine, Dot Product, Manhattan, Chebyshev)
//! - An ordered store with first-match lookup and removal
//! - Brute-force k-NN search behind a pluggable index backend
//!
//! ## Example
//!
//! ```rust
//! use vectordb::{DistanceMetric, Vector, VectorStore};
//!
//! // Create a vector store
//! let mut store = VectorStore::<f64>::new();
//!
//! // Insert vectors
//! store.add("vec1", vec![1.0, 2.0, 3.0]);
//! store.add("vec2", vec![4.0, 5.0, 6.0]);
//! store.add("vec3", vec![7.0, 8.0, 9.0]);
//!
//! // Search for the nearest vectors
//! let query = Vector::dense("query", vec![10.0, 3.0, 10.0]);
//! let results = store.search(&query, 2, DistanceMetric::Euclidean).unwrap();
//! assert_eq!(results[0].id(), "vec3");
//! assert_eq!(results[1].id(), "vec2");
//! ```

pub mod dataset;
pub mod distance;
pub mod element;
pub mod error;
pub mod flat_index;
pub mod index;
pub mod search;
pub mod storage;
pub mod topk;
pub mod vector;

pub use distance::{
    chebyshev_distance, cosine_similarity, dot_product, euclidean_distance, manhattan_distance,
    DistanceMetric, MAX_DISTANCE,
};
pub use element::{Element, ElementKind};
pub use error::{Result, VectorDbError};
pub use flat_index::FlatIndex;
pub use index::IndexBackend;
pub use search::{brute_force_search, search_by, search_scored, RankOrder, Scored};
pub use storage::{Metadata, VectorStore};
pub use topk::TopKIndex;
pub use vector::{Values, Vector};
