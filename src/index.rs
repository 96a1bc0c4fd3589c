//! Index trait for pluggable search backends
//!
//! A backend turns a candidate slice, a query and `k` into candidates ranked
//! by score. The store owns the vectors and tells the backend about every
//! mutation, so a backend that keeps its own structure (a tree, a graph,
//! cluster centroids, quantized codes) can stay in step with the store.
//! Approximate backends may return different neighbors than an exact scan;
//! they must report that through [`IndexBackend::is_exact`].

use crate::distance::DistanceMetric;
use crate::element::Element;
use crate::error::Result;
use crate::search::Scored;
use crate::vector::Vector;

/// A ranked-candidate producer used by [`VectorStore`](crate::VectorStore).
pub trait IndexBackend<T: Element> {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Whether results always match an exhaustive stable-sort scan.
    fn is_exact(&self) -> bool;

    /// A vector was appended at `position`.
    fn on_add(&mut self, _position: usize, _vector: &Vector<T>) {}

    /// The vector at `position` was removed; later positions shift down by one.
    fn on_remove(&mut self, _position: usize) {}

    /// Return at most `k` candidates ranked by `metric` against `query`,
    /// in the metric's order.
    fn rank<'a>(
        &self,
        candidates: &'a [Vector<T>],
        query: &Vector<T>,
        k: usize,
        metric: DistanceMetric,
    ) -> Result<Vec<Scored<'a, T>>>;
}
