//! Brute-force flat index: exhaustive scan with a stable sort

use crate::distance::DistanceMetric;
use crate::element::Element;
use crate::error::Result;
use crate::index::IndexBackend;
use crate::search::{search_scored, Scored};
use crate::vector::Vector;

/// Scores every candidate and stable-sorts. The default backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatIndex;

impl FlatIndex {
    pub fn new() -> Self {
        Self
    }
}

impl<T: Element> IndexBackend<T> for FlatIndex {
    fn name(&self) -> &'static str {
        "flat"
    }

    fn is_exact(&self) -> bool {
        true
    }

    fn rank<'a>(
        &self,
        candidates: &'a [Vector<T>],
        query: &Vector<T>,
        k: usize,
        metric: DistanceMetric,
    ) -> Result<Vec<Scored<'a, T>>> {
        search_scored(candidates, query, k, metric)
    }
}
