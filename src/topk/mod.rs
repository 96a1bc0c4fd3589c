//! Bounded-heap top-k index module.

pub mod neighbor_queue;

use crate::distance::DistanceMetric;
use crate::element::Element;
use crate::error::Result;
use crate::index::IndexBackend;
use crate::search::Scored;
use crate::vector::Vector;

use neighbor_queue::{MaxHeap, Neighbor};

/// An exact scan that keeps only the best `k` candidates in a bounded heap.
///
/// O(n·d + n·log k) per query instead of a full sort. Output, including the
/// order of tied scores, is identical to [`FlatIndex`](crate::FlatIndex).
#[derive(Debug, Clone, Copy, Default)]
pub struct TopKIndex;

impl TopKIndex {
    pub fn new() -> Self {
        Self
    }
}

impl<T: Element> IndexBackend<T> for TopKIndex {
    fn name(&self) -> &'static str {
        "topk"
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
        if k == 0 {
            return Ok(Vec::new());
        }

        let order = metric.order();
        let mut heap = MaxHeap::with_limit(k);
        let mut scores = Vec::with_capacity(candidates.len());
        for (position, candidate) in candidates.iter().enumerate() {
            let score = metric.evaluate(query, candidate)?;
            scores.push(score);
            heap.push_bounded(
                Neighbor::new(position, order.key(score))
                    .ranked_last(metric.is_sentinel(query, candidate)),
            );
        }

        Ok(heap
            .into_sorted_vec()
            .into_iter()
            .map(|n| Scored {
                vector: &candidates[n.position],
                position: n.position,
                score: scores[n.position],
            })
            .collect())
    }
}
