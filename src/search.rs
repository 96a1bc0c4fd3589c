//! Exact k-nearest-neighbor search over a candidate slice
//!
//! Scores every candidate against the query, stable-sorts by score in the
//! metric's direction and keeps the first `k`. Candidates with equal scores
//! keep their input order. O(n·d + n·log n) per query.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::distance::DistanceMetric;
use crate::element::Element;
use crate::error::Result;
use crate::vector::Vector;

/// Direction in which scores rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankOrder {
    /// Smallest score first (distances).
    Ascending,
    /// Largest score first (similarities).
    Descending,
}

impl RankOrder {
    /// Map a score onto a key that always ranks ascending.
    #[inline]
    pub fn key(&self, score: f64) -> f64 {
        match self {
            RankOrder::Ascending => score,
            RankOrder::Descending => -score,
        }
    }

    /// Compare two scores; `Less` means `a` ranks before `b`. NaN ranks last.
    #[inline]
    pub fn compare(&self, a: f64, b: f64) -> Ordering {
        cmp_keys(self.key(a), self.key(b))
    }
}

/// Ascending comparison with NaN after every number, so sorting stays total.
#[inline]
pub(crate) fn cmp_keys(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// A candidate paired with its score against the query.
#[derive(Debug, Clone, PartialEq)]
pub struct Scored<'a, T> {
    pub vector: &'a Vector<T>,
    /// Index of the vector in the candidate slice.
    pub position: usize,
    pub score: f64,
}

impl<'a, T: Element> Scored<'a, T> {
    pub fn id(&self) -> &'a str {
        self.vector.id()
    }
}

/// Rank `candidates` with an arbitrary scoring function.
///
/// Returns at most `k` entries ordered by `order`. A scoring error aborts
/// the search. `k == 0` returns nothing without scoring.
pub fn search_by<'a, T, F>(
    candidates: &'a [Vector<T>],
    k: usize,
    order: RankOrder,
    mut score: F,
) -> Result<Vec<Scored<'a, T>>>
where
    T: Element,
    F: FnMut(&Vector<T>) -> Result<f64>,
{
    rank_tiered(candidates, k, order, |vector| Ok((false, score(vector)?)))
}

/// Like [`search_by`], but the scorer also flags candidates that rank after
/// every unflagged one regardless of score.
fn rank_tiered<'a, T, F>(
    candidates: &'a [Vector<T>],
    k: usize,
    order: RankOrder,
    mut scorer: F,
) -> Result<Vec<Scored<'a, T>>>
where
    T: Element,
    F: FnMut(&Vector<T>) -> Result<(bool, f64)>,
{
    if k == 0 {
        return Ok(Vec::new());
    }

    let mut scored = candidates
        .iter()
        .enumerate()
        .map(|(position, vector)| {
            let (last, score) = scorer(vector)?;
            Ok((
                last,
                Scored {
                    vector,
                    position,
                    score,
                },
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    // `sort_by` is stable: equal scores keep their input order.
    scored.sort_by(|(last_a, a), (last_b, b)| {
        last_a
            .cmp(last_b)
            .then_with(|| order.compare(a.score, b.score))
    });
    Ok(scored.into_iter().take(k).map(|(_, s)| s).collect())
}

/// Rank `candidates` against `query` under `metric`, scored and truncated.
///
/// Euclidean candidates of the wrong dimension carry [`MAX_DISTANCE`] and
/// rank after every real distance, including one that overflowed.
///
/// [`MAX_DISTANCE`]: crate::distance::MAX_DISTANCE
pub fn search_scored<'a, T: Element, Q: Element>(
    candidates: &'a [Vector<T>],
    query: &Vector<Q>,
    k: usize,
    metric: DistanceMetric,
) -> Result<Vec<Scored<'a, T>>> {
    rank_tiered(candidates, k, metric.order(), |candidate| {
        Ok((
            metric.is_sentinel(query, candidate),
            metric.evaluate(query, candidate)?,
        ))
    })
}

/// Find the `k` candidates nearest to (or most similar to) `query`.
///
/// The result has length `min(k, candidates.len())`.
pub fn brute_force_search<'a, T: Element, Q: Element>(
    candidates: &'a [Vector<T>],
    query: &Vector<Q>,
    k: usize,
    metric: DistanceMetric,
) -> Result<Vec<&'a Vector<T>>> {
    Ok(search_scored(candidates, query, k, metric)?
        .into_iter()
        .map(|s| s.vector)
        .collect())
}
