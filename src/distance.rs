//! Distance and similarity metrics
//!
//! Every metric widens elements to `f64`, so any two element kinds can be
//! compared. When both operands are sparse the metrics walk the two sorted
//! index maps together instead of materializing dense arrays.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::element::Element;
use crate::error::{Result, VectorDbError};
use crate::search::RankOrder;
use crate::vector::{Values, Vector};

/// Returned by [`euclidean_distance`] for vectors of differing dimension.
///
/// A real distance can overflow to infinity as well, so search does not rely
/// on the value alone: see [`DistanceMetric::is_sentinel`].
pub const MAX_DISTANCE: f64 = f64::INFINITY;

/// Metric selector for search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Euclidean (L2) distance; smaller is closer
    Euclidean,
    /// Cosine similarity; larger is closer
    Cosine,
    /// Dot product; larger is closer
    DotProduct,
    /// Manhattan (L1) distance; smaller is closer
    Manhattan,
    /// Chebyshev (L-infinity) distance; smaller is closer
    Chebyshev,
}

impl DistanceMetric {
    pub const ALL: [DistanceMetric; 5] = [
        DistanceMetric::Euclidean,
        DistanceMetric::Cosine,
        DistanceMetric::DotProduct,
        DistanceMetric::Manhattan,
        DistanceMetric::Chebyshev,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DistanceMetric::Euclidean => "euclidean",
            DistanceMetric::Cosine => "cosine",
            DistanceMetric::DotProduct => "dot",
            DistanceMetric::Manhattan => "manhattan",
            DistanceMetric::Chebyshev => "chebyshev",
        }
    }

    /// Ranking direction: distances rank ascending, similarities descending.
    pub fn order(&self) -> RankOrder {
        match self {
            DistanceMetric::Cosine | DistanceMetric::DotProduct => RankOrder::Descending,
            DistanceMetric::Euclidean | DistanceMetric::Manhattan | DistanceMetric::Chebyshev => {
                RankOrder::Ascending
            }
        }
    }

    /// Whether scoring `a` against `b` yields the mismatch sentinel rather
    /// than a real score. Such candidates rank after every real score.
    pub fn is_sentinel<A: Element, B: Element>(&self, a: &Vector<A>, b: &Vector<B>) -> bool {
        matches!(self, DistanceMetric::Euclidean) && a.dimensions() != b.dimensions()
    }

    /// Compute the score between two vectors using this metric
    pub fn evaluate<A: Element, B: Element>(&self, a: &Vector<A>, b: &Vector<B>) -> Result<f64> {
        match self {
            DistanceMetric::Euclidean => Ok(euclidean_distance(a, b)),
            DistanceMetric::Cosine => cosine_similarity(a, b),
            DistanceMetric::DotProduct => dot_product(a, b),
            DistanceMetric::Manhattan => manhattan_distance(a, b),
            DistanceMetric::Chebyshev => chebyshev_distance(a, b),
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DistanceMetric {
    type Err = VectorDbError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "euclidean" | "l2" => Ok(DistanceMetric::Euclidean),
            "cosine" => Ok(DistanceMetric::Cosine),
            "dot" | "dot_product" | "dotproduct" => Ok(DistanceMetric::DotProduct),
            "manhattan" | "l1" => Ok(DistanceMetric::Manhattan),
            "chebyshev" | "linf" => Ok(DistanceMetric::Chebyshev),
            _ => Err(VectorDbError::UnknownMetric { name: s.to_string() }),
        }
    }
}

/// `expected` is the left operand's dimension, `actual` the right's. Search
/// passes the query on the left.
fn check_dimensions<A: Element, B: Element>(a: &Vector<A>, b: &Vector<B>) -> Result<()> {
    if a.dimensions() != b.dimensions() {
        return Err(VectorDbError::DimensionMismatch {
            expected: a.dimensions(),
            actual: b.dimensions(),
        });
    }
    Ok(())
}

/// Feed every position where either operand may be nonzero to `f`, widened.
///
/// Positions where both sparse operands are absent are skipped; every metric
/// here contributes nothing for a `(0, 0)` pair.
fn for_each_pair<A: Element, B: Element>(a: &Vector<A>, b: &Vector<B>, mut f: impl FnMut(f64, f64)) {
    match (a.values(), b.values()) {
        (Values::Sparse(x), Values::Sparse(y)) => merge_sparse(x, y, f),
        _ => {
            let (x, y) = (a.dense_values(), b.dense_values());
            for (p, q) in x.iter().zip(y.iter()) {
                f(p.to_f64(), q.to_f64());
            }
        }
    }
}

fn merge_sparse<A: Element, B: Element>(
    x: &BTreeMap<usize, A>,
    y: &BTreeMap<usize, B>,
    mut f: impl FnMut(f64, f64),
) {
    let mut xs = x.iter().peekable();
    let mut ys = y.iter().peekable();
    loop {
        let left = xs.peek().map(|&(&i, &p)| (i, p.to_f64()));
        let right = ys.peek().map(|&(&j, &q)| (j, q.to_f64()));
        match (left, right) {
            (Some((i, p)), Some((j, q))) => match i.cmp(&j) {
                Ordering::Less => {
                    f(p, 0.0);
                    xs.next();
                }
                Ordering::Greater => {
                    f(0.0, q);
                    ys.next();
                }
                Ordering::Equal => {
                    f(p, q);
                    xs.next();
                    ys.next();
                }
            },
            (Some((_, p)), None) => {
                f(p, 0.0);
                xs.next();
            }
            (None, Some((_, q))) => {
                f(0.0, q);
                ys.next();
            }
            (None, None) => break,
        }
    }
}

/// Compute dot product of two vectors
pub fn dot_product<A: Element, B: Element>(a: &Vector<A>, b: &Vector<B>) -> Result<f64> {
    check_dimensions(a, b)?;
    let mut sum = 0.0;
    for_each_pair(a, b, |p, q| sum += p * q);
    Ok(sum)
}

/// Compute cosine similarity between two vectors.
///
/// Fails with [`VectorDbError::ZeroMagnitude`] if either norm is exactly zero.
pub fn cosine_similarity<A: Element, B: Element>(a: &Vector<A>, b: &Vector<B>) -> Result<f64> {
    check_dimensions(a, b)?;

    let norm_a = a.norm();
    let norm_b = b.norm();
    if norm_a == 0.0 || norm_b == 0.0 {
        return Err(VectorDbError::ZeroMagnitude);
    }

    let similarity = dot_product(a, b)? / (norm_a * norm_b);

    // Clamp to [-1, 1] to handle floating point errors
    Ok(similarity.clamp(-1.0, 1.0))
}

/// Compute Euclidean (L2) distance between two vectors.
///
/// Returns [`MAX_DISTANCE`] rather than an error when dimensions differ.
pub fn euclidean_distance<A: Element, B: Element>(a: &Vector<A>, b: &Vector<B>) -> f64 {
    if a.dimensions() != b.dimensions() {
        tracing::trace!(
            left = a.id(),
            right = b.id(),
            left_dims = a.dimensions(),
            right_dims = b.dimensions(),
            "dimension mismatch, substituting maximal distance"
        );
        return MAX_DISTANCE;
    }
    let mut sum = 0.0;
    for_each_pair(a, b, |p, q| sum += (p - q).powi(2));
    sum.sqrt()
}

/// Compute Manhattan (L1) distance between two vectors
pub fn manhattan_distance<A: Element, B: Element>(a: &Vector<A>, b: &Vector<B>) -> Result<f64> {
    check_dimensions(a, b)?;
    let mut sum = 0.0;
    for_each_pair(a, b, |p, q| sum += (p - q).abs());
    Ok(sum)
}

/// Compute Chebyshev (L-infinity) distance: the largest per-dimension gap
pub fn chebyshev_distance<A: Element, B: Element>(a: &Vector<A>, b: &Vector<B>) -> Result<f64> {
    check_dimensions(a, b)?;
    let mut max = 0.0_f64;
    for_each_pair(a, b, |p, q| max = max.max((p - q).abs()));
    Ok(max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn dense(data: Vec<f64>) -> Vector<f64> {
        Vector::dense("t", data)
    }

    #[test]
    fn test_euclidean_distance() {
        let d = euclidean_distance(&dense(vec![1.0, 2.0, 3.0]), &dense(vec![4.0, 5.0, 6.0]));
        assert_relative_eq!(d, 5.196152422706632, epsilon = 1e-12);
    }

    #[test]
    fn test_euclidean_same_vector() {
        let v = dense(vec![1.0, 2.0, 3.0]);
        assert_eq!(euclidean_distance(&v, &v), 0.0);
    }

    #[test]
    fn test_euclidean_mismatch_sentinel() {
        let d = euclidean_distance(&dense(vec![1.0, 2.0]), &dense(vec![1.0, 2.0, 3.0]));
        assert_eq!(d, MAX_DISTANCE);
        assert_eq!(
            DistanceMetric::Euclidean
                .evaluate(&dense(vec![1.0]), &dense(vec![]))
                .unwrap(),
            MAX_DISTANCE
        );
        assert!(DistanceMetric::Euclidean.is_sentinel(&dense(vec![1.0]), &dense(vec![])));
        assert!(!DistanceMetric::Euclidean.is_sentinel(&dense(vec![1.0]), &dense(vec![2.0])));
        assert!(!DistanceMetric::DotProduct.is_sentinel(&dense(vec![1.0]), &dense(vec![])));
    }

    #[test]
    fn test_euclidean_overflow_reaches_sentinel_value() {
        let huge = dense(vec![1e200, 1e200]);
        let origin = dense(vec![0.0, 0.0]);
        assert_eq!(euclidean_distance(&huge, &origin), f64::INFINITY);
    }

    #[test]
    fn test_dot_product() {
        let dot = dot_product(&dense(vec![1.0, 2.0, 3.0]), &dense(vec![4.0, 5.0, 6.0])).unwrap();
        assert_relative_eq!(dot, 32.0);
    }

    #[test]
    fn test_dot_product_mismatch() {
        let a = dense(vec![1.0, 2.0, 3.0]);
        let b = dense(vec![1.0, 2.0]);
        assert_eq!(
            dot_product(&a, &b),
            Err(VectorDbError::DimensionMismatch { expected: 3, actual: 2 })
        );
    }

    #[test]
    fn test_cosine_identical() {
        let v = dense(vec![1.0, 0.0, 0.0]);
        assert_relative_eq!(cosine_similarity(&v, &v).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cosine_orthogonal() {
        let a = dense(vec![1.0, 0.0, 0.0]);
        let b = dense(vec![0.0, 1.0, 0.0]);
        assert_relative_eq!(cosine_similarity(&a, &b).unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cosine_opposite() {
        let a = dense(vec![1.0, 0.0, 0.0]);
        let b = dense(vec![-1.0, 0.0, 0.0]);
        assert_relative_eq!(cosine_similarity(&a, &b).unwrap(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cosine_zero_magnitude() {
        let a = dense(vec![1.0, 2.0, 3.0]);
        let zero = dense(vec![0.0, 0.0, 0.0]);
        assert_eq!(cosine_similarity(&a, &zero), Err(VectorDbError::ZeroMagnitude));
        assert_eq!(cosine_similarity(&zero, &a), Err(VectorDbError::ZeroMagnitude));
    }

    #[test]
    fn test_cosine_mismatch_checked_before_magnitude() {
        let a = dense(vec![1.0, 2.0]);
        let zero = dense(vec![0.0, 0.0, 0.0]);
        assert!(matches!(
            cosine_similarity(&a, &zero),
            Err(VectorDbError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_manhattan_and_chebyshev() {
        let a = dense(vec![1.0, 5.0, -2.0]);
        let b = dense(vec![4.0, 3.0, -2.0]);
        assert_relative_eq!(manhattan_distance(&a, &b).unwrap(), 5.0);
        assert_relative_eq!(chebyshev_distance(&a, &b).unwrap(), 3.0);
        assert!(manhattan_distance(&a, &dense(vec![1.0])).is_err());
        assert!(chebyshev_distance(&a, &dense(vec![1.0])).is_err());
    }

    #[test]
    fn test_mixed_element_kinds() {
        let ints = Vector::dense("i", vec![1i32, 2, 3]);
        let floats = Vector::dense("f", vec![1.0f32, 2.0, 3.0]);
        assert_eq!(euclidean_distance(&ints, &floats), 0.0);
        assert_relative_eq!(dot_product(&ints, &floats).unwrap(), 14.0);
    }

    #[test]
    fn test_sparse_matches_dense() {
        let sa = Vector::sparse("a", BTreeMap::from([(0, 1.0), (3, 2.0), (5, -1.0)]));
        let sb = Vector::sparse("b", BTreeMap::from([(1, 4.0), (3, 3.0), (5, 2.0)]));
        let da = dense(sa.dense_values().into_owned());
        let db = dense(sb.dense_values().into_owned());

        for metric in DistanceMetric::ALL {
            let sparse = metric.evaluate(&sa, &sb).unwrap();
            let dense = metric.evaluate(&da, &db).unwrap();
            assert_relative_eq!(sparse, dense, epsilon = 1e-12);
            let mixed = metric.evaluate(&sa, &db).unwrap();
            assert_relative_eq!(mixed, dense, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_metric_names() {
        for metric in DistanceMetric::ALL {
            assert_eq!(metric.name().parse::<DistanceMetric>().unwrap(), metric);
        }
        assert_eq!("L2".parse::<DistanceMetric>().unwrap(), DistanceMetric::Euclidean);
        assert!(matches!(
            "hamming".parse::<DistanceMetric>(),
            Err(VectorDbError::UnknownMetric { .. })
        ));
    }

    #[test]
    fn test_metric_order() {
        assert_eq!(DistanceMetric::Euclidean.order(), RankOrder::Ascending);
        assert_eq!(DistanceMetric::Cosine.order(), RankOrder::Descending);
        assert_eq!(DistanceMetric::DotProduct.order(), RankOrder::Descending);
    }
}
