//! Vector type: an identified numeric tuple stored densely or sparsely

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::element::{Element, ElementKind};
use crate::error::{Result, VectorDbError};

/// The stored representation of a vector's values.
///
/// Dimensionality is always derived from the contents: the length of a dense
/// sequence, or the largest present index plus one for a sparse mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Values<T> {
    /// One value per dimension, `0..len`, no gaps.
    Dense(Vec<T>),
    /// Dimension index to value; absent indices are zero.
    Sparse(BTreeMap<usize, T>),
}

/// Largest index a sparse vector may carry; one past it must still be a
/// representable dimension count.
pub const MAX_SPARSE_INDEX: usize = usize::MAX - 1;

impl<T: Element> Values<T> {
    /// Number of dimensions described by these values.
    ///
    /// Saturates at `usize::MAX` for a sparse index of `usize::MAX`, which the
    /// parsing and dataset entry points reject.
    pub fn dimensions(&self) -> usize {
        match self {
            Values::Dense(data) => data.len(),
            Values::Sparse(map) => map.keys().next_back().map_or(0, |max| max.saturating_add(1)),
        }
    }

    /// Reject sparse indices beyond [`MAX_SPARSE_INDEX`].
    pub fn validate(&self) -> Result<()> {
        match self {
            Values::Sparse(map) => match map.keys().next_back() {
                Some(&index) if index > MAX_SPARSE_INDEX => Err(VectorDbError::InvalidVector {
                    reason: format!("Sparse index out of range: {}", index),
                }),
                _ => Ok(()),
            },
            Values::Dense(_) => Ok(()),
        }
    }

    /// Parse dense values from a comma-separated string, e.g. `"1, 2, 3"`.
    pub fn parse_dense(s: &str) -> Result<Self> {
        if s.trim().is_empty() {
            return Ok(Values::Dense(Vec::new()));
        }
        let data = s
            .split(',')
            .map(parse_element::<T>)
            .collect::<Result<Vec<T>>>()?;
        Ok(Values::Dense(data))
    }

    /// Parse sparse values from comma-separated `index:value` pairs,
    /// e.g. `"0:1.5, 4:2"`.
    pub fn parse_sparse(s: &str) -> Result<Self> {
        let mut map = BTreeMap::new();
        if s.trim().is_empty() {
            return Ok(Values::Sparse(map));
        }
        for pair in s.split(',') {
            let (index, value) = pair.split_once(':').ok_or_else(|| VectorDbError::InvalidVector {
                reason: format!("Expected index:value, got '{}'", pair.trim()),
            })?;
            let index = index
                .trim()
                .parse::<usize>()
                .map_err(|_| VectorDbError::InvalidVector {
                    reason: format!("Invalid index: {}", index.trim()),
                })?;
            if map.insert(index, parse_element::<T>(value)?).is_some() {
                return Err(VectorDbError::InvalidVector {
                    reason: format!("Duplicate index: {}", index),
                });
            }
        }
        let values = Values::Sparse(map);
        values.validate()?;
        Ok(values)
    }
}

fn parse_element<T: Element>(raw: &str) -> Result<T> {
    let raw = raw.trim();
    raw.parse::<T>().map_err(|_| VectorDbError::InvalidVector {
        reason: format!("Invalid {}: {}", T::KIND, raw),
    })
}

/// Dense form when no `:` appears, sparse `index:value` form otherwise.
impl<T: Element> FromStr for Values<T> {
    type Err = VectorDbError;

    fn from_str(s: &str) -> Result<Self> {
        if s.contains(':') {
            Values::parse_sparse(s)
        } else {
            Values::parse_dense(s)
        }
    }
}

impl<T> From<Vec<T>> for Values<T> {
    fn from(data: Vec<T>) -> Self {
        Values::Dense(data)
    }
}

impl<T> From<BTreeMap<usize, T>> for Values<T> {
    fn from(map: BTreeMap<usize, T>) -> Self {
        Values::Sparse(map)
    }
}

/// A vector in n-dimensional space with a caller-supplied identifier.
///
/// Dense and sparse vectors answer the same four capabilities: identifier,
/// dense materialization, sparse materialization and dimension count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vector<T> {
    id: String,
    values: Values<T>,
}

impl<T: Element> Vector<T> {
    /// Create a vector from dense or sparse values.
    pub fn new(id: impl Into<String>, values: impl Into<Values<T>>) -> Self {
        Self {
            id: id.into(),
            values: values.into(),
        }
    }

    /// Create a densely stored vector.
    pub fn dense(id: impl Into<String>, data: Vec<T>) -> Self {
        Self::new(id, Values::Dense(data))
    }

    /// Create a sparsely stored vector.
    pub fn sparse(id: impl Into<String>, map: BTreeMap<usize, T>) -> Self {
        Self::new(id, Values::Sparse(map))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn values(&self) -> &Values<T> {
        &self.values
    }

    pub fn into_values(self) -> Values<T> {
        self.values
    }

    pub fn is_sparse(&self) -> bool {
        matches!(self.values, Values::Sparse(_))
    }

    pub fn element_kind(&self) -> ElementKind {
        T::KIND
    }

    /// Get the dimension of the vector
    pub fn dimensions(&self) -> usize {
        self.values.dimensions()
    }

    /// All values, one per dimension. Sparse vectors are padded with zeros.
    pub fn dense_values(&self) -> Cow<'_, [T]> {
        match &self.values {
            Values::Dense(data) => Cow::Borrowed(data.as_slice()),
            Values::Sparse(map) => {
                let mut dense = vec![T::default(); self.dimensions()];
                for (&index, &value) in map {
                    if let Some(slot) = dense.get_mut(index) {
                        *slot = value;
                    }
                }
                Cow::Owned(dense)
            }
        }
    }

    /// Explicitly stored index/value pairs. Empty for dense vectors.
    pub fn sparse_values(&self) -> Cow<'_, BTreeMap<usize, T>> {
        match &self.values {
            Values::Dense(_) => Cow::Owned(BTreeMap::new()),
            Values::Sparse(map) => Cow::Borrowed(map),
        }
    }

    /// Compute the L2 norm (magnitude) of the vector
    pub fn norm(&self) -> f64 {
        let sum_sq: f64 = match &self.values {
            Values::Dense(data) => data.iter().map(|x| x.to_f64().powi(2)).sum(),
            Values::Sparse(map) => map.values().map(|x| x.to_f64().powi(2)).sum(),
        };
        sum_sq.sqrt()
    }
}
