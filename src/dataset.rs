//! JSON dataset format for seeding a store.
//!
//! A dataset is an array of records, each carrying exactly one of `dense` or
//! `sparse`:
//!
//! ```json
//! [
//!   {"id": "vec1", "dense": [1.0, 2.0, 3.0], "metadata": {"label": "a"}},
//!   {"id": "s1", "sparse": {"0": 1.0, "2": 4.0}}
//! ]
//! ```

use std::collections::BTreeMap;
use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::element::Element;
use crate::error::{Result, VectorDbError};
use crate::index::IndexBackend;
use crate::storage::{Metadata, VectorStore};
use crate::vector::Values;

/// One dataset entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Record<T> {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dense: Option<Vec<T>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sparse: Option<BTreeMap<usize, T>>,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

impl<T: Element> Record<T> {
    /// Split into id, values and metadata; exactly one representation must be set.
    pub fn into_parts(self) -> Result<(String, Values<T>, Metadata)> {
        let values = match (self.dense, self.sparse) {
            (Some(dense), None) => Values::Dense(dense),
            (None, Some(sparse)) => Values::Sparse(sparse),
            (Some(_), Some(_)) => {
                return Err(VectorDbError::InvalidVector {
                    reason: format!("record '{}' has both dense and sparse values", self.id),
                })
            }
            (None, None) => {
                return Err(VectorDbError::InvalidVector {
                    reason: format!("record '{}' has neither dense nor sparse values", self.id),
                })
            }
        };
        values.validate().map_err(|e| VectorDbError::InvalidVector {
            reason: format!("record '{}': {}", self.id, e),
        })?;
        Ok((self.id, values, self.metadata))
    }
}

/// Decode a JSON array of records.
pub fn read_records<T: Element, R: Read>(reader: R) -> Result<Vec<Record<T>>> {
    serde_json::from_reader(reader).map_err(|e| VectorDbError::SerializationError(e.to_string()))
}

/// Append every record to `store` in order. Returns the number added.
///
/// All records are validated before any is added.
pub fn load_into<T: Element, I: IndexBackend<T>>(
    store: &mut VectorStore<T, I>,
    records: Vec<Record<T>>,
) -> Result<usize> {
    let parts = records
        .into_iter()
        .map(Record::into_parts)
        .collect::<Result<Vec<_>>>()?;
    let count = parts.len();
    for (id, values, metadata) in parts {
        store.add_with_metadata(id, values, metadata);
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATASET: &str = r#"[
        {"id": "vec1", "dense": [1, 2, 3], "metadata": {"label": "first"}},
        {"id": "s1", "sparse": {"0": 7, "2": -1}}
    ]"#;

    #[test]
    fn test_read_and_load() {
        let records = read_records::<i32, _>(DATASET.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);

        let mut store = VectorStore::<i32>::new();
        assert_eq!(load_into(&mut store, records).unwrap(), 2);
        assert_eq!(store.ids(), ["vec1", "s1"]);

        let (v, meta) = store.get_with_metadata("vec1").unwrap();
        assert_eq!(v.dense_values().as_ref(), &[1, 2, 3]);
        assert_eq!(meta.get("label").map(String::as_str), Some("first"));

        let s = store.get("s1").unwrap();
        assert!(s.is_sparse());
        assert_eq!(s.dense_values().as_ref(), &[7, 0, -1]);
    }

    #[test]
    fn test_rejects_ambiguous_record() {
        let records =
            read_records::<f64, _>(r#"[{"id": "x", "dense": [1.0], "sparse": {"0": 1.0}}]"#.as_bytes())
                .unwrap();
        let mut store = VectorStore::<f64>::new();
        assert!(matches!(
            load_into(&mut store, records),
            Err(VectorDbError::InvalidVector { .. })
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_rejects_missing_values() {
        let records = read_records::<f64, _>(r#"[{"id": "x"}]"#.as_bytes()).unwrap();
        let mut store = VectorStore::<f64>::new();
        assert!(load_into(&mut store, records).is_err());
    }

    #[test]
    fn test_rejects_out_of_range_sparse_index() {
        let json = format!(
            r#"[{{"id": "ok", "dense": [1.0]}}, {{"id": "big", "sparse": {{"{}": 1.0}}}}]"#,
            usize::MAX
        );
        let records = read_records::<f64, _>(json.as_bytes()).unwrap();
        let mut store = VectorStore::<f64>::new();
        assert!(matches!(
            load_into(&mut store, records),
            Err(VectorDbError::InvalidVector { .. })
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_rejects_wrong_element_kind() {
        let result = read_records::<i64, _>(r#"[{"id": "x", "dense": [1.5]}]"#.as_bytes());
        assert!(matches!(result, Err(VectorDbError::SerializationError(_))));
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let result = read_records::<f64, _>(r#"[{"id": "x", "dence": [1.0]}]"#.as_bytes());
        assert!(result.is_err());
    }
}
