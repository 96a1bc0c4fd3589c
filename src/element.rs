//! Numeric element kinds a vector can hold.
//!
//! The set is closed: [`Element`] is sealed and implemented for exactly
//! `i32`, `i64`, `f32` and `f64`. Every metric widens elements to `f64`, so
//! vectors of different kinds can be compared directly.

use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

mod sealed {
    pub trait Sealed {}
    impl Sealed for i32 {}
    impl Sealed for i64 {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// Runtime tag for the supported element kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    I32,
    I64,
    F32,
    F64,
}

impl ElementKind {
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::I32 => "i32",
            ElementKind::I64 => "i64",
            ElementKind::F32 => "f32",
            ElementKind::F64 => "f64",
        }
    }
}

impl Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A numeric type that can be stored in a [`Vector`](crate::Vector).
///
/// This trait is sealed; it cannot be implemented outside this crate.
pub trait Element:
    sealed::Sealed
    + Copy
    + Default
    + PartialEq
    + Debug
    + Display
    + FromStr
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    /// The runtime tag for this kind.
    const KIND: ElementKind;

    /// Widen to `f64` for metric evaluation.
    fn to_f64(self) -> f64;

    /// Whether this value is the additive identity.
    fn is_zero(self) -> bool {
        self.to_f64() == 0.0
    }
}

impl Element for i32 {
    const KIND: ElementKind = ElementKind::I32;

    #[inline]
    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}

impl Element for i64 {
    const KIND: ElementKind = ElementKind::I64;

    // Values beyond 2^53 lose precision, same as any f64 metric would.
    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Element for f32 {
    const KIND: ElementKind = ElementKind::F32;

    #[inline]
    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}

impl Element for f64 {
    const KIND: ElementKind = ElementKind::F64;

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }
}
