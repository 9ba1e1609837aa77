//! Error types for body-types crate.

use thiserror::Error;

use crate::landmark::LANDMARK_COUNT;

/// Errors raised when constructing body data types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TypesError {
    /// Landmark array does not have the fixed pose length.
    #[error("landmark count mismatch: expected {expected}, got {actual}")]
    LandmarkCount {
        /// Required landmark count.
        expected: usize,
        /// Landmarks supplied.
        actual: usize,
    },

    /// A width or length used as a ratio denominator is zero, near zero or not finite.
    #[error("degenerate geometry: {measure} is {value}")]
    Degenerate {
        /// Name of the offending measurement.
        measure: &'static str,
        /// Its value.
        value: f64,
    },

    /// Unknown body shape label.
    #[error("unknown body shape: {0}")]
    UnknownShape(String),
}

impl TypesError {
    /// Creates a landmark count error against the fixed pose length.
    #[must_use]
    pub const fn landmark_count(actual: usize) -> Self {
        Self::LandmarkCount {
            expected: LANDMARK_COUNT,
            actual,
        }
    }

    /// Creates a degenerate geometry error.
    #[must_use]
    pub const fn degenerate(measure: &'static str, value: f64) -> Self {
        Self::Degenerate { measure, value }
    }

    /// Creates an unknown shape error.
    #[must_use]
    pub fn unknown_shape(label: impl Into<String>) -> Self {
        Self::UnknownShape(label.into())
    }
}
