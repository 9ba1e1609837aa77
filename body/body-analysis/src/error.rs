//! Error types for body-analysis crate.

use std::time::Duration;

use body_types::TypesError;
use thiserror::Error;

/// Errors that can occur while analyzing a detection.
///
/// Every variant except [`AnalysisError::FallbackFailed`] is recoverable:
/// the orchestrator answers it with a synthetic result.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    /// Detector returned the wrong number of landmarks.
    #[error("insufficient landmarks: expected {expected}, got {actual}")]
    InsufficientLandmarks {
        /// Required landmark count.
        expected: usize,
        /// Landmarks received.
        actual: usize,
    },

    /// Detection confidence below the configured minimum.
    #[error("low confidence: {confidence:.3} below minimum {minimum:.3}")]
    LowConfidence {
        /// Detector confidence.
        confidence: f64,
        /// Configured minimum.
        minimum: f64,
    },

    /// A landmark has a non-finite coordinate.
    #[error("invalid landmark at index {index}")]
    InvalidLandmark {
        /// Array position of the landmark.
        index: usize,
    },

    /// Zero or near-zero denominator in ratio math.
    #[error("degenerate geometry: {measure} is {value}")]
    DegenerateGeometry {
        /// Name of the offending measurement.
        measure: &'static str,
        /// Its value.
        value: f64,
    },

    /// Detector call exceeded its time budget.
    #[error("detector timed out after {timeout:?}")]
    DetectorTimeout {
        /// Budget that was exceeded.
        timeout: Duration,
    },

    /// Detector is missing or reported a failure.
    #[error("detector unavailable: {0}")]
    DetectorUnavailable(String),

    /// Supplied height is outside plausible bounds. Calibration is skipped.
    #[error("invalid calibration: height {height_cm} cm not in [{min_cm}, {max_cm}]")]
    InvalidCalibration {
        /// Supplied height.
        height_cm: f64,
        /// Lower bound.
        min_cm: f64,
        /// Upper bound.
        max_cm: f64,
    },

    /// Invalid analysis parameters.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The synthetic generator itself could not produce a result.
    #[error("fallback generation failed: {0}")]
    FallbackFailed(String),
}

impl AnalysisError {
    /// Creates an insufficient landmarks error.
    #[must_use]
    pub const fn insufficient_landmarks(expected: usize, actual: usize) -> Self {
        Self::InsufficientLandmarks { expected, actual }
    }

    /// Creates a low confidence error.
    #[must_use]
    pub const fn low_confidence(confidence: f64, minimum: f64) -> Self {
        Self::LowConfidence {
            confidence,
            minimum,
        }
    }

    /// Creates a degenerate geometry error.
    #[must_use]
    pub const fn degenerate(measure: &'static str, value: f64) -> Self {
        Self::DegenerateGeometry { measure, value }
    }

    /// Creates a detector unavailable error.
    #[must_use]
    pub fn detector_unavailable(reason: impl Into<String>) -> Self {
        Self::DetectorUnavailable(reason.into())
    }

    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }

    /// Creates a fallback failure error.
    #[must_use]
    pub fn fallback_failed(reason: impl Into<String>) -> Self {
        Self::FallbackFailed(reason.into())
    }
}

impl From<TypesError> for AnalysisError {
    fn from(err: TypesError) -> Self {
        match err {
            TypesError::LandmarkCount { expected, actual } => {
                Self::insufficient_landmarks(expected, actual)
            }
            TypesError::Degenerate { measure, value } => Self::degenerate(measure, value),
            TypesError::UnknownShape(label) => {
                Self::invalid_config(format!("unknown shape {label}"))
            }
        }
    }
}

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
