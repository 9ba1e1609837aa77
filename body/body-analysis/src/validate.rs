//! Landmark validation: shape checks, clamping and confidence scoring.

use body_types::{DetectionResult, LANDMARK_COUNT, LandmarkIndex, PoseLandmarks, RawDetection};
use tracing::{debug, warn};

use crate::error::{AnalysisError, Result};
use crate::params::AnalysisParams;

/// A detection that passed validation, with the trust to place in
/// measurements derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedDetection {
    /// Clamped detection with exactly 33 landmarks.
    pub detection: DetectionResult,
    /// Confidence in derived measurements `[0, 1]`.
    pub measurement_confidence: f64,
    /// Accepted below the minimum confidence under override.
    pub degraded: bool,
}

/// Validates raw detector output.
///
/// Visibilities and confidence are clamped to `[0, 1]` and overall
/// visibility is recomputed. Measurement confidence is the lower of the
/// detector confidence and the mean visibility of the limb and torso joints.
///
/// # Errors
///
/// - [`AnalysisError::InsufficientLandmarks`] if the count is not 33
/// - [`AnalysisError::InvalidLandmark`] if a coordinate or visibility is
///   not finite
/// - [`AnalysisError::LowConfidence`] if confidence is below the minimum and
///   `allow_low_confidence` is `false`
///
/// # Example
///
/// ```
/// use body_analysis::{AnalysisParams, validate_detection};
/// use body_types::{Landmark, RawDetection};
///
/// let raw = RawDetection::new(vec![Landmark::new(0.5, 0.5, 0.0, 1.2); 33], 0.9);
/// let validated = validate_detection(raw, &AnalysisParams::default(), false).unwrap();
/// assert!((validated.detection.overall_visibility - 1.0).abs() < 1e-12);
/// assert!(!validated.degraded);
/// ```
pub fn validate_detection(
    raw: RawDetection,
    params: &AnalysisParams,
    allow_low_confidence: bool,
) -> Result<ValidatedDetection> {
    if raw.landmarks.len() != LANDMARK_COUNT {
        return Err(AnalysisError::insufficient_landmarks(
            LANDMARK_COUNT,
            raw.landmarks.len(),
        ));
    }

    if let Some(index) = raw.landmarks.iter().position(|l| !l.is_finite()) {
        return Err(AnalysisError::InvalidLandmark { index });
    }

    let clamped: Vec<_> = raw
        .landmarks
        .into_iter()
        .map(body_types::Landmark::with_clamped_visibility)
        .collect();
    let landmarks = PoseLandmarks::try_from(clamped)?;

    let confidence = if raw.confidence.is_nan() {
        0.0
    } else {
        raw.confidence.clamp(0.0, 1.0)
    };
    let core_visibility = landmarks.mean_visibility_of(&LandmarkIndex::CORE);
    let mut measurement_confidence = confidence.min(core_visibility);

    let degraded = confidence < params.min_confidence;
    if degraded {
        if !allow_low_confidence {
            return Err(AnalysisError::low_confidence(
                confidence,
                params.min_confidence,
            ));
        }
        warn!(
            confidence,
            minimum = params.min_confidence,
            "Accepting low-confidence detection with degraded trust"
        );
        measurement_confidence *= params.degraded_trust_factor;
    }

    let detection = DetectionResult::new(landmarks, confidence);
    debug!(
        confidence,
        overall_visibility = detection.overall_visibility,
        measurement_confidence,
        "Detection validated"
    );

    Ok(ValidatedDetection {
        detection,
        measurement_confidence,
        degraded,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use body_types::Landmark;

    fn raw(count: usize, visibility: f64, confidence: f64) -> RawDetection {
        RawDetection::new(
            vec![Landmark::new(0.5, 0.5, 0.0, visibility); count],
            confidence,
        )
    }

    #[test]
    fn test_accepts_full_detection() {
        let v = validate_detection(raw(33, 0.9, 0.8), &AnalysisParams::default(), false).unwrap();
        assert_relative_eq!(v.detection.confidence, 0.8);
        assert_relative_eq!(v.measurement_confidence, 0.8);
        assert!(!v.degraded);
    }

    #[test]
    fn test_rejects_wrong_count() {
        let err = validate_detection(raw(32, 0.9, 0.9), &AnalysisParams::default(), false)
            .unwrap_err();
        assert_eq!(err, AnalysisError::insufficient_landmarks(33, 32));

        let err = validate_detection(raw(0, 0.9, 0.9), &AnalysisParams::default(), true)
            .unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientLandmarks { .. }));
    }

    #[test]
    fn test_clamps_visibility() {
        let mut r = raw(33, 0.5, 0.9);
        r.landmarks[0].visibility = 3.0;
        r.landmarks[1].visibility = -1.0;
        let v = validate_detection(r, &AnalysisParams::default(), false).unwrap();
        let lm = v.detection.landmarks.as_array();
        assert_relative_eq!(lm[0].visibility, 1.0);
        assert_relative_eq!(lm[1].visibility, 0.0);
        assert!((0.0..=1.0).contains(&v.detection.overall_visibility));
    }

    #[test]
    fn test_rejects_non_finite() {
        let mut r = raw(33, 0.9, 0.9);
        r.landmarks[12].x = f64::NAN;
        let err = validate_detection(r, &AnalysisParams::default(), false).unwrap_err();
        assert_eq!(err, AnalysisError::InvalidLandmark { index: 12 });
    }

    #[test]
    fn test_rejects_nan_visibility() {
        let mut r = raw(33, 0.9, 0.9);
        r.landmarks[0].visibility = f64::NAN;
        let err = validate_detection(r, &AnalysisParams::default(), false).unwrap_err();
        assert_eq!(err, AnalysisError::InvalidLandmark { index: 0 });
    }

    #[test]
    fn test_low_confidence_rejected_without_override() {
        let err = validate_detection(raw(33, 0.9, 0.3), &AnalysisParams::default(), false)
            .unwrap_err();
        assert!(matches!(err, AnalysisError::LowConfidence { .. }));
    }

    #[test]
    fn test_low_confidence_degrades_with_override() {
        let v = validate_detection(raw(33, 0.9, 0.4), &AnalysisParams::default(), true).unwrap();
        assert!(v.degraded);
        assert_relative_eq!(v.measurement_confidence, 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let v = validate_detection(raw(33, 0.9, 0.5), &AnalysisParams::default(), false).unwrap();
        assert!(!v.degraded);
    }

    #[test]
    fn test_occluded_core_lowers_measurement_confidence() {
        let mut r = raw(33, 0.9, 0.95);
        for index in LandmarkIndex::CORE {
            r.landmarks[index.position()].visibility = 0.3;
        }
        let v = validate_detection(r, &AnalysisParams::default(), false).unwrap();
        assert_relative_eq!(v.measurement_confidence, 0.3, epsilon = 1e-12);
    }
}
