//! Ordered, first-match body shape classification.

use body_types::{BodyRatios, BodyShapeType};
use serde::Serialize;
use tracing::debug;

use crate::params::ShapeThresholds;

/// Outcome of shape classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShapeClassification {
    /// Winning shape.
    pub shape: BodyShapeType,
    /// Confidence `[0, 1]`, never above the measurement confidence.
    pub confidence: f64,
    /// Value of the metric that decided the winning rule.
    pub metric: f64,
}

/// Classifies body ratios into one of the five shapes.
///
/// Rules are tried in fixed priority order and the first match wins, even
/// when a later rule's metric is satisfied by a wider margin:
///
/// 1. Hourglass: `waist/hip <= 0.75`, `waist/shoulder <= 0.75` and
///    shoulder/hip widths differ by less than 10%
/// 2. Inverted triangle: `shoulder/hip >= 1.1`
/// 3. Triangle: `hip/shoulder >= 1.1`
/// 4. Oval: `waist / min(shoulder, hip) >= 1.0`
/// 5. Rectangle: otherwise
///
/// # Example
///
/// ```
/// use body_analysis::{ShapeThresholds, classify};
/// use body_types::{BodyMeasurements, BodyRatios, BodyShapeType, Calibration};
///
/// let m = BodyMeasurements {
///     shoulder_width: 45.0,
///     waist_width: 34.0,
///     hip_width: 38.0,
///     upper_body_length: 50.0,
///     lower_body_length: 80.0,
///     arm_length: 60.0,
///     leg_length: 80.0,
/// };
/// let ratios = BodyRatios::from_measurements(m, Calibration::Normalized, 1e-9).unwrap();
/// let result = classify(&ratios, &ShapeThresholds::default(), 1.0);
/// assert_eq!(result.shape, BodyShapeType::InvertedTriangle);
/// ```
#[must_use]
pub fn classify(
    ratios: &BodyRatios,
    thresholds: &ShapeThresholds,
    measurement_confidence: f64,
) -> ShapeClassification {
    let (shape, metric, excess) = first_match(ratios, thresholds);

    let floor = thresholds.confidence_floor;
    let raw = ((1.0 - floor) * excess / thresholds.saturation_excess + floor).min(1.0);
    let cap = if measurement_confidence.is_nan() {
        0.0
    } else {
        measurement_confidence.clamp(0.0, 1.0)
    };
    let confidence = raw.clamp(0.0, cap);

    debug!(%shape, metric, excess, confidence, "Body shape classified");

    ShapeClassification {
        shape,
        confidence,
        metric,
    }
}

/// Winning shape, its metric, and the metric's relative excess over the threshold.
fn first_match(r: &BodyRatios, t: &ShapeThresholds) -> (BodyShapeType, f64, f64) {
    let waist_to_hip = r.waist_to_hip_ratio;
    let waist_to_shoulder = r.waist_to_shoulder_ratio();
    let limit = t.hourglass_waist_ratio;
    if waist_to_hip <= limit
        && waist_to_shoulder <= limit
        && r.shoulder_hip_difference() < t.balanced_difference
    {
        let excess = ((limit - waist_to_hip) / limit).min((limit - waist_to_shoulder) / limit);
        return (BodyShapeType::Hourglass, waist_to_hip, excess);
    }

    let shoulder_to_hip = r.shoulder_to_hip_ratio();
    if shoulder_to_hip >= t.dominance_ratio {
        let excess = (shoulder_to_hip - t.dominance_ratio) / t.dominance_ratio;
        return (BodyShapeType::InvertedTriangle, shoulder_to_hip, excess);
    }

    let hip_to_shoulder = r.hip_width / r.shoulder_width;
    if hip_to_shoulder >= t.dominance_ratio {
        let excess = (hip_to_shoulder - t.dominance_ratio) / t.dominance_ratio;
        return (BodyShapeType::Triangle, hip_to_shoulder, excess);
    }

    let waist_to_frame = r.waist_width / r.shoulder_width.min(r.hip_width);
    if waist_to_frame >= t.oval_waist_ratio {
        let excess = (waist_to_frame - t.oval_waist_ratio) / t.oval_waist_ratio;
        return (BodyShapeType::Oval, waist_to_frame, excess);
    }

    // Rectangle: confidence follows how close shoulders and hips are.
    let band = t.dominance_ratio - 1.0;
    let closeness = (1.0 - (shoulder_to_hip - 1.0).abs() / band).clamp(0.0, 1.0);
    (
        BodyShapeType::Rectangle,
        shoulder_to_hip,
        closeness * t.saturation_excess,
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use body_types::{BodyMeasurements, Calibration};

    fn ratios(shoulder: f64, waist: f64, hip: f64) -> BodyRatios {
        let m = BodyMeasurements {
            shoulder_width: shoulder,
            waist_width: waist,
            hip_width: hip,
            upper_body_length: 50.0,
            lower_body_length: 80.0,
            arm_length: 60.0,
            leg_length: 82.0,
        };
        BodyRatios::from_measurements(m, Calibration::Normalized, 1e-9).unwrap()
    }

    fn shape(shoulder: f64, waist: f64, hip: f64) -> BodyShapeType {
        classify(&ratios(shoulder, waist, hip), &ShapeThresholds::default(), 1.0).shape
    }

    #[test]
    fn test_hourglass_scenario() {
        assert_eq!(shape(40.0, 28.0, 40.0), BodyShapeType::Hourglass);
    }

    #[test]
    fn test_inverted_triangle_scenario() {
        assert_eq!(shape(45.0, 36.0, 38.0), BodyShapeType::InvertedTriangle);
    }

    #[test]
    fn test_triangle() {
        assert_eq!(shape(36.0, 30.0, 42.0), BodyShapeType::Triangle);
    }

    #[test]
    fn test_oval() {
        assert_eq!(shape(40.0, 41.0, 39.0), BodyShapeType::Oval);
    }

    #[test]
    fn test_rectangle_default() {
        assert_eq!(shape(40.0, 34.0, 39.0), BodyShapeType::Rectangle);
    }

    #[test]
    fn test_waist_to_hip_boundary_inclusive() {
        assert_eq!(shape(40.0, 30.0, 40.0), BodyShapeType::Hourglass);
        assert_ne!(shape(40.0, 30.004, 40.0), BodyShapeType::Hourglass);
    }

    #[test]
    fn test_hourglass_wins_over_inverted_triangle() {
        // shoulder/hip = 1.105 satisfies the inverted triangle rule too, but the
        // widths still differ by less than 10%.
        let r = ratios(44.2, 28.0, 40.0);
        assert!(r.shoulder_to_hip_ratio() >= 1.1);
        assert_eq!(
            classify(&r, &ShapeThresholds::default(), 1.0).shape,
            BodyShapeType::Hourglass
        );
    }

    #[test]
    fn test_inverted_triangle_wins_over_oval() {
        // Waist wider than hips satisfies oval, but shoulders dominate first.
        assert_eq!(shape(50.0, 42.0, 40.0), BodyShapeType::InvertedTriangle);
    }

    #[test]
    fn test_confidence_saturates() {
        let c = classify(&ratios(60.0, 40.0, 38.0), &ShapeThresholds::default(), 1.0);
        assert_eq!(c.shape, BodyShapeType::InvertedTriangle);
        assert_relative_eq!(c.confidence, 1.0);
    }

    #[test]
    fn test_confidence_on_threshold_is_floor() {
        let c = classify(&ratios(40.0, 30.0, 40.0), &ShapeThresholds::default(), 1.0);
        assert_eq!(c.shape, BodyShapeType::Hourglass);
        assert_relative_eq!(c.confidence, 0.6, epsilon = 1e-12);
    }

    #[test]
    fn test_confidence_grows_with_margin() {
        let t = ShapeThresholds::default();
        let near = classify(&ratios(42.0, 34.0, 38.0), &t, 1.0);
        let far = classify(&ratios(46.0, 34.0, 38.0), &t, 1.0);
        assert_eq!(near.shape, BodyShapeType::InvertedTriangle);
        assert_eq!(far.shape, BodyShapeType::InvertedTriangle);
        assert!(far.confidence > near.confidence);
    }

    #[test]
    fn test_confidence_capped_by_measurement_confidence() {
        let c = classify(&ratios(60.0, 40.0, 38.0), &ShapeThresholds::default(), 0.42);
        assert_relative_eq!(c.confidence, 0.42);
        let c = classify(&ratios(60.0, 40.0, 38.0), &ShapeThresholds::default(), f64::NAN);
        assert_relative_eq!(c.confidence, 0.0);
    }
}
