//! Ratio calculation and height calibration.

use body_types::{BodyMeasurements, BodyRatios, Calibration, LandmarkIndex as L, PoseLandmarks};
use tracing::{debug, warn};

use crate::error::{AnalysisError, Result};
use crate::params::AnalysisParams;

/// Measures widths and lengths from landmarks in normalized image units.
///
/// The waist is measured with the configured [`WaistModel`](crate::WaistModel).
#[must_use]
pub fn measure(landmarks: &PoseLandmarks, params: &AnalysisParams) -> BodyMeasurements {
    let shoulder_width = landmarks[L::LeftShoulder].planar_distance(&landmarks[L::RightShoulder]);
    let hip_width = landmarks[L::LeftHip].planar_distance(&landmarks[L::RightHip]);

    let shoulder_mid = landmarks.midpoint(L::LeftShoulder, L::RightShoulder);
    let hip_mid = landmarks.midpoint(L::LeftHip, L::RightHip);
    let ankle_mid = landmarks.midpoint(L::LeftAnkle, L::RightAnkle);

    let limb = |a: L, b: L, c: L| {
        landmarks[a].planar_distance(&landmarks[b]) + landmarks[b].planar_distance(&landmarks[c])
    };
    let arm_length = (limb(L::LeftShoulder, L::LeftElbow, L::LeftWrist)
        + limb(L::RightShoulder, L::RightElbow, L::RightWrist))
        / 2.0;
    let leg_length = (limb(L::LeftHip, L::LeftKnee, L::LeftAnkle)
        + limb(L::RightHip, L::RightKnee, L::RightAnkle))
        / 2.0;

    let model = params.waist;
    let waist_y = model.level.mul_add(hip_mid.y - shoulder_mid.y, shoulder_mid.y);
    let left_arm = arm_x_at(landmarks, [L::LeftShoulder, L::LeftElbow, L::LeftWrist], waist_y);
    let right_arm = arm_x_at(landmarks, [L::RightShoulder, L::RightElbow, L::RightWrist], waist_y);
    let waist_width = match (left_arm, right_arm) {
        (Some(left), Some(right)) => model.from_arm_gap((left - right).abs()),
        _ => model.estimate(shoulder_width, hip_width),
    };

    BodyMeasurements {
        shoulder_width,
        waist_width,
        hip_width,
        upper_body_length: shoulder_mid.planar_distance(&hip_mid),
        lower_body_length: hip_mid.planar_distance(&ankle_mid),
        arm_length,
        leg_length,
    }
}

/// X of a hanging shoulder→elbow→wrist chain at height `y`.
///
/// `None` unless one of the downward segments spans `y`.
fn arm_x_at(landmarks: &PoseLandmarks, chain: [L; 3], y: f64) -> Option<f64> {
    chain.windows(2).find_map(|pair| {
        let (a, b) = (landmarks[pair[0]], landmarks[pair[1]]);
        let dy = b.y - a.y;
        if dy <= f64::EPSILON || y < a.y || y > b.y {
            return None;
        }
        Some(((y - a.y) / dy).mul_add(b.x - a.x, a.x))
    })
}

/// Scale factor that maps the torso + leg chain onto a real height.
///
/// # Errors
///
/// - [`AnalysisError::InvalidCalibration`] if the height is outside the
///   configured plausible range
/// - [`AnalysisError::DegenerateGeometry`] if the chain has no length
pub fn calibration_scale(
    measurements: &BodyMeasurements,
    height_cm: f64,
    params: &AnalysisParams,
) -> Result<f64> {
    if !params.is_plausible_height(height_cm) {
        let (min_cm, max_cm) = params.height_range_cm;
        return Err(AnalysisError::InvalidCalibration {
            height_cm,
            min_cm,
            max_cm,
        });
    }
    let chain = measurements.upper_body_length + measurements.lower_body_length;
    if !chain.is_finite() || chain <= params.degenerate_epsilon {
        return Err(AnalysisError::degenerate("torso_leg_chain", chain));
    }
    Ok(height_cm / chain)
}

/// Computes body ratios from validated landmarks.
///
/// With a plausible `height_cm` every width and length is rescaled so the
/// torso + leg chain equals that height; otherwise values stay in normalized
/// units. An implausible height is logged and skipped, not fatal.
///
/// # Errors
///
/// Returns [`AnalysisError::DegenerateGeometry`] when a ratio denominator is
/// zero or near zero (typically collapsed, occluded joints).
///
/// # Example
///
/// ```
/// use body_analysis::{AnalysisParams, compute_ratios};
/// use body_types::PoseLandmarks;
///
/// // All landmarks at the origin: every width is zero.
/// let result = compute_ratios(&PoseLandmarks::default(), None, &AnalysisParams::default());
/// assert!(result.is_err());
/// ```
pub fn compute_ratios(
    landmarks: &PoseLandmarks,
    height_cm: Option<f64>,
    params: &AnalysisParams,
) -> Result<BodyRatios> {
    let measurements = measure(landmarks, params);

    // Reject degenerate geometry in normalized units, before any scaling.
    if let Some((measure, value)) = measurements.first_degenerate(params.degenerate_epsilon) {
        return Err(AnalysisError::degenerate(measure, value));
    }

    let (measurements, calibration) = match height_cm {
        Some(height_cm) => match calibration_scale(&measurements, height_cm, params) {
            Ok(scale) => (
                measurements.scaled(scale),
                Calibration::Centimeters { height_cm },
            ),
            Err(err @ AnalysisError::InvalidCalibration { .. }) => {
                warn!(%err, "Skipping calibration");
                (measurements, Calibration::Normalized)
            }
            Err(err) => return Err(err),
        },
        None => (measurements, Calibration::Normalized),
    };

    let ratios = BodyRatios::from_measurements(measurements, calibration, 0.0)?;
    debug!(
        shoulder_to_waist = ratios.shoulder_to_waist_ratio,
        waist_to_hip = ratios.waist_to_hip_ratio,
        upper_to_lower = ratios.upper_to_lower_ratio,
        arm_to_torso = ratios.arm_to_torso_ratio,
        calibrated = calibration.is_calibrated(),
        "Body ratios computed"
    );
    Ok(ratios)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
pub(crate) mod tests {
    use super::*;
    use crate::classify::classify;
    use approx::assert_relative_eq;
    use body_types::{BodyShapeType, Landmark};

    /// Upright, symmetric test figure with shoulder width `sw` and hip width `hw`.
    pub(crate) fn figure(sw: f64, hw: f64) -> PoseLandmarks {
        let mut pose = PoseLandmarks::default();
        let mut put = |i: L, x: f64, y: f64| pose.set(i, Landmark::new(x, y, 0.0, 0.95));
        put(L::Nose, 0.5, 0.10);
        put(L::LeftEar, 0.47, 0.11);
        put(L::RightEar, 0.53, 0.11);
        put(L::LeftShoulder, 0.5 + sw / 2.0, 0.25);
        put(L::RightShoulder, 0.5 - sw / 2.0, 0.25);
        put(L::LeftElbow, 0.5 + sw / 2.0, 0.40);
        put(L::RightElbow, 0.5 - sw / 2.0, 0.40);
        put(L::LeftWrist, 0.5 + sw / 2.0, 0.52);
        put(L::RightWrist, 0.5 - sw / 2.0, 0.52);
        put(L::LeftHip, 0.5 + hw / 2.0, 0.55);
        put(L::RightHip, 0.5 - hw / 2.0, 0.55);
        put(L::LeftKnee, 0.5 + hw / 2.0, 0.72);
        put(L::RightKnee, 0.5 - hw / 2.0, 0.72);
        put(L::LeftAnkle, 0.5 + hw / 2.0, 0.90);
        put(L::RightAnkle, 0.5 - hw / 2.0, 0.90);
        pose
    }

    #[test]
    fn test_widths_and_lengths() {
        let params = AnalysisParams::default();
        let r = compute_ratios(&figure(0.2, 0.16), None, &params).unwrap();
        assert_relative_eq!(r.shoulder_width, 0.2, epsilon = 1e-12);
        assert_relative_eq!(r.hip_width, 0.16, epsilon = 1e-12);
        assert_relative_eq!(r.upper_body_length, 0.30, epsilon = 1e-12);
        assert_relative_eq!(r.lower_body_length, 0.35, epsilon = 1e-12);
        assert_relative_eq!(r.arm_length, 0.27, epsilon = 1e-12);
        assert_relative_eq!(r.leg_length, 0.35, epsilon = 1e-12);
        // Arms hang straight down from the shoulders.
        assert_relative_eq!(r.waist_width, 0.85 * 0.2, epsilon = 1e-12);
        assert_relative_eq!(r.arm_to_torso_ratio, 0.9, epsilon = 1e-12);
        assert_eq!(r.calibration, Calibration::Normalized);
    }

    /// [`figure`] with elbows and wrists `gap` apart.
    fn with_arm_gap(mut pose: PoseLandmarks, gap: f64) -> PoseLandmarks {
        for (i, x) in [
            (L::LeftElbow, 0.5 + gap / 2.0),
            (L::RightElbow, 0.5 - gap / 2.0),
            (L::LeftWrist, 0.5 + gap / 2.0),
            (L::RightWrist, 0.5 - gap / 2.0),
        ] {
            let l = pose[i];
            pose.set(i, Landmark::new(x, l.y, l.z, l.visibility));
        }
        pose
    }

    #[test]
    fn test_waist_follows_arm_gap() {
        let params = AnalysisParams::default();
        let r = compute_ratios(&with_arm_gap(figure(0.2, 0.2), 0.16), None, &params).unwrap();
        assert_relative_eq!(r.waist_width, 0.85 * 0.16, epsilon = 1e-12);
    }

    #[test]
    fn test_raised_arms_use_frame_estimate() {
        let params = AnalysisParams::default();
        let mut pose = figure(0.2, 0.16);
        for (i, y) in [
            (L::LeftElbow, 0.15),
            (L::RightElbow, 0.15),
            (L::LeftWrist, 0.05),
            (L::RightWrist, 0.05),
        ] {
            let l = pose[i];
            pose.set(i, Landmark::new(l.x, y, l.z, l.visibility));
        }
        let r = compute_ratios(&pose, None, &params).unwrap();
        assert_relative_eq!(r.waist_width, params.waist.estimate(0.2, 0.16), epsilon = 1e-12);
    }

    #[test]
    fn test_every_shape_is_measurable() {
        let params = AnalysisParams::default();
        for (sw, hw, gap, shape) in [
            (0.2, 0.2, 0.16, BodyShapeType::Hourglass),
            (0.24, 0.18, 0.24, BodyShapeType::InvertedTriangle),
            (0.18, 0.24, 0.18, BodyShapeType::Triangle),
            (0.2, 0.2, 0.26, BodyShapeType::Oval),
            (0.2, 0.2, 0.2, BodyShapeType::Rectangle),
        ] {
            let r = compute_ratios(&with_arm_gap(figure(sw, hw), gap), None, &params).unwrap();
            assert_eq!(classify(&r, &params.shape, 1.0).shape, shape, "{sw}/{hw}/{gap}");
        }
    }

    #[test]
    fn test_collapsed_arms_are_degenerate() {
        let params = AnalysisParams::default();
        let mut pose = figure(0.2, 0.16);
        for (i, from) in [
            (L::LeftElbow, L::LeftShoulder),
            (L::LeftWrist, L::LeftShoulder),
            (L::RightElbow, L::RightShoulder),
            (L::RightWrist, L::RightShoulder),
        ] {
            pose.set(i, pose[from]);
        }
        let err = compute_ratios(&pose, None, &params).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::DegenerateGeometry {
                measure: "arm_length",
                ..
            }
        ));
    }

    #[test]
    fn test_calibration_sums_chain_to_height() {
        let params = AnalysisParams::default();
        let r = compute_ratios(&figure(0.2, 0.16), Some(170.0), &params).unwrap();
        assert_relative_eq!(
            r.upper_body_length + r.lower_body_length,
            170.0,
            epsilon = 1e-9
        );
        assert_eq!(r.calibration, Calibration::Centimeters { height_cm: 170.0 });

        let normalized = compute_ratios(&figure(0.2, 0.16), None, &params).unwrap();
        assert_relative_eq!(
            r.waist_to_hip_ratio,
            normalized.waist_to_hip_ratio,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_implausible_height_skips_calibration() {
        let params = AnalysisParams::default();
        let r = compute_ratios(&figure(0.2, 0.16), Some(400.0), &params).unwrap();
        assert_eq!(r.calibration, Calibration::Normalized);
        assert_relative_eq!(r.shoulder_width, 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_collapsed_hips_are_degenerate() {
        let params = AnalysisParams::default();
        let err = compute_ratios(&figure(0.2, 0.0), Some(170.0), &params).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::DegenerateGeometry {
                measure: "hip_width",
                ..
            }
        ));
    }

    #[test]
    fn test_calibration_scale_bounds() {
        let params = AnalysisParams::default();
        let m = measure(&figure(0.2, 0.16), &params);
        assert!(matches!(
            calibration_scale(&m, 99.0, &params),
            Err(AnalysisError::InvalidCalibration { .. })
        ));
        assert_relative_eq!(
            calibration_scale(&m, 130.0, &params).unwrap(),
            200.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_idempotent() {
        let params = AnalysisParams::default();
        let pose = figure(0.21, 0.19);
        let a = compute_ratios(&pose, Some(165.0), &params).unwrap();
        let b = compute_ratios(&pose, Some(165.0), &params).unwrap();
        assert_eq!(a, b);
    }
}
