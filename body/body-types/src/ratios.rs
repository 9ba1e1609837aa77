//! Body width/length measurements and the ratios derived from them.

use serde::{Deserialize, Serialize};

use crate::error::TypesError;

/// Unit system of the widths and lengths in [`BodyRatios`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "unit", rename_all = "snake_case")]
pub enum Calibration {
    /// Normalized image units. Not comparable across images.
    Normalized,
    /// Centimeters, scaled from a known standing height.
    Centimeters {
        /// Height the measurements were scaled to.
        height_cm: f64,
    },
}

impl Calibration {
    /// Returns `true` if measurements are in real centimeters.
    #[must_use]
    pub const fn is_calibrated(&self) -> bool {
        matches!(self, Self::Centimeters { .. })
    }
}

/// Raw widths and lengths, before any ratio is formed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BodyMeasurements {
    /// Shoulder-to-shoulder width.
    pub shoulder_width: f64,
    /// Estimated waist width.
    pub waist_width: f64,
    /// Hip-to-hip width.
    pub hip_width: f64,
    /// Shoulder midpoint to hip midpoint.
    pub upper_body_length: f64,
    /// Hip midpoint to ankle midpoint.
    pub lower_body_length: f64,
    /// Mean of left/right shoulder→elbow→wrist.
    pub arm_length: f64,
    /// Mean of left/right hip→knee→ankle.
    pub leg_length: f64,
}

impl BodyMeasurements {
    /// Multiplies every width and length by `factor`.
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            shoulder_width: self.shoulder_width * factor,
            waist_width: self.waist_width * factor,
            hip_width: self.hip_width * factor,
            upper_body_length: self.upper_body_length * factor,
            lower_body_length: self.lower_body_length * factor,
            arm_length: self.arm_length * factor,
            leg_length: self.leg_length * factor,
        }
    }

    /// First measurement that is not finite or sits at or below `epsilon`.
    ///
    /// A complete result needs every width and length strictly positive,
    /// so limbs are held to the same bound as the ratio denominators.
    #[must_use]
    pub fn first_degenerate(&self, epsilon: f64) -> Option<(&'static str, f64)> {
        [
            ("shoulder_width", self.shoulder_width),
            ("waist_width", self.waist_width),
            ("hip_width", self.hip_width),
            ("upper_body_length", self.upper_body_length),
            ("lower_body_length", self.lower_body_length),
            ("arm_length", self.arm_length),
            ("leg_length", self.leg_length),
        ]
        .into_iter()
        .find(|&(_, v)| !v.is_finite() || v <= epsilon)
    }
}

/// Calibrated or normalized body proportions.
///
/// Every width and length is strictly positive; construction through
/// [`BodyRatios::from_measurements`] rejects degenerate input instead of
/// producing `NaN` or infinite ratios.
///
/// # Example
///
/// ```
/// use body_types::{BodyMeasurements, BodyRatios, Calibration};
///
/// let m = BodyMeasurements {
///     shoulder_width: 40.0,
///     waist_width: 28.0,
///     hip_width: 40.0,
///     upper_body_length: 50.0,
///     lower_body_length: 80.0,
///     arm_length: 60.0,
///     leg_length: 82.0,
/// };
/// let ratios = BodyRatios::from_measurements(m, Calibration::Normalized, 1e-9).unwrap();
/// assert!((ratios.waist_to_hip_ratio - 0.7).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyRatios {
    /// Shoulder width.
    pub shoulder_width: f64,
    /// Waist width.
    pub waist_width: f64,
    /// Hip width.
    pub hip_width: f64,
    /// Torso length (shoulder midpoint to hip midpoint).
    pub upper_body_length: f64,
    /// Hip midpoint to ankle midpoint.
    pub lower_body_length: f64,
    /// Average arm length.
    pub arm_length: f64,
    /// Average leg length.
    pub leg_length: f64,
    /// `shoulder_width / waist_width`.
    pub shoulder_to_waist_ratio: f64,
    /// `waist_width / hip_width`.
    pub waist_to_hip_ratio: f64,
    /// `upper_body_length / lower_body_length`.
    pub upper_to_lower_ratio: f64,
    /// `arm_length / upper_body_length`.
    pub arm_to_torso_ratio: f64,
    /// Unit system of the widths and lengths.
    pub calibration: Calibration,
}

impl BodyRatios {
    /// Builds ratios from raw measurements.
    ///
    /// # Errors
    ///
    /// Returns [`TypesError::Degenerate`] if any width or length is at or
    /// below `epsilon`, or not finite.
    pub fn from_measurements(
        m: BodyMeasurements,
        calibration: Calibration,
        epsilon: f64,
    ) -> Result<Self, TypesError> {
        if let Some((measure, value)) = m.first_degenerate(epsilon) {
            return Err(TypesError::degenerate(measure, value));
        }

        Ok(Self {
            shoulder_width: m.shoulder_width,
            waist_width: m.waist_width,
            hip_width: m.hip_width,
            upper_body_length: m.upper_body_length,
            lower_body_length: m.lower_body_length,
            arm_length: m.arm_length,
            leg_length: m.leg_length,
            shoulder_to_waist_ratio: m.shoulder_width / m.waist_width,
            waist_to_hip_ratio: m.waist_width / m.hip_width,
            upper_to_lower_ratio: m.upper_body_length / m.lower_body_length,
            arm_to_torso_ratio: m.arm_length / m.upper_body_length,
            calibration,
        })
    }

    /// The raw widths and lengths.
    #[must_use]
    pub const fn measurements(&self) -> BodyMeasurements {
        BodyMeasurements {
            shoulder_width: self.shoulder_width,
            waist_width: self.waist_width,
            hip_width: self.hip_width,
            upper_body_length: self.upper_body_length,
            lower_body_length: self.lower_body_length,
            arm_length: self.arm_length,
            leg_length: self.leg_length,
        }
    }

    /// Replaces the waist width and recomputes the ratios that use it.
    ///
    /// # Errors
    ///
    /// Returns [`TypesError::Degenerate`] if the new waist is unusable.
    pub fn with_waist_width(self, waist_width: f64, epsilon: f64) -> Result<Self, TypesError> {
        let m = BodyMeasurements {
            waist_width,
            ..self.measurements()
        };
        Self::from_measurements(m, self.calibration, epsilon)
    }

    /// `shoulder_width / hip_width`.
    #[must_use]
    pub fn shoulder_to_hip_ratio(&self) -> f64 {
        self.shoulder_width / self.hip_width
    }

    /// `waist_width / shoulder_width`.
    #[must_use]
    pub fn waist_to_shoulder_ratio(&self) -> f64 {
        self.waist_width / self.shoulder_width
    }

    /// Relative difference between shoulder and hip width, `|s - h| / max(s, h)`.
    #[must_use]
    pub fn shoulder_hip_difference(&self) -> f64 {
        (self.shoulder_width - self.hip_width).abs() / self.shoulder_width.max(self.hip_width)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn measurements() -> BodyMeasurements {
        BodyMeasurements {
            shoulder_width: 45.0,
            waist_width: 36.0,
            hip_width: 38.0,
            upper_body_length: 52.0,
            lower_body_length: 84.0,
            arm_length: 62.0,
            leg_length: 86.0,
        }
    }

    #[test]
    fn derived_ratios() {
        let r = BodyRatios::from_measurements(measurements(), Calibration::Normalized, 1e-9)
            .unwrap();
        assert_relative_eq!(r.shoulder_to_waist_ratio, 45.0 / 36.0);
        assert_relative_eq!(r.waist_to_hip_ratio, 36.0 / 38.0);
        assert_relative_eq!(r.upper_to_lower_ratio, 52.0 / 84.0);
        assert_relative_eq!(r.arm_to_torso_ratio, 62.0 / 52.0);
        assert_relative_eq!(r.shoulder_to_hip_ratio(), 45.0 / 38.0);
        assert!(!r.calibration.is_calibrated());
    }

    #[test]
    fn zero_denominator_is_rejected() {
        let m = BodyMeasurements {
            hip_width: 0.0,
            ..measurements()
        };
        let err = BodyRatios::from_measurements(m, Calibration::Normalized, 1e-9).unwrap_err();
        assert!(matches!(
            err,
            TypesError::Degenerate {
                measure: "hip_width",
                ..
            }
        ));
    }

    #[test]
    fn nan_is_rejected() {
        let m = BodyMeasurements {
            leg_length: f64::NAN,
            ..measurements()
        };
        assert!(BodyRatios::from_measurements(m, Calibration::Normalized, 1e-9).is_err());
    }

    #[test]
    fn zero_length_limb_is_rejected() {
        let m = BodyMeasurements {
            arm_length: 0.0,
            ..measurements()
        };
        let err = BodyRatios::from_measurements(m, Calibration::Normalized, 1e-9).unwrap_err();
        assert!(matches!(
            err,
            TypesError::Degenerate {
                measure: "arm_length",
                ..
            }
        ));
    }

    #[test]
    fn scaling_preserves_ratios() {
        let a = BodyRatios::from_measurements(measurements(), Calibration::Normalized, 1e-9)
            .unwrap();
        let b = BodyRatios::from_measurements(
            measurements().scaled(3.5),
            Calibration::Centimeters { height_cm: 170.0 },
            1e-9,
        )
        .unwrap();
        assert_relative_eq!(a.waist_to_hip_ratio, b.waist_to_hip_ratio, epsilon = 1e-12);
        assert_relative_eq!(a.arm_to_torso_ratio, b.arm_to_torso_ratio, epsilon = 1e-12);
        assert_relative_eq!(b.shoulder_width, 45.0 * 3.5);
        assert!(b.calibration.is_calibrated());
    }

    #[test]
    fn replacing_waist_recomputes() {
        let r = BodyRatios::from_measurements(measurements(), Calibration::Normalized, 1e-9)
            .unwrap()
            .with_waist_width(28.5, 1e-9)
            .unwrap();
        assert_relative_eq!(r.waist_to_hip_ratio, 0.75);
        assert_relative_eq!(r.shoulder_to_waist_ratio, 45.0 / 28.5);
    }

    #[test]
    fn shoulder_hip_difference_is_symmetric() {
        let r = BodyRatios::from_measurements(measurements(), Calibration::Normalized, 1e-9)
            .unwrap();
        assert_relative_eq!(r.shoulder_hip_difference(), 7.0 / 45.0, epsilon = 1e-12);
    }
}
