//! Tunable parameters for the analysis pipeline.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// Anthropometric model used to measure waist width.
///
/// No detector keypoint sits on the waist, so the waist is placed at
/// `level` along the shoulder-midpoint → hip-midpoint chain. Relaxed arms
/// rest against the torso at that height: the horizontal gap between the
/// left and right shoulder→elbow→wrist chains there, narrowed by `taper` for
/// the thickness of the arms, is the waist width.
///
/// When an arm does not hang across the waist height (raised or folded
/// arms), the waist falls back to the shoulder/hip width interpolated at
/// `level`, narrowed by the same taper:
///
/// `waist = taper * (shoulder + level * (hip - shoulder))`
///
/// The fallback alone never reaches the hourglass or oval regions of the
/// default shape thresholds, since it ties the waist to the frame widths.
///
/// # Example
///
/// ```
/// use body_analysis::WaistModel;
///
/// let model = WaistModel::default();
/// assert!((model.from_arm_gap(40.0) - 34.0).abs() < 1e-10);
/// assert!((model.estimate(40.0, 40.0) - 34.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaistModel {
    /// Waist position along the torso, 0 at the shoulders and 1 at the hips.
    pub level: f64,
    /// Narrowing of the waist relative to the arm gap or the interpolated
    /// frame width.
    pub taper: f64,
}

impl WaistModel {
    /// Default waist level (natural waist sits ~60% down the torso).
    pub const DEFAULT_LEVEL: f64 = 0.6;
    /// Default taper.
    pub const DEFAULT_TAPER: f64 = 0.85;

    /// Waist width from the gap between the arms at waist height.
    #[must_use]
    pub fn from_arm_gap(&self, arm_gap: f64) -> f64 {
        self.taper * arm_gap
    }

    /// Arm gap that yields `waist_width`.
    #[must_use]
    pub fn arm_gap_for(&self, waist_width: f64) -> f64 {
        waist_width / self.taper
    }

    /// Estimates waist width from shoulder and hip width alone.
    #[must_use]
    pub fn estimate(&self, shoulder_width: f64, hip_width: f64) -> f64 {
        self.taper * self.level.mul_add(hip_width - shoulder_width, shoulder_width)
    }
}

impl Default for WaistModel {
    fn default() -> Self {
        Self {
            level: Self::DEFAULT_LEVEL,
            taper: Self::DEFAULT_TAPER,
        }
    }
}

/// Thresholds of the ordered shape rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeThresholds {
    /// Hourglass: maximum `waist/hip` and `waist/shoulder` (inclusive).
    pub hourglass_waist_ratio: f64,
    /// Hourglass: shoulder/hip relative difference must be below this.
    pub balanced_difference: f64,
    /// Inverted triangle / triangle: minimum dominant-to-minor width ratio.
    pub dominance_ratio: f64,
    /// Oval: minimum `waist / min(shoulder, hip)`.
    pub oval_waist_ratio: f64,
    /// Confidence reported when a metric sits exactly on its threshold.
    pub confidence_floor: f64,
    /// Relative excess over the threshold at which confidence reaches 1.
    pub saturation_excess: f64,
}

impl Default for ShapeThresholds {
    fn default() -> Self {
        Self {
            hourglass_waist_ratio: 0.75,
            balanced_difference: 0.10,
            dominance_ratio: 1.1,
            oval_waist_ratio: 1.0,
            confidence_floor: 0.6,
            saturation_excess: 0.25,
        }
    }
}

/// Issue thresholds of the posture advisor.
///
/// Each issue triggers when its magnitude exceeds the threshold; severity
/// rises linearly from 1 at the threshold to 5 at the `*_full` value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostureThresholds {
    /// Shoulder/hip tilt threshold, degrees.
    pub tilt_deg: f64,
    /// Tilt at maximum severity, degrees.
    pub tilt_full_deg: f64,
    /// Score points lost per degree of trunk lean.
    pub spine_points_per_degree: f64,
    /// Spine alignment score below which misalignment is reported.
    pub spine_min_score: f64,
    /// Score deficit (100 - score) at maximum severity.
    pub spine_full_deficit: f64,
    /// Half-width of the neutral head band, in torso lengths.
    pub head_dead_zone: f64,
    /// Forward head offset at maximum severity, in torso lengths.
    pub head_full: f64,
    /// Shoulders-ahead-of-hips offset threshold, in torso lengths.
    pub rounded_shoulders: f64,
    /// Rounded shoulder offset at maximum severity.
    pub rounded_shoulders_full: f64,
    /// Hips-ahead-of-line offset threshold, in torso lengths.
    pub swayback: f64,
    /// Swayback offset at maximum severity.
    pub swayback_full: f64,
}

impl Default for PostureThresholds {
    fn default() -> Self {
        Self {
            tilt_deg: 3.0,
            tilt_full_deg: 12.0,
            spine_points_per_degree: 5.0,
            spine_min_score: 85.0,
            spine_full_deficit: 60.0,
            head_dead_zone: 0.05,
            head_full: 0.25,
            rounded_shoulders: 0.06,
            rounded_shoulders_full: 0.25,
            swayback: 0.05,
            swayback_full: 0.20,
        }
    }
}

/// Parameters shared by every analysis an analyzer runs.
///
/// # Example
///
/// ```
/// use body_analysis::AnalysisParams;
/// use std::time::Duration;
///
/// let params = AnalysisParams::new()
///     .with_min_confidence(0.6)
///     .with_detector_timeout(Duration::from_secs(3))
///     .with_mock_seed(7);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisParams {
    /// Minimum detector confidence accepted without override (default: 0.5).
    pub min_confidence: f64,

    /// Factor applied to measurement confidence when a low-confidence
    /// detection is accepted under override (default: 0.5).
    pub degraded_trust_factor: f64,

    /// Time budget for the external detector (default: 10 s).
    pub detector_timeout: Duration,

    /// Plausible height range for calibration, cm (default: 100–250).
    pub height_range_cm: (f64, f64),

    /// Plausible weight range for BMI, kg (default: 20–300).
    pub weight_range_kg: (f64, f64),

    /// Widths/lengths at or below this are treated as degenerate (default: 1e-6).
    pub degenerate_epsilon: f64,

    /// Waist estimation model.
    pub waist: WaistModel,

    /// Shape rule thresholds.
    pub shape: ShapeThresholds,

    /// Posture issue thresholds.
    pub posture: PostureThresholds,

    /// Seed for the fallback generator. `None` draws from entropy.
    pub mock_seed: Option<u64>,
}

impl AnalysisParams {
    /// Default minimum confidence.
    pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.5;

    /// Default degraded trust factor.
    pub const DEFAULT_DEGRADED_TRUST_FACTOR: f64 = 0.5;

    /// Default detector timeout.
    pub const DEFAULT_DETECTOR_TIMEOUT: Duration = Duration::from_secs(10);

    /// Default plausible height range, cm.
    pub const DEFAULT_HEIGHT_RANGE_CM: (f64, f64) = (100.0, 250.0);

    /// Default plausible weight range, kg.
    pub const DEFAULT_WEIGHT_RANGE_KG: (f64, f64) = (20.0, 300.0);

    /// Default degenerate epsilon.
    pub const DEFAULT_DEGENERATE_EPSILON: f64 = 1e-6;

    /// Creates parameters with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum detector confidence.
    #[must_use]
    pub const fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    /// Sets the degraded trust factor.
    #[must_use]
    pub const fn with_degraded_trust_factor(mut self, factor: f64) -> Self {
        self.degraded_trust_factor = factor;
        self
    }

    /// Sets the detector timeout.
    #[must_use]
    pub const fn with_detector_timeout(mut self, timeout: Duration) -> Self {
        self.detector_timeout = timeout;
        self
    }

    /// Sets the waist model.
    #[must_use]
    pub const fn with_waist_model(mut self, waist: WaistModel) -> Self {
        self.waist = waist;
        self
    }

    /// Sets the shape thresholds.
    #[must_use]
    pub const fn with_shape_thresholds(mut self, shape: ShapeThresholds) -> Self {
        self.shape = shape;
        self
    }

    /// Sets the posture thresholds.
    #[must_use]
    pub const fn with_posture_thresholds(mut self, posture: PostureThresholds) -> Self {
        self.posture = posture;
        self
    }

    /// Seeds the fallback generator for reproducible synthetic results.
    #[must_use]
    pub const fn with_mock_seed(mut self, seed: u64) -> Self {
        self.mock_seed = Some(seed);
        self
    }

    /// Returns `true` if the height can be used for calibration.
    #[must_use]
    pub fn is_plausible_height(&self, height_cm: f64) -> bool {
        let (min, max) = self.height_range_cm;
        (min..=max).contains(&height_cm)
    }

    /// Returns `true` if the weight can be used for BMI.
    #[must_use]
    pub fn is_plausible_weight(&self, weight_kg: f64) -> bool {
        let (min, max) = self.weight_range_kg;
        (min..=max).contains(&weight_kg)
    }

    /// Checks that all parameters are usable.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidConfig`] describing the first bad value.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(AnalysisError::invalid_config(format!(
                "min_confidence {} not in [0, 1]",
                self.min_confidence
            )));
        }
        if !(0.0..=1.0).contains(&self.degraded_trust_factor) {
            return Err(AnalysisError::invalid_config(format!(
                "degraded_trust_factor {} not in [0, 1]",
                self.degraded_trust_factor
            )));
        }
        if self.detector_timeout.is_zero() {
            return Err(AnalysisError::invalid_config("detector_timeout must be positive"));
        }
        let (min_h, max_h) = self.height_range_cm;
        if !(min_h > 0.0 && min_h < max_h) {
            return Err(AnalysisError::invalid_config(format!(
                "height range [{min_h}, {max_h}] is empty"
            )));
        }
        let (min_w, max_w) = self.weight_range_kg;
        if !(min_w > 0.0 && min_w < max_w) {
            return Err(AnalysisError::invalid_config(format!(
                "weight range [{min_w}, {max_w}] is empty"
            )));
        }
        if !(self.degenerate_epsilon > 0.0) {
            return Err(AnalysisError::invalid_config("degenerate_epsilon must be positive"));
        }
        if !(0.0..=1.0).contains(&self.waist.level) || !(self.waist.taper > 0.0) {
            return Err(AnalysisError::invalid_config(format!(
                "waist model level {} / taper {} out of range",
                self.waist.level, self.waist.taper
            )));
        }
        if !(self.shape.saturation_excess > 0.0) || !(self.shape.dominance_ratio > 1.0) {
            return Err(AnalysisError::invalid_config(
                "shape saturation_excess must be positive and dominance_ratio above 1",
            ));
        }
        let p = &self.posture;
        if p.tilt_full_deg <= p.tilt_deg
            || p.head_full <= p.head_dead_zone
            || p.rounded_shoulders_full <= p.rounded_shoulders
            || p.swayback_full <= p.swayback
            || p.spine_full_deficit <= 100.0 - p.spine_min_score
        {
            return Err(AnalysisError::invalid_config(
                "posture full-severity values must exceed their thresholds",
            ));
        }
        Ok(())
    }
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            min_confidence: Self::DEFAULT_MIN_CONFIDENCE,
            degraded_trust_factor: Self::DEFAULT_DEGRADED_TRUST_FACTOR,
            detector_timeout: Self::DEFAULT_DETECTOR_TIMEOUT,
            height_range_cm: Self::DEFAULT_HEIGHT_RANGE_CM,
            weight_range_kg: Self::DEFAULT_WEIGHT_RANGE_KG,
            degenerate_epsilon: Self::DEFAULT_DEGENERATE_EPSILON,
            waist: WaistModel::default(),
            shape: ShapeThresholds::default(),
            posture: PostureThresholds::default(),
            mock_seed: None,
        }
    }
}

/// Per-request options.
///
/// # Example
///
/// ```
/// use body_analysis::AnalysisOptions;
///
/// let options = AnalysisOptions::new().with_height_cm(170.0).with_weight_kg(65.0);
/// assert!(options.include_posture);
/// assert!(!options.force_mock);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Real standing height for calibration and BMI.
    pub height_cm: Option<f64>,
    /// Real weight for BMI.
    pub weight_kg: Option<f64>,
    /// Run the posture advisor (default: true).
    pub include_posture: bool,
    /// Compose styling recommendations (default: true).
    pub include_styling: bool,
    /// Skip detection and return a synthetic result.
    pub force_mock: bool,
    /// Accept low-confidence detections with reduced measurement confidence.
    pub allow_low_confidence: bool,
}

impl AnalysisOptions {
    /// Creates options with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the real height.
    #[must_use]
    pub const fn with_height_cm(mut self, height_cm: f64) -> Self {
        self.height_cm = Some(height_cm);
        self
    }

    /// Sets the real weight.
    #[must_use]
    pub const fn with_weight_kg(mut self, weight_kg: f64) -> Self {
        self.weight_kg = Some(weight_kg);
        self
    }

    /// Enables or disables the posture advisor.
    #[must_use]
    pub const fn with_posture(mut self, include: bool) -> Self {
        self.include_posture = include;
        self
    }

    /// Enables or disables styling recommendations.
    #[must_use]
    pub const fn with_styling(mut self, include: bool) -> Self {
        self.include_styling = include;
        self
    }

    /// Requests a synthetic result.
    #[must_use]
    pub const fn force_mock(mut self) -> Self {
        self.force_mock = true;
        self
    }

    /// Accepts low-confidence detections with degraded trust.
    #[must_use]
    pub const fn allow_low_confidence(mut self) -> Self {
        self.allow_low_confidence = true;
        self
    }
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            height_cm: None,
            weight_kg: None,
            include_posture: true,
            include_styling: true,
            force_mock: false,
            allow_low_confidence: false,
        }
    }
}
