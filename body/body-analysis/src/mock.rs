//! Synthetic, self-consistent analysis results.
//!
//! The generator never labels numbers directly. It samples a target shape,
//! draws widths inside that shape's region, synthesizes a full landmark set
//! that carries those widths (the arms frame the waist the way the waist
//! model reads it) and a plausible posture, and then runs the same ratio,
//! classification and posture code as the real path. Re-analyzing the
//! synthetic landmarks reproduces the reported ratios and shape.

use body_types::{BodyShapeType, Landmark, LandmarkIndex as L, PoseLandmarks, RawDetection};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::classify::classify;
use crate::error::{AnalysisError, Result};
use crate::params::{AnalysisOptions, AnalysisParams, WaistModel};
use crate::pipeline::PipelineStage;
use crate::ratios::compute_ratios;
use crate::result::{AnalysisResult, Assessment, FallbackReason, Provenance};
use crate::validate::validate_detection;

/// Relative shoulder, waist and hip widths (shoulder = 1).
#[derive(Debug, Clone, Copy, PartialEq)]
struct WidthProfile {
    waist: f64,
    hip: f64,
}

/// Sagittal and frontal deviations, in torso lengths and degrees.
#[derive(Debug, Clone, Copy)]
struct PostureSample {
    facing: f64,
    shoulder_tilt_deg: f64,
    hip_tilt_deg: f64,
    head_offset: f64,
    shoulder_offset: f64,
    pelvis_offset: f64,
}

/// Generator of synthetic analysis results.
///
/// # Example
///
/// ```
/// use body_analysis::{AnalysisOptions, AnalysisParams, FallbackReason, MockGenerator};
///
/// let mut generator = MockGenerator::from_seed(7);
/// let options = AnalysisOptions::new().with_height_cm(170.0).with_weight_kg(65.0);
/// let result = generator
///     .generate(&options, &AnalysisParams::default(), FallbackReason::Requested)
///     .unwrap();
/// assert!(result.used_fallback());
/// assert!(result.bmi.is_some());
/// ```
#[derive(Debug, Clone)]
pub struct MockGenerator<R = StdRng> {
    rng: R,
}

impl MockGenerator<StdRng> {
    /// Creates a reproducible generator.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Creates a generator seeded from OS entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl<R: Rng> MockGenerator<R> {
    /// Attempts at hitting the sampled shape before using its prototype.
    pub const MAX_ATTEMPTS: usize = 8;

    /// Wraps an arbitrary random source.
    #[must_use]
    pub const fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Samples a shape uniformly.
    pub fn sample_shape(&mut self) -> BodyShapeType {
        BodyShapeType::ALL[self.rng.gen_range(0..BodyShapeType::ALL.len())]
    }

    /// Generates a complete synthetic result.
    ///
    /// Real height calibrates the synthetic ratios, and real height and
    /// weight produce a real BMI.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::FallbackFailed`] if the synthesized geometry
    /// is rejected, which only happens with unusable parameters.
    pub fn generate(
        &mut self,
        options: &AnalysisOptions,
        params: &AnalysisParams,
        reason: FallbackReason,
    ) -> Result<AnalysisResult> {
        self.generate_traced(options, params, reason, vec![PipelineStage::FallbackGenerating])
    }

    /// Generates a result continuing an existing stage trace.
    pub(crate) fn generate_traced(
        &mut self,
        options: &AnalysisOptions,
        params: &AnalysisParams,
        reason: FallbackReason,
        stages: Vec<PipelineStage>,
    ) -> Result<AnalysisResult> {
        let assessment = self.assess(options, params)?;
        Ok(assessment.finish(
            Provenance::Fallback { reason },
            options,
            params,
            stages,
            &mut self.rng,
        ))
    }

    fn assess(&mut self, options: &AnalysisOptions, params: &AnalysisParams) -> Result<Assessment> {
        let target = self.sample_shape();

        for attempt in 0..Self::MAX_ATTEMPTS {
            let profile = self.sample_widths(target);
            let assessment = self.synthesize(profile, options, params)?;
            if assessment.classification.shape == target {
                debug!(%target, attempt, "Synthetic result generated");
                return Ok(assessment);
            }
        }

        // Custom thresholds can make a sampling region miss; the prototype
        // is still classified, so the result stays self-consistent.
        let assessment = self.synthesize(prototype(target), options, params)?;
        debug!(
            %target,
            shape = %assessment.classification.shape,
            "Synthetic result generated from prototype"
        );
        Ok(assessment)
    }

    fn sample_widths(&mut self, target: BodyShapeType) -> WidthProfile {
        let rng = &mut self.rng;
        match target {
            BodyShapeType::Hourglass => {
                let hip = rng.gen_range(0.95..1.05);
                let waist = f64::min(1.0, hip) * rng.gen_range(0.60..0.72);
                WidthProfile { waist, hip }
            }
            BodyShapeType::InvertedTriangle => {
                let hip = 1.0 / rng.gen_range(1.13..1.35);
                let waist = hip * rng.gen_range(0.80..0.95);
                WidthProfile { waist, hip }
            }
            BodyShapeType::Triangle => {
                let hip = rng.gen_range(1.13..1.35);
                let waist = rng.gen_range(0.80..0.95);
                WidthProfile { waist, hip }
            }
            BodyShapeType::Oval => {
                let hip = rng.gen_range(0.96..1.04);
                let waist = f64::max(1.0, hip) * rng.gen_range(1.02..1.12);
                WidthProfile { waist, hip }
            }
            BodyShapeType::Rectangle => {
                let hip = rng.gen_range(0.95..1.05);
                let waist = f64::min(1.0, hip) * rng.gen_range(0.80..0.95);
                WidthProfile { waist, hip }
            }
        }
    }

    fn sample_posture(&mut self) -> PostureSample {
        let rng = &mut self.rng;
        PostureSample {
            facing: if rng.gen_bool(0.5) { 1.0 } else { -1.0 },
            shoulder_tilt_deg: rng.gen_range(-5.0..5.0),
            hip_tilt_deg: rng.gen_range(-4.0..4.0),
            head_offset: rng.gen_range(-0.03..0.14),
            shoulder_offset: rng.gen_range(-0.02..0.08),
            pelvis_offset: rng.gen_range(-0.02..0.07),
        }
    }

    /// Builds landmarks for the profile and measures them like a detection.
    fn synthesize(
        &mut self,
        profile: WidthProfile,
        options: &AnalysisOptions,
        params: &AnalysisParams,
    ) -> Result<Assessment> {
        let shoulder_width = self.rng.gen_range(0.18..0.24);
        let widths = (
            shoulder_width,
            shoulder_width * profile.waist,
            shoulder_width * profile.hip,
        );
        let posture = self.sample_posture();
        let landmarks = self.skeleton(widths, &params.waist, posture);

        let confidence = self.rng.gen_range(0.80..0.97);
        let raw = RawDetection::new(landmarks.into(), confidence);
        let validated = validate_detection(raw, params, true).map_err(to_fallback_failed)?;

        let ratios = compute_ratios(&validated.detection.landmarks, options.height_cm, params)
            .map_err(to_fallback_failed)?;

        let classification = classify(&ratios, &params.shape, validated.measurement_confidence);

        Ok(Assessment {
            detection: validated.detection,
            ratios,
            classification,
            measurement_confidence: validated.measurement_confidence,
        })
    }

    /// Full 33-point skeleton with exact shoulder, waist and hip widths.
    ///
    /// The elbows sit at waist height, as far apart as the waist model needs
    /// to read `waist_width`, with the forearms hanging straight down.
    fn skeleton(
        &mut self,
        (shoulder_width, waist_width, hip_width): (f64, f64, f64),
        waist: &WaistModel,
        p: PostureSample,
    ) -> PoseLandmarks {
        let torso = self.rng.gen_range(0.27..0.32);
        let leg = self.rng.gen_range(0.36..0.42);
        let shoulder_y = self.rng.gen_range(0.18..0.24);
        let hip_y = shoulder_y + torso;
        let ankle_y = hip_y + leg;

        let hip_x = 0.5;
        let shoulder_x = p.facing.mul_add(p.shoulder_offset * torso, hip_x);
        // Put the ankles so the shoulder-ankle line passes behind the hips
        // by the sampled pelvis offset.
        let line_x = p.facing.mul_add(-p.pelvis_offset * torso, hip_x);
        let u = torso / (torso + leg);
        let ankle_x = shoulder_x + (line_x - shoulder_x) / u;
        let ear_x = p.facing.mul_add(p.head_offset * torso, shoulder_x);

        let mut pose = PoseLandmarks::default();
        let mut put = |index: L, x: f64, y: f64, rng: &mut R| {
            pose.set(index, Landmark::new(x, y, 0.0, rng.gen_range(0.85..1.0)));
        };
        let rng = &mut self.rng;

        // Left side is the subject's left, which sits at larger x.
        let (s_left, s_right) =
            tilted_pair(shoulder_x, shoulder_y, shoulder_width, p.shoulder_tilt_deg);
        let (h_left, h_right) = tilted_pair(hip_x, hip_y, hip_width, p.hip_tilt_deg);
        let ankle_half = hip_width * 0.4;
        let waist_y = waist.level.mul_add(torso, shoulder_y);
        let waist_x = waist.level.mul_add(hip_x - shoulder_x, shoulder_x);
        let arm_half = waist.arm_gap_for(waist_width) / 2.0;
        let forearm = torso * 0.45;

        let head_y = shoulder_y - 0.13;
        put(L::Nose, p.facing.mul_add(0.02, ear_x), head_y, rng);
        for (index, dx, dy) in [
            (L::LeftEyeInner, 0.008, -0.01),
            (L::LeftEye, 0.015, -0.01),
            (L::LeftEyeOuter, 0.022, -0.01),
            (L::RightEyeInner, -0.008, -0.01),
            (L::RightEye, -0.015, -0.01),
            (L::RightEyeOuter, -0.022, -0.01),
            (L::MouthLeft, 0.012, 0.02),
            (L::MouthRight, -0.012, 0.02),
        ] {
            put(index, p.facing.mul_add(0.02, ear_x) + dx, head_y + dy, rng);
        }
        put(L::LeftEar, ear_x + 0.01, head_y + 0.005, rng);
        put(L::RightEar, ear_x - 0.01, head_y + 0.005, rng);

        put(L::LeftShoulder, s_left.0, s_left.1, rng);
        put(L::RightShoulder, s_right.0, s_right.1, rng);
        for side in [1.0_f64, -1.0] {
            let (elbow, wrist, pinky, index, thumb) = if side > 0.0 {
                (L::LeftElbow, L::LeftWrist, L::LeftPinky, L::LeftIndex, L::LeftThumb)
            } else {
                (L::RightElbow, L::RightWrist, L::RightPinky, L::RightIndex, L::RightThumb)
            };
            let x = side.mul_add(arm_half, waist_x);
            let wrist_y = waist_y + forearm;
            put(elbow, x, waist_y, rng);
            put(wrist, x, wrist_y, rng);
            put(pinky, side.mul_add(0.01, x), wrist_y + 0.03, rng);
            put(index, x, wrist_y + 0.035, rng);
            put(thumb, side.mul_add(-0.01, x), wrist_y + 0.025, rng);
        }

        put(L::LeftHip, h_left.0, h_left.1, rng);
        put(L::RightHip, h_right.0, h_right.1, rng);
        for (side, (x, y)) in [(1.0_f64, h_left), (-1.0, h_right)] {
            let (knee, ankle, heel, foot) = if side > 0.0 {
                (L::LeftKnee, L::LeftAnkle, L::LeftHeel, L::LeftFootIndex)
            } else {
                (L::RightKnee, L::RightAnkle, L::RightHeel, L::RightFootIndex)
            };
            let foot_x = side.mul_add(ankle_half, ankle_x);
            put(knee, (x + foot_x) / 2.0, (y + ankle_y) / 2.0, rng);
            put(ankle, foot_x, ankle_y, rng);
            put(heel, p.facing.mul_add(-0.015, foot_x), ankle_y + 0.02, rng);
            put(foot, p.facing.mul_add(0.04, foot_x), ankle_y + 0.03, rng);
        }

        pose
    }
}

/// Left and right points `width` apart around a center, tilted so the right
/// point sits lower by `tilt_deg`.
fn tilted_pair(cx: f64, cy: f64, width: f64, tilt_deg: f64) -> ((f64, f64), (f64, f64)) {
    let (sin, cos) = tilt_deg.to_radians().sin_cos();
    let (hx, hy) = (width / 2.0 * cos, width / 2.0 * sin);
    ((cx + hx, cy - hy), (cx - hx, cy + hy))
}

/// Canonical widths sitting well inside each shape's default region.
const fn prototype(shape: BodyShapeType) -> WidthProfile {
    match shape {
        BodyShapeType::Hourglass => WidthProfile {
            waist: 0.66,
            hip: 1.0,
        },
        BodyShapeType::InvertedTriangle => WidthProfile {
            waist: 0.72,
            hip: 0.8,
        },
        BodyShapeType::Triangle => WidthProfile {
            waist: 0.88,
            hip: 1.25,
        },
        BodyShapeType::Oval => WidthProfile {
            waist: 1.08,
            hip: 1.0,
        },
        BodyShapeType::Rectangle => WidthProfile {
            waist: 0.88,
            hip: 1.0,
        },
    }
}

fn to_fallback_failed(err: AnalysisError) -> AnalysisError {
    AnalysisError::fallback_failed(err.to_string())
}
