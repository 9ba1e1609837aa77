//! Result types for body analysis.

use body_types::{Bmi, BodyRatios, BodyShapeInfo, BodyShapeType, DetectionResult, PostureAnalysis};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;

use crate::bmi::compute_bmi;
use crate::classify::ShapeClassification;
use crate::error::AnalysisError;
use crate::params::{AnalysisOptions, AnalysisParams};
use crate::pipeline::{PipelineStage, enter};
use crate::posture::analyze_posture;
use crate::recommend::{StylingRecommendations, compose_recommendations};

/// Why the fallback generator produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// Caller asked for a synthetic result.
    Requested,
    /// No detector configured, or it reported a failure.
    DetectorUnavailable,
    /// Detector exceeded its time budget.
    DetectorTimeout,
    /// Detector returned the wrong number of landmarks.
    InsufficientLandmarks,
    /// Detection confidence below minimum without override.
    LowConfidence,
    /// A landmark coordinate was not finite.
    InvalidLandmark,
    /// Ratio math hit a zero denominator.
    DegenerateGeometry,
    /// Any other real-path failure.
    Unexpected,
}

impl From<&AnalysisError> for FallbackReason {
    fn from(err: &AnalysisError) -> Self {
        match err {
            AnalysisError::DetectorUnavailable(_) => Self::DetectorUnavailable,
            AnalysisError::DetectorTimeout { .. } => Self::DetectorTimeout,
            AnalysisError::InsufficientLandmarks { .. } => Self::InsufficientLandmarks,
            AnalysisError::LowConfidence { .. } => Self::LowConfidence,
            AnalysisError::InvalidLandmark { .. } => Self::InvalidLandmark,
            AnalysisError::DegenerateGeometry { .. } => Self::DegenerateGeometry,
            AnalysisError::InvalidCalibration { .. }
            | AnalysisError::InvalidConfig(_)
            | AnalysisError::FallbackFailed(_) => Self::Unexpected,
        }
    }
}

/// Where the measurements of a result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Provenance {
    /// Measured from real detector output.
    Detected {
        /// Accepted below the minimum confidence under override.
        degraded: bool,
    },
    /// Synthesized by the fallback generator.
    Fallback {
        /// Why the real path was abandoned.
        reason: FallbackReason,
    },
}

impl Provenance {
    /// Returns `true` for synthetic results.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// Complete, immutable outcome of one analysis.
///
/// Real and synthetic results share every field; [`Provenance`] tells them
/// apart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    /// Random 128-bit hex identifier.
    pub id: String,

    /// Real or synthetic origin.
    pub provenance: Provenance,

    /// The validated (or synthesized) detection.
    pub pose_detection: DetectionResult,

    /// Widths, lengths and ratios.
    pub body_ratios: BodyRatios,

    /// Classified shape.
    pub body_shape: BodyShapeType,

    /// Reference record for `body_shape`.
    pub body_shape_info: &'static BodyShapeInfo,

    /// Classifier confidence, never above `measurement_confidence`.
    pub shape_confidence: f64,

    /// Posture metrics, when requested.
    pub posture_analysis: Option<PostureAnalysis>,

    /// Styling guidance, when requested.
    pub styling_recommendations: Option<StylingRecommendations>,

    /// BMI, when real height and weight were supplied.
    pub bmi: Option<Bmi>,

    /// Trust in the measurements `[0, 1]`.
    pub measurement_confidence: f64,

    /// Completion time.
    pub analyzed_at: DateTime<Utc>,

    /// Pipeline stages passed through, ending in [`PipelineStage::Done`].
    pub stages: Vec<PipelineStage>,
}

impl AnalysisResult {
    /// Returns `true` if the result was synthesized.
    #[must_use]
    pub const fn used_fallback(&self) -> bool {
        self.provenance.is_fallback()
    }
}

/// Measured (or synthesized) core that both paths finish from.
pub(crate) struct Assessment {
    pub detection: DetectionResult,
    pub ratios: BodyRatios,
    pub classification: ShapeClassification,
    pub measurement_confidence: f64,
}

impl Assessment {
    /// Finishes a result: optional posture and styling, BMI, id and timestamp.
    ///
    /// Posture and composing stages are only traced for detected results;
    /// a fallback result goes straight from generation to done.
    pub(crate) fn finish<R: Rng>(
        self,
        provenance: Provenance,
        options: &AnalysisOptions,
        params: &AnalysisParams,
        mut stages: Vec<PipelineStage>,
        rng: &mut R,
    ) -> AnalysisResult {
        let traced = !provenance.is_fallback();

        let posture_analysis = options.include_posture.then(|| {
            if traced {
                enter(&mut stages, PipelineStage::AdvisingPosture);
            }
            analyze_posture(&self.detection.landmarks, &params.posture)
        });

        if traced {
            enter(&mut stages, PipelineStage::Composing);
        }
        let shape = self.classification.shape;
        let styling_recommendations = options
            .include_styling
            .then(|| compose_recommendations(shape, posture_analysis.as_ref()));
        let bmi = compute_bmi(options.height_cm, options.weight_kg, params);

        enter(&mut stages, PipelineStage::Done);

        AnalysisResult {
            id: format!("{:032x}", rng.r#gen::<u128>()),
            provenance,
            pose_detection: self.detection,
            body_ratios: self.ratios,
            body_shape: shape,
            body_shape_info: shape.info(),
            shape_confidence: self.classification.confidence,
            posture_analysis,
            styling_recommendations,
            bmi,
            measurement_confidence: self.measurement_confidence,
            analyzed_at: Utc::now(),
            stages,
        }
    }
}
