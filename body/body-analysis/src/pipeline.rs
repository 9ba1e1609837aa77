//! Analysis orchestration: detection, real path, fallback.

use body_types::RawDetection;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::classify::classify;
use crate::detector::{NoDetector, PoseDetector};
use crate::error::{AnalysisError, Result};
use crate::mock::MockGenerator;
use crate::params::{AnalysisOptions, AnalysisParams};
use crate::ratios::compute_ratios;
use crate::result::{AnalysisResult, Assessment, FallbackReason, Provenance};
use crate::validate::validate_detection;

/// Stages an analysis passes through.
///
/// The real path runs `Idle → DetectingLandmarks → Validating → Computing →
/// Classifying → AdvisingPosture → Composing → Done`; any failure, or an
/// explicit mock request, jumps to `FallbackGenerating → Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum PipelineStage {
    /// Request accepted.
    Idle,
    /// Awaiting the external detector.
    DetectingLandmarks,
    /// Checking landmark count, coordinates and confidence.
    Validating,
    /// Measuring widths, lengths and ratios.
    Computing,
    /// Assigning the body shape.
    Classifying,
    /// Analyzing posture.
    AdvisingPosture,
    /// Assembling recommendations and the final result.
    Composing,
    /// Synthesizing a result.
    FallbackGenerating,
    /// Result complete.
    Done,
}

/// Runs body analyses against a pose detector.
///
/// The analyzer holds no per-request state; one instance can serve any
/// number of concurrent analyses.
///
/// # Example
///
/// ```
/// use body_analysis::{AnalysisOptions, AnalysisParams, BodyAnalyzer};
///
/// # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
/// let analyzer = BodyAnalyzer::without_detector(AnalysisParams::new().with_mock_seed(1)).unwrap();
/// let result = analyzer.analyze(&[], &AnalysisOptions::new()).await.unwrap();
/// assert!(result.used_fallback());
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct BodyAnalyzer<D = NoDetector> {
    detector: D,
    params: AnalysisParams,
}

impl BodyAnalyzer<NoDetector> {
    /// Creates an analyzer that always answers with fallback results.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidConfig`] if `params` fail validation.
    pub fn without_detector(params: AnalysisParams) -> Result<Self> {
        Self::new(NoDetector, params)
    }
}

impl<D: PoseDetector> BodyAnalyzer<D> {
    /// Creates an analyzer.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidConfig`] if `params` fail validation.
    pub fn new(detector: D, params: AnalysisParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { detector, params })
    }

    /// The parameters in use.
    #[must_use]
    pub const fn params(&self) -> &AnalysisParams {
        &self.params
    }

    /// Analyzes one image.
    ///
    /// The detector call is bounded by the configured timeout. The detector
    /// is never retried. Every failure on the real path, including a
    /// timeout, produces a complete fallback result instead of an error.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::FallbackFailed`] only if the fallback
    /// generator itself cannot produce a result.
    pub async fn analyze(
        &self,
        image: &D::Image,
        options: &AnalysisOptions,
    ) -> Result<AnalysisResult> {
        info!(
            force_mock = options.force_mock,
            calibrated = options.height_cm.is_some(),
            "Starting body analysis"
        );
        let mut stages = vec![PipelineStage::Idle];

        if options.force_mock {
            return self.fallback(options, FallbackReason::Requested, stages);
        }

        enter(&mut stages, PipelineStage::DetectingLandmarks);
        let timeout = self.params.detector_timeout;
        let detected = tokio::time::timeout(timeout, self.detector.detect(image))
            .await
            .unwrap_or_else(|_elapsed| Err(AnalysisError::DetectorTimeout { timeout }));

        match detected {
            Ok(raw) => self.finish_detection(raw, options, stages),
            Err(err) => self.recover(&err, options, stages),
        }
    }

    /// Analyzes landmarks that were already detected.
    ///
    /// Same as [`analyze`](Self::analyze) minus the detector call.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::FallbackFailed`] only if the fallback
    /// generator itself cannot produce a result.
    pub fn analyze_detection(
        &self,
        raw: RawDetection,
        options: &AnalysisOptions,
    ) -> Result<AnalysisResult> {
        let stages = vec![PipelineStage::Idle];
        if options.force_mock {
            return self.fallback(options, FallbackReason::Requested, stages);
        }
        self.finish_detection(raw, options, stages)
    }

    fn finish_detection(
        &self,
        raw: RawDetection,
        options: &AnalysisOptions,
        mut stages: Vec<PipelineStage>,
    ) -> Result<AnalysisResult> {
        match self.measure(raw, options, &mut stages) {
            Ok((assessment, degraded)) => {
                let result = assessment.finish(
                    Provenance::Detected { degraded },
                    options,
                    &self.params,
                    stages,
                    &mut rand::thread_rng(),
                );
                info!(
                    shape = %result.body_shape,
                    confidence = format!("{:.3}", result.shape_confidence),
                    degraded,
                    "Body analysis complete"
                );
                Ok(result)
            }
            Err(err) => self.recover(&err, options, stages),
        }
    }

    /// Real path after detection: validate, measure, classify.
    fn measure(
        &self,
        raw: RawDetection,
        options: &AnalysisOptions,
        stages: &mut Vec<PipelineStage>,
    ) -> Result<(Assessment, bool)> {
        enter(stages, PipelineStage::Validating);
        let validated = validate_detection(raw, &self.params, options.allow_low_confidence)?;

        enter(stages, PipelineStage::Computing);
        let ratios = compute_ratios(
            &validated.detection.landmarks,
            options.height_cm,
            &self.params,
        )?;

        enter(stages, PipelineStage::Classifying);
        let classification = classify(
            &ratios,
            &self.params.shape,
            validated.measurement_confidence,
        );

        Ok((
            Assessment {
                detection: validated.detection,
                ratios,
                classification,
                measurement_confidence: validated.measurement_confidence,
            },
            validated.degraded,
        ))
    }

    fn recover(
        &self,
        err: &AnalysisError,
        options: &AnalysisOptions,
        stages: Vec<PipelineStage>,
    ) -> Result<AnalysisResult> {
        let reason = FallbackReason::from(err);
        warn!(%err, ?reason, "Real analysis failed, generating fallback");
        self.fallback(options, reason, stages)
    }

    fn fallback(
        &self,
        options: &AnalysisOptions,
        reason: FallbackReason,
        mut stages: Vec<PipelineStage>,
    ) -> Result<AnalysisResult> {
        enter(&mut stages, PipelineStage::FallbackGenerating);
        let mut generator = match self.params.mock_seed {
            Some(seed) => MockGenerator::from_seed(seed),
            None => MockGenerator::from_entropy(),
        };
        let result = generator.generate_traced(options, &self.params, reason, stages)?;
        info!(
            shape = %result.body_shape,
            ?reason,
            "Body analysis complete with fallback"
        );
        Ok(result)
    }
}

/// Records a stage transition.
pub(crate) fn enter(stages: &mut Vec<PipelineStage>, stage: PipelineStage) {
    debug!(?stage, "Pipeline stage");
    stages.push(stage);
}
