//! Body shape classification and posture analysis from pose landmarks.
//!
//! This crate turns 33 detected body keypoints into a complete analysis:
//!
//! - **Validation** of detector output and measurement confidence
//! - **Ratios** of shoulder, waist and hip widths and body segment lengths,
//!   optionally calibrated to a real height
//! - **Shape classification** into one of five categories by ordered rules
//! - **Posture analysis** with severity-graded issues and exercises
//! - **Styling recommendations** per shape, with posture caveats
//! - **Fallback generation** of self-consistent synthetic results when the
//!   detector is unavailable, slow or untrustworthy
//!
//! # Layer 0
//!
//! The only suspending operation is the detector call, bounded with
//! `tokio::time::timeout`. Everything else is pure and synchronous.
//!
//! # Quick Start
//!
//! ## Analyzing an Image
//!
//! Implement [`PoseDetector`] for your model, then run [`BodyAnalyzer::analyze`]:
//!
//! ```
//! use body_analysis::{AnalysisOptions, AnalysisParams, BodyAnalyzer, FixedDetector};
//! use body_types::{Landmark, RawDetection};
//!
//! # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
//! // Collapsed landmarks cannot be measured, so the analyzer falls back.
//! let detector = FixedDetector::new(RawDetection::new(vec![Landmark::default(); 33], 0.9));
//! let analyzer = BodyAnalyzer::new(detector, AnalysisParams::default()).unwrap();
//!
//! let options = AnalysisOptions::new().with_height_cm(170.0).with_weight_kg(65.0);
//! let result = analyzer.analyze(b"jpeg bytes", &options).await.unwrap();
//! assert!(result.used_fallback());
//! assert!(result.posture_analysis.is_some());
//! # });
//! ```
//!
//! ## Classifying Ratios Directly
//!
//! ```
//! use body_analysis::{ShapeThresholds, classify};
//! use body_types::{BodyMeasurements, BodyRatios, BodyShapeType, Calibration};
//!
//! let m = BodyMeasurements {
//!     shoulder_width: 40.0,
//!     waist_width: 28.0,
//!     hip_width: 40.0,
//!     upper_body_length: 50.0,
//!     lower_body_length: 80.0,
//!     arm_length: 60.0,
//!     leg_length: 80.0,
//! };
//! let ratios = BodyRatios::from_measurements(m, Calibration::Normalized, 1e-9).unwrap();
//! assert_eq!(
//!     classify(&ratios, &ShapeThresholds::default(), 1.0).shape,
//!     BodyShapeType::Hourglass
//! );
//! ```
//!
//! # Logging
//!
//! Emits `tracing` events; install a subscriber in the host to see them.

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are too noisy for numerical code
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]

mod bmi;
mod classify;
mod detector;
mod error;
mod mock;
mod params;
mod pipeline;
mod posture;
mod ratios;
mod recommend;
mod result;
mod validate;

pub use bmi::compute_bmi;
pub use classify::{ShapeClassification, classify};
pub use detector::{FixedDetector, NoDetector, PoseDetector};
pub use error::{AnalysisError, Result};
pub use mock::MockGenerator;
pub use params::{AnalysisOptions, AnalysisParams, PostureThresholds, ShapeThresholds, WaistModel};
pub use pipeline::{BodyAnalyzer, PipelineStage};
pub use posture::analyze_posture;
pub use ratios::{calibration_scale, compute_ratios, measure};
pub use recommend::{StylingRecommendations, compose_recommendations};
pub use result::{AnalysisResult, FallbackReason, Provenance};
pub use validate::{ValidatedDetection, validate_detection};
