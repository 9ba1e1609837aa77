//! Body proportion and posture data types.
//!
//! This crate provides the data model shared by the analysis pipeline:
//!
//! # Detection Types
//!
//! - [`Landmark`] - Normalized keypoint with visibility
//! - [`LandmarkIndex`] - Semantic index into the fixed 33-point topology
//! - [`PoseLandmarks`] - Exactly 33 landmarks, indexed by [`LandmarkIndex`]
//! - [`RawDetection`] - Unchecked detector output
//! - [`DetectionResult`] - Validated detection
//!
//! # Measurement Types
//!
//! - [`BodyMeasurements`] - Widths and lengths
//! - [`BodyRatios`] - Widths, lengths and derived ratios
//! - [`Calibration`] - Normalized or centimeter units
//! - [`Bmi`] / [`BmiCategory`] - Body mass index
//!
//! # Classification Types
//!
//! - [`BodyShapeType`] - The five shape categories
//! - [`BodyShapeInfo`] - Static reference record per shape ([`SHAPE_INFO`])
//! - [`PostureIssueType`] / [`PostureIssue`] / [`PostureAnalysis`] - Posture
//!
//! # Layer 0 Crate
//!
//! No async runtime, no randomness, no I/O. Static reference tables are
//! plain `static` data and safe to share across threads.
//!
//! # Example
//!
//! ```
//! use body_types::{BodyShapeType, LandmarkIndex, PoseLandmarks};
//!
//! let pose = PoseLandmarks::default();
//! assert_eq!(pose.as_array().len(), 33);
//! assert_eq!(LandmarkIndex::LeftHip.position(), 23);
//! assert_eq!(BodyShapeType::Hourglass.info().label, "Hourglass");
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod bmi;
mod error;
mod landmark;
mod posture;
mod ratios;
mod shape;

pub use bmi::{Bmi, BmiCategory};
pub use error::TypesError;
pub use landmark::{
    DetectionResult, LANDMARK_COUNT, Landmark, LandmarkIndex, PoseLandmarks, RawDetection,
};
pub use posture::{HeadPosition, PostureAnalysis, PostureIssue, PostureIssueType};
pub use ratios::{BodyMeasurements, BodyRatios, Calibration};
pub use shape::{BodyShapeInfo, BodyShapeType, SHAPE_INFO};
