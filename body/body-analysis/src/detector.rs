//! Pose detector seam.

use std::future::Future;

use body_types::RawDetection;

use crate::error::{AnalysisError, Result};

/// External landmark detector.
///
/// Implementations wrap whatever model or service produces landmarks. The
/// analyzer bounds every call with its configured timeout and drops the
/// future when the budget runs out, so implementations must not rely on
/// running to completion.
///
/// Failures should be reported as [`AnalysisError::DetectorUnavailable`];
/// the analyzer answers any error with a fallback result.
pub trait PoseDetector: Send + Sync {
    /// Input the detector consumes, e.g. encoded image bytes.
    type Image: ?Sized + Sync;

    /// Detects landmarks in one image.
    fn detect(&self, image: &Self::Image) -> impl Future<Output = Result<RawDetection>> + Send;
}

/// Detector placeholder for deployments without a pose model.
///
/// Every call fails, so every analysis takes the fallback path.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDetector;

impl PoseDetector for NoDetector {
    type Image = [u8];

    async fn detect(&self, _image: &[u8]) -> Result<RawDetection> {
        Err(AnalysisError::detector_unavailable("no pose detector configured"))
    }
}

/// Detector that replays one fixed detection.
///
/// Useful when landmarks were produced upstream and only need analyzing.
#[derive(Debug, Clone)]
pub struct FixedDetector {
    detection: RawDetection,
}

impl FixedDetector {
    /// Creates a detector returning `detection` for every image.
    #[must_use]
    pub const fn new(detection: RawDetection) -> Self {
        Self { detection }
    }
}

impl PoseDetector for FixedDetector {
    type Image = [u8];

    async fn detect(&self, _image: &[u8]) -> Result<RawDetection> {
        Ok(self.detection.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use body_types::Landmark;

    #[tokio::test]
    async fn test_no_detector_is_unavailable() {
        let err = NoDetector.detect(&[]).await.unwrap_err();
        assert!(matches!(err, AnalysisError::DetectorUnavailable(_)));
    }

    #[tokio::test]
    async fn test_fixed_detector_replays() {
        let raw = RawDetection::new(vec![Landmark::new(0.1, 0.2, 0.0, 0.9); 33], 0.8);
        let detector = FixedDetector::new(raw.clone());
        assert_eq!(detector.detect(b"first").await.unwrap(), raw);
        assert_eq!(detector.detect(b"second").await.unwrap(), raw);
    }
}
