//! Pose landmark types and the fixed 33-point body topology.

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::error::TypesError;

/// Number of landmarks produced by a full-body pose detection.
pub const LANDMARK_COUNT: usize = 33;

/// A single detected body keypoint.
///
/// Coordinates are normalized to the image: `x` and `y` in `[0, 1]` with
/// `y` growing downward, `z` a relative depth (smaller is closer to the
/// camera).
///
/// # Example
///
/// ```
/// use body_types::Landmark;
///
/// let nose = Landmark::new(0.5, 0.1, 0.0, 0.98);
/// assert!(nose.is_visible(0.5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// X coordinate (normalized `[0, 1]`).
    pub x: f64,
    /// Y coordinate (normalized `[0, 1]`, downward).
    pub y: f64,
    /// Relative depth.
    pub z: f64,
    /// Visibility score `[0, 1]`.
    pub visibility: f64,
}

impl Landmark {
    /// Creates a new landmark.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64, visibility: f64) -> Self {
        Self {
            x,
            y,
            z,
            visibility,
        }
    }

    /// Creates an undetected landmark at the origin.
    #[must_use]
    pub const fn invisible() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Returns `true` if visibility is at or above the threshold.
    #[must_use]
    pub fn is_visible(&self, threshold: f64) -> bool {
        self.visibility >= threshold
    }

    /// Returns `true` if all coordinates and the visibility are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.z.is_finite()
            && self.visibility.is_finite()
    }

    /// Planar (x, y) distance to another landmark.
    #[must_use]
    pub fn planar_distance(&self, other: &Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Midpoint between two landmarks; visibility is the lower of the two.
    #[must_use]
    pub fn midpoint(&self, other: &Self) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
            z: (self.z + other.z) / 2.0,
            visibility: self.visibility.min(other.visibility),
        }
    }

    /// Returns the landmark with visibility clamped to `[0, 1]`.
    ///
    /// `NaN` visibility counts as undetected and becomes 0.
    #[must_use]
    pub fn with_clamped_visibility(self) -> Self {
        let visibility = if self.visibility.is_nan() {
            0.0
        } else {
            self.visibility.clamp(0.0, 1.0)
        };
        Self { visibility, ..self }
    }
}

impl Default for Landmark {
    fn default() -> Self {
        Self::invisible()
    }
}

/// Semantic index into a 33-point pose detection.
///
/// Discriminants are the array positions of the detector output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(usize)]
#[allow(missing_docs)]
pub enum LandmarkIndex {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl LandmarkIndex {
    /// All indices in detector order.
    pub const ALL: [Self; LANDMARK_COUNT] = [
        Self::Nose,
        Self::LeftEyeInner,
        Self::LeftEye,
        Self::LeftEyeOuter,
        Self::RightEyeInner,
        Self::RightEye,
        Self::RightEyeOuter,
        Self::LeftEar,
        Self::RightEar,
        Self::MouthLeft,
        Self::MouthRight,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftPinky,
        Self::RightPinky,
        Self::LeftIndex,
        Self::RightIndex,
        Self::LeftThumb,
        Self::RightThumb,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
        Self::LeftHeel,
        Self::RightHeel,
        Self::LeftFootIndex,
        Self::RightFootIndex,
    ];

    /// Limb and torso joints used for body measurements.
    pub const CORE: [Self; 12] = [
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
    ];

    /// Array position of this landmark.
    #[must_use]
    pub const fn position(self) -> usize {
        self as usize
    }
}

/// Exactly 33 landmarks, addressable by [`LandmarkIndex`].
///
/// # Example
///
/// ```
/// use body_types::{Landmark, LandmarkIndex, PoseLandmarks};
///
/// let mut pose = PoseLandmarks::default();
/// pose.set(LandmarkIndex::LeftShoulder, Landmark::new(0.4, 0.3, 0.0, 0.9));
/// assert!((pose[LandmarkIndex::LeftShoulder].x - 0.4).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Landmark>", into = "Vec<Landmark>")]
pub struct PoseLandmarks([Landmark; LANDMARK_COUNT]);

impl PoseLandmarks {
    /// Wraps a full landmark array.
    #[must_use]
    pub const fn new(landmarks: [Landmark; LANDMARK_COUNT]) -> Self {
        Self(landmarks)
    }

    /// Replaces a single landmark.
    pub fn set(&mut self, index: LandmarkIndex, landmark: Landmark) {
        self.0[index.position()] = landmark;
    }

    /// Borrows the underlying array.
    #[must_use]
    pub const fn as_array(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.0
    }

    /// Iterates landmarks in detector order.
    pub fn iter(&self) -> impl Iterator<Item = &Landmark> {
        self.0.iter()
    }

    /// Midpoint of two landmarks.
    #[must_use]
    pub fn midpoint(&self, a: LandmarkIndex, b: LandmarkIndex) -> Landmark {
        self[a].midpoint(&self[b])
    }

    /// Mean visibility of all landmarks.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_visibility(&self) -> f64 {
        self.0.iter().map(|l| l.visibility).sum::<f64>() / LANDMARK_COUNT as f64
    }

    /// Mean visibility of the given subset.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_visibility_of(&self, indices: &[LandmarkIndex]) -> f64 {
        if indices.is_empty() {
            return 0.0;
        }
        indices.iter().map(|&i| self[i].visibility).sum::<f64>() / indices.len() as f64
    }
}

impl Default for PoseLandmarks {
    fn default() -> Self {
        Self([Landmark::invisible(); LANDMARK_COUNT])
    }
}

impl Index<LandmarkIndex> for PoseLandmarks {
    type Output = Landmark;

    fn index(&self, index: LandmarkIndex) -> &Self::Output {
        &self.0[index.position()]
    }
}

impl TryFrom<Vec<Landmark>> for PoseLandmarks {
    type Error = TypesError;

    fn try_from(landmarks: Vec<Landmark>) -> Result<Self, Self::Error> {
        let actual = landmarks.len();
        let array: [Landmark; LANDMARK_COUNT] = landmarks
            .try_into()
            .map_err(|_| TypesError::landmark_count(actual))?;
        Ok(Self(array))
    }
}

impl From<PoseLandmarks> for Vec<Landmark> {
    fn from(pose: PoseLandmarks) -> Self {
        pose.0.to_vec()
    }
}

/// Unchecked output of an external pose detector.
///
/// The landmark count and score ranges are not guaranteed; see
/// [`DetectionResult`] for the validated form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDetection {
    /// Landmarks as reported by the detector.
    pub landmarks: Vec<Landmark>,
    /// Detector-reported overall visibility.
    pub overall_visibility: f64,
    /// Detector confidence.
    pub confidence: f64,
}

impl RawDetection {
    /// Creates a raw detection, deriving overall visibility from the landmarks.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(landmarks: Vec<Landmark>, confidence: f64) -> Self {
        let overall_visibility = if landmarks.is_empty() {
            0.0
        } else {
            landmarks.iter().map(|l| l.visibility).sum::<f64>() / landmarks.len() as f64
        };
        Self {
            landmarks,
            overall_visibility,
            confidence,
        }
    }
}

/// A validated pose detection with exactly 33 landmarks.
///
/// # Example
///
/// ```
/// use body_types::{DetectionResult, PoseLandmarks};
///
/// let detection = DetectionResult::new(PoseLandmarks::default(), 0.9);
/// assert_eq!(detection.landmarks.as_array().len(), 33);
/// assert!(detection.overall_visibility.abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// The 33 landmarks.
    pub landmarks: PoseLandmarks,
    /// Mean landmark visibility `[0, 1]`.
    pub overall_visibility: f64,
    /// Detection confidence `[0, 1]`.
    pub confidence: f64,
}

impl DetectionResult {
    /// Creates a detection, deriving overall visibility from the landmarks.
    #[must_use]
    pub fn new(landmarks: PoseLandmarks, confidence: f64) -> Self {
        let overall_visibility = landmarks.mean_visibility();
        Self {
            landmarks,
            overall_visibility,
            confidence,
        }
    }
}
