//! Posture metrics, discrete posture issues and their remedial exercises.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Discrete postural deviations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PostureIssueType {
    /// Ear sits ahead of the shoulder line.
    ForwardHead,
    /// Shoulder line sits ahead of the hip line.
    RoundedShoulders,
    /// Left and right shoulder at different heights.
    UnevenShoulders,
    /// Left and right hip at different heights.
    UnevenHips,
    /// Lateral lean or bend in the shoulder-hip-ankle chain.
    SpinalMisalignment,
    /// Pelvis pushed ahead of the shoulder-ankle line.
    Swayback,
}

impl PostureIssueType {
    /// All issue types.
    pub const ALL: [Self; 6] = [
        Self::ForwardHead,
        Self::RoundedShoulders,
        Self::UnevenShoulders,
        Self::UnevenHips,
        Self::SpinalMisalignment,
        Self::Swayback,
    ];

    /// Kebab-case identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ForwardHead => "forward-head",
            Self::RoundedShoulders => "rounded-shoulders",
            Self::UnevenShoulders => "uneven-shoulders",
            Self::UnevenHips => "uneven-hips",
            Self::SpinalMisalignment => "spinal-misalignment",
            Self::Swayback => "swayback",
        }
    }

    /// Fixed remedial exercise list.
    #[must_use]
    pub const fn exercises(self) -> &'static [&'static str] {
        match self {
            Self::ForwardHead => &[
                "Chin tucks: 3 sets of 10, holding 5 seconds",
                "Wall angels: 2 sets of 10",
                "Upper trapezius stretch: 30 seconds per side",
            ],
            Self::RoundedShoulders => &[
                "Doorway pec stretch: 3 holds of 30 seconds",
                "Band pull-aparts: 3 sets of 15",
                "Prone Y-T-W raises: 2 sets of 8 each",
            ],
            Self::UnevenShoulders => &[
                "Single-arm farmer carry: 3 walks of 30 meters per side",
                "Side-lying thoracic rotation: 10 per side",
                "Levator scapulae stretch on the high side: 30 seconds",
            ],
            Self::UnevenHips => &[
                "Side plank: 3 holds of 20 seconds per side",
                "Clamshells: 3 sets of 15 per side",
                "Standing hip hitch: 2 sets of 12 per side",
            ],
            Self::SpinalMisalignment => &[
                "Cat-cow: 2 sets of 10",
                "Bird dog: 3 sets of 10 per side",
                "Standing side bend stretch: 30 seconds per side",
            ],
            Self::Swayback => &[
                "Glute bridges: 3 sets of 12",
                "Dead bug: 3 sets of 10 per side",
                "Half-kneeling hip flexor stretch: 30 seconds per side",
            ],
        }
    }

    /// Short human-readable summary of the deviation.
    #[must_use]
    pub const fn summary(self) -> &'static str {
        match self {
            Self::ForwardHead => "Head is carried forward of the shoulders",
            Self::RoundedShoulders => "Shoulders are rolled forward of the hips",
            Self::UnevenShoulders => "Shoulders are not level",
            Self::UnevenHips => "Hips are not level",
            Self::SpinalMisalignment => "Trunk leans away from vertical",
            Self::Swayback => "Pelvis is pushed forward of the shoulders and ankles",
        }
    }

    /// Styling caveat appended to recommendations when this issue is present.
    #[must_use]
    pub const fn styling_caveat(self) -> &'static str {
        match self {
            Self::ForwardHead => {
                "Open or V necklines lengthen the neck line; avoid high, tight collars."
            }
            Self::RoundedShoulders => {
                "Structured shoulders and well-fitted blazers square the shoulder line."
            }
            Self::UnevenShoulders => {
                "Asymmetric necklines and one-shoulder bag straps can mask or amplify the \
                 tilt; check the mirror."
            }
            Self::UnevenHips => {
                "Mid-rise, straight-cut bottoms hide hip height differences better than \
                 low-rise fits."
            }
            Self::SpinalMisalignment => {
                "Vertical seams and centered details make any lateral lean more visible; \
                 prefer soft drape."
            }
            Self::Swayback => {
                "Tops that fall just past the hip smooth the lower back curve."
            }
        }
    }
}

impl fmt::Display for PostureIssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Head carriage relative to the shoulder line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadPosition {
    /// Ear ahead of the shoulder.
    Forward,
    /// Ear over the shoulder.
    #[default]
    Neutral,
    /// Ear behind the shoulder.
    Backward,
}

/// A detected postural deviation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostureIssue {
    /// Kind of deviation.
    #[serde(rename = "type")]
    pub issue_type: PostureIssueType,
    /// Severity from 1 (mild) to 5 (severe).
    pub severity: u8,
    /// Description including the measured magnitude.
    pub description: String,
    /// Remedial exercises.
    pub exercises: &'static [&'static str],
}

impl PostureIssue {
    /// Lowest severity.
    pub const MIN_SEVERITY: u8 = 1;
    /// Highest severity.
    pub const MAX_SEVERITY: u8 = 5;

    /// Creates an issue with the fixed exercise list for its type.
    ///
    /// Severity is clamped to `[1, 5]`.
    #[must_use]
    pub fn new(issue_type: PostureIssueType, severity: u8, description: impl Into<String>) -> Self {
        Self {
            issue_type,
            severity: severity.clamp(Self::MIN_SEVERITY, Self::MAX_SEVERITY),
            description: description.into(),
            exercises: issue_type.exercises(),
        }
    }
}

/// Posture metrics and every issue they triggered.
///
/// # Example
///
/// ```
/// use body_types::{HeadPosition, PostureAnalysis};
///
/// let analysis = PostureAnalysis::default();
/// assert_eq!(analysis.head_position, HeadPosition::Neutral);
/// assert!(analysis.is_clear());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostureAnalysis {
    /// Shoulder line angle from horizontal, degrees. Positive when the
    /// right shoulder sits lower in the image.
    pub shoulder_tilt: f64,
    /// Hip line angle from horizontal, degrees. Same sign convention.
    pub hip_tilt: f64,
    /// Alignment score, 100 for a perfectly vertical chain.
    pub spine_alignment: f64,
    /// Head carriage.
    pub head_position: HeadPosition,
    /// All detected issues, unranked.
    pub issues: Vec<PostureIssue>,
}

impl PostureAnalysis {
    /// Returns `true` if no issue was detected.
    #[must_use]
    pub fn is_clear(&self) -> bool {
        self.issues.is_empty()
    }

    /// Returns `true` if an issue of this type was detected.
    #[must_use]
    pub fn has_issue(&self, issue_type: PostureIssueType) -> bool {
        self.issues.iter().any(|i| i.issue_type == issue_type)
    }
}

impl Default for PostureAnalysis {
    fn default() -> Self {
        Self {
            shoulder_tilt: 0.0,
            hip_tilt: 0.0,
            spine_alignment: 100.0,
            head_position: HeadPosition::Neutral,
            issues: Vec::new(),
        }
    }
}
