//! Styling recommendations keyed by body shape.

use body_types::{BodyShapeType, PostureAnalysis, PostureIssueType};
use serde::Serialize;

/// Styling guidance for one analysis.
///
/// The base fields come straight from the shape's reference record and are
/// identical for every person of that shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StylingRecommendations {
    /// Shape the guidance applies to.
    pub body_shape: BodyShapeType,
    /// Typical proportions of the shape.
    pub characteristics: &'static [&'static str],
    /// Clothing choices that suit the shape.
    pub styling_tips: &'static [&'static str],
    /// Clothing choices to avoid.
    pub avoid: &'static [&'static str],
    /// One caveat per detected posture issue type, in detection order.
    pub posture_caveats: Vec<&'static str>,
}

/// Composes styling guidance for a shape, appending posture caveats.
///
/// Posture never changes the base recommendation.
///
/// # Example
///
/// ```
/// use body_analysis::compose_recommendations;
/// use body_types::BodyShapeType;
///
/// let recs = compose_recommendations(BodyShapeType::Triangle, None);
/// assert_eq!(recs.styling_tips, BodyShapeType::Triangle.info().styling_tips);
/// assert!(recs.posture_caveats.is_empty());
/// ```
#[must_use]
pub fn compose_recommendations(
    shape: BodyShapeType,
    posture: Option<&PostureAnalysis>,
) -> StylingRecommendations {
    let info = shape.info();

    let mut seen: Vec<PostureIssueType> = Vec::new();
    let posture_caveats = posture
        .map(|p| p.issues.as_slice())
        .unwrap_or_default()
        .iter()
        .filter_map(|issue| {
            if seen.contains(&issue.issue_type) {
                None
            } else {
                seen.push(issue.issue_type);
                Some(issue.issue_type.styling_caveat())
            }
        })
        .collect();

    StylingRecommendations {
        body_shape: shape,
        characteristics: info.characteristics,
        styling_tips: info.styling_tips,
        avoid: info.avoid,
        posture_caveats,
    }
}
