//! Posture metrics and issue detection.
//!
//! Image coordinates grow rightward in x and downward in y. Sagittal offsets
//! (head, shoulders, pelvis) are only measured in a profile view, where the
//! nose sits outside the span of the ears. They are signed by the facing
//! direction and normalized by torso length so they do not depend on
//! distance to the camera. In a frontal view horizontal offsets are lateral,
//! so the head stays neutral and no sagittal issue is raised.

use body_types::{
    HeadPosition, Landmark, LandmarkIndex as L, PoseLandmarks, PostureAnalysis, PostureIssue,
    PostureIssueType,
};
use tracing::debug;

use crate::params::PostureThresholds;

/// Analyzes posture from validated landmarks.
///
/// Every issue whose magnitude exceeds its threshold is returned; issues are
/// not ranked or filtered.
///
/// # Example
///
/// ```
/// use body_analysis::{PostureThresholds, analyze_posture};
/// use body_types::PoseLandmarks;
///
/// // Collapsed landmarks yield neutral metrics, never NaN.
/// let analysis = analyze_posture(&PoseLandmarks::default(), &PostureThresholds::default());
/// assert!(analysis.is_clear());
/// assert!((analysis.spine_alignment - 100.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn analyze_posture(landmarks: &PoseLandmarks, t: &PostureThresholds) -> PostureAnalysis {
    let shoulder_tilt = tilt_deg(&landmarks[L::LeftShoulder], &landmarks[L::RightShoulder]);
    let hip_tilt = tilt_deg(&landmarks[L::LeftHip], &landmarks[L::RightHip]);

    let shoulder_mid = landmarks.midpoint(L::LeftShoulder, L::RightShoulder);
    let hip_mid = landmarks.midpoint(L::LeftHip, L::RightHip);
    let ankle_mid = landmarks.midpoint(L::LeftAnkle, L::RightAnkle);
    let ear_mid = landmarks.midpoint(L::LeftEar, L::RightEar);

    let lean = lean_from_vertical_deg(&shoulder_mid, &hip_mid)
        .max(lean_from_vertical_deg(&hip_mid, &ankle_mid));
    let spine_alignment = t.spine_points_per_degree.mul_add(-lean, 100.0).clamp(0.0, 100.0);

    let facing = facing(&landmarks[L::Nose], &landmarks[L::LeftEar], &landmarks[L::RightEar]);
    let torso = shoulder_mid.planar_distance(&hip_mid);
    let sagittal = |dx: f64| match facing {
        Some(facing) if torso > f64::EPSILON => dx * facing / torso,
        _ => 0.0,
    };

    let head_offset = sagittal(ear_mid.x - shoulder_mid.x);
    let shoulder_offset = sagittal(shoulder_mid.x - hip_mid.x);
    let pelvis_offset = sagittal(hip_mid.x - line_x_at(&shoulder_mid, &ankle_mid, hip_mid.y));

    let head_position = if head_offset > t.head_dead_zone {
        HeadPosition::Forward
    } else if head_offset < -t.head_dead_zone {
        HeadPosition::Backward
    } else {
        HeadPosition::Neutral
    };

    let mut issues = Vec::new();
    let mut flag =
        |issue_type: PostureIssueType, magnitude: f64, threshold: f64, full: f64, detail: String| {
            if magnitude > threshold {
                issues.push(PostureIssue::new(
                    issue_type,
                    severity(magnitude, threshold, full),
                    format!("{} ({detail})", issue_type.summary()),
                ));
            }
        };

    flag(
        PostureIssueType::UnevenShoulders,
        shoulder_tilt.abs(),
        t.tilt_deg,
        t.tilt_full_deg,
        format!("{:.1}° tilt", shoulder_tilt.abs()),
    );
    flag(
        PostureIssueType::UnevenHips,
        hip_tilt.abs(),
        t.tilt_deg,
        t.tilt_full_deg,
        format!("{:.1}° tilt", hip_tilt.abs()),
    );
    flag(
        PostureIssueType::SpinalMisalignment,
        100.0 - spine_alignment,
        100.0 - t.spine_min_score,
        t.spine_full_deficit,
        format!("alignment score {spine_alignment:.0}/100"),
    );
    flag(
        PostureIssueType::ForwardHead,
        head_offset,
        t.head_dead_zone,
        t.head_full,
        format!("{:.0}% of torso length", head_offset * 100.0),
    );
    flag(
        PostureIssueType::RoundedShoulders,
        shoulder_offset,
        t.rounded_shoulders,
        t.rounded_shoulders_full,
        format!("{:.0}% of torso length", shoulder_offset * 100.0),
    );
    flag(
        PostureIssueType::Swayback,
        pelvis_offset,
        t.swayback,
        t.swayback_full,
        format!("{:.0}% of torso length", pelvis_offset * 100.0),
    );

    debug!(
        shoulder_tilt,
        hip_tilt,
        spine_alignment,
        head_offset,
        profile = facing.is_some(),
        issues = issues.len(),
        "Posture analyzed"
    );

    PostureAnalysis {
        shoulder_tilt,
        hip_tilt,
        spine_alignment,
        head_position,
        issues,
    }
}

/// Facing direction in a profile view: +1 toward larger x, -1 toward smaller.
///
/// `None` in a frontal view, where the nose lies within the ear span.
fn facing(nose: &Landmark, left_ear: &Landmark, right_ear: &Landmark) -> Option<f64> {
    let ear_mid = left_ear.midpoint(right_ear);
    let ahead = nose.x - ear_mid.x;
    if ahead.abs() <= (left_ear.x - right_ear.x).abs() / 2.0 {
        return None;
    }
    Some(ahead.signum())
}

/// Signed angle of the left→right segment from horizontal, degrees.
///
/// Positive when the right point sits lower in the image.
fn tilt_deg(left: &Landmark, right: &Landmark) -> f64 {
    (right.y - left.y).atan2((right.x - left.x).abs()).to_degrees()
}

/// Unsigned angle of the segment `a → b` from vertical, degrees.
fn lean_from_vertical_deg(a: &Landmark, b: &Landmark) -> f64 {
    (b.x - a.x).atan2((b.y - a.y).abs()).to_degrees().abs()
}

/// X coordinate of the line `a → b` at height `y`.
fn line_x_at(a: &Landmark, b: &Landmark, y: f64) -> f64 {
    let dy = b.y - a.y;
    if dy.abs() <= f64::EPSILON {
        return (a.x + b.x) / 2.0;
    }
    ((y - a.y) / dy).mul_add(b.x - a.x, a.x)
}

/// Maps a magnitude past its threshold onto severity 1 (at threshold)
/// through 5 (at `full` and beyond).
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn severity(magnitude: f64, threshold: f64, full: f64) -> u8 {
    let span = full - threshold;
    let t = if span > 0.0 {
        ((magnitude - threshold) / span).clamp(0.0, 1.0)
    } else {
        1.0
    };
    PostureIssue::MIN_SEVERITY + (t * 4.0).round() as u8
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::ratios::tests::figure;
    use approx::assert_relative_eq;

    fn shift(pose: &mut PoseLandmarks, indices: &[L], dx: f64, dy: f64) {
        for &i in indices {
            let l = pose[i];
            pose.set(i, Landmark::new(l.x + dx, l.y + dy, l.z, l.visibility));
        }
    }

    #[test]
    fn test_upright_figure_is_clear() {
        let a = analyze_posture(&figure(0.2, 0.16), &PostureThresholds::default());
        assert!(a.is_clear());
        assert_relative_eq!(a.shoulder_tilt, 0.0);
        assert_relative_eq!(a.hip_tilt, 0.0);
        assert_relative_eq!(a.spine_alignment, 100.0);
        assert_eq!(a.head_position, HeadPosition::Neutral);
    }

    #[test]
    fn test_uneven_shoulders() {
        let mut pose = figure(0.2, 0.16);
        // Right shoulder 0.02 lower over a 0.2 span: atan(0.1) = 5.71°.
        shift(&mut pose, &[L::RightShoulder], 0.0, 0.02);
        let a = analyze_posture(&pose, &PostureThresholds::default());
        assert_relative_eq!(a.shoulder_tilt, 0.1_f64.atan().to_degrees(), epsilon = 1e-9);
        assert!(a.shoulder_tilt > 0.0);
        let issue = a
            .issues
            .iter()
            .find(|i| i.issue_type == PostureIssueType::UnevenShoulders)
            .unwrap();
        assert_eq!(issue.severity, 2);
        assert!(!a.has_issue(PostureIssueType::UnevenHips));
    }

    #[test]
    fn test_tilt_sign_follows_lower_side() {
        let mut pose = figure(0.2, 0.16);
        shift(&mut pose, &[L::LeftHip], 0.0, 0.03);
        let a = analyze_posture(&pose, &PostureThresholds::default());
        assert!(a.hip_tilt < 0.0);
        assert!(a.has_issue(PostureIssueType::UnevenHips));
    }

    /// Turns the head into profile: ears overlap at `ear_x`, the nose is
    /// `nose_dx` ahead of them.
    fn profile(pose: &mut PoseLandmarks, ear_x: f64, nose_dx: f64) {
        for i in [L::LeftEar, L::RightEar] {
            let l = pose[i];
            pose.set(i, Landmark::new(ear_x, l.y, l.z, l.visibility));
        }
        let nose = pose[L::Nose];
        pose.set(L::Nose, Landmark::new(ear_x + nose_dx, nose.y, nose.z, nose.visibility));
    }

    fn mirrored(pose: &PoseLandmarks) -> PoseLandmarks {
        let mut out = pose.clone();
        for i in L::ALL {
            let l = pose[i];
            out.set(i, Landmark::new(1.0 - l.x, l.y, l.z, l.visibility));
        }
        out
    }

    fn issue_types(a: &PostureAnalysis) -> Vec<PostureIssueType> {
        a.issues.iter().map(|i| i.issue_type).collect()
    }

    #[test]
    fn test_facing() {
        let ear = |x: f64| Landmark::new(x, 0.1, 0.0, 1.0);
        assert_eq!(facing(&ear(0.50), &ear(0.47), &ear(0.53)), None);
        assert_eq!(facing(&ear(0.55), &ear(0.50), &ear(0.51)), Some(1.0));
        assert_eq!(facing(&ear(0.45), &ear(0.50), &ear(0.51)), Some(-1.0));
    }

    #[test]
    fn test_forward_head() {
        let mut pose = figure(0.2, 0.16);
        // Ears 0.06 ahead of the shoulders, facing right.
        profile(&mut pose, 0.56, 0.01);
        let a = analyze_posture(&pose, &PostureThresholds::default());
        assert_eq!(a.head_position, HeadPosition::Forward);
        let issue = a
            .issues
            .iter()
            .find(|i| i.issue_type == PostureIssueType::ForwardHead)
            .unwrap();
        // Offset 0.2 torso lengths: 1 + round(0.75 * 4).
        assert_eq!(issue.severity, 4);
        assert_eq!(issue.exercises, PostureIssueType::ForwardHead.exercises());
    }

    #[test]
    fn test_facing_left_mirrors_offsets() {
        let mut pose = figure(0.2, 0.16);
        profile(&mut pose, 0.44, -0.01);
        let a = analyze_posture(&pose, &PostureThresholds::default());
        assert_eq!(a.head_position, HeadPosition::Forward);
    }

    #[test]
    fn test_backward_head_is_not_an_issue() {
        let mut pose = figure(0.2, 0.16);
        profile(&mut pose, 0.47, 0.01);
        let a = analyze_posture(&pose, &PostureThresholds::default());
        assert_eq!(a.head_position, HeadPosition::Backward);
        assert!(!a.has_issue(PostureIssueType::ForwardHead));
    }

    #[test]
    fn test_forward_head_and_rounded_shoulders_coexist() {
        let mut pose = figure(0.2, 0.16);
        shift(&mut pose, &[L::LeftShoulder, L::RightShoulder], 0.04, 0.0);
        profile(&mut pose, 0.62, 0.01);
        let a = analyze_posture(&pose, &PostureThresholds::default());
        assert!(a.has_issue(PostureIssueType::ForwardHead));
        assert!(a.has_issue(PostureIssueType::RoundedShoulders));
    }

    #[test]
    fn test_swayback() {
        let mut pose = figure(0.2, 0.16);
        shift(&mut pose, &[L::LeftHip, L::RightHip], 0.03, 0.0);
        profile(&mut pose, 0.5, 0.01);
        let a = analyze_posture(&pose, &PostureThresholds::default());
        assert!(a.has_issue(PostureIssueType::Swayback));
        assert!(!a.has_issue(PostureIssueType::RoundedShoulders));
    }

    #[test]
    fn test_frontal_view_has_no_sagittal_issues() {
        for dx in [0.03, -0.03] {
            let mut pose = figure(0.2, 0.16);
            shift(&mut pose, &[L::LeftShoulder, L::RightShoulder], dx, 0.0);
            let a = analyze_posture(&pose, &PostureThresholds::default());
            assert_eq!(a.head_position, HeadPosition::Neutral, "dx {dx}");
            assert_eq!(
                issue_types(&a),
                vec![PostureIssueType::SpinalMisalignment],
                "dx {dx}"
            );
        }
    }

    #[test]
    fn test_mirrored_body_has_same_issues() {
        let mut frontal = figure(0.2, 0.16);
        shift(&mut frontal, &[L::LeftShoulder, L::RightShoulder], 0.03, 0.0);
        shift(&mut frontal, &[L::RightHip], 0.0, 0.02);

        let mut side = figure(0.2, 0.16);
        shift(&mut side, &[L::LeftShoulder, L::RightShoulder], 0.04, 0.0);
        shift(&mut side, &[L::LeftHip, L::RightHip], 0.02, 0.0);
        profile(&mut side, 0.60, 0.01);

        let t = PostureThresholds::default();
        for pose in [frontal, side] {
            let a = analyze_posture(&pose, &t);
            let b = analyze_posture(&mirrored(&pose), &t);
            assert_eq!(issue_types(&a), issue_types(&b));
            assert_eq!(a.head_position, b.head_position);
            assert_relative_eq!(a.spine_alignment, b.spine_alignment, epsilon = 1e-9);
            assert_relative_eq!(a.hip_tilt, b.hip_tilt, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_lateral_lean_lowers_alignment() {
        let mut pose = figure(0.2, 0.16);
        shift(&mut pose, &[L::LeftShoulder, L::RightShoulder], 0.1, 0.0);
        let a = analyze_posture(&pose, &PostureThresholds::default());
        let lean = (0.1_f64 / 0.3).atan().to_degrees();
        assert_relative_eq!(a.spine_alignment, 100.0 - 5.0 * lean, epsilon = 1e-9);
        let issue = a
            .issues
            .iter()
            .find(|i| i.issue_type == PostureIssueType::SpinalMisalignment)
            .unwrap();
        assert_eq!(issue.severity, 5);
    }

    #[test]
    fn test_severity_scale() {
        assert_eq!(severity(3.0, 3.0, 12.0), 1);
        assert_eq!(severity(7.5, 3.0, 12.0), 3);
        assert_eq!(severity(12.0, 3.0, 12.0), 5);
        assert_eq!(severity(40.0, 3.0, 12.0), 5);
    }

    #[test]
    fn test_line_x_at() {
        let a = Landmark::new(0.5, 0.2, 0.0, 1.0);
        let b = Landmark::new(0.7, 0.6, 0.0, 1.0);
        assert_relative_eq!(line_x_at(&a, &b, 0.4), 0.6, epsilon = 1e-12);
        assert_relative_eq!(line_x_at(&a, &a, 0.4), 0.5, epsilon = 1e-12);
    }
}
