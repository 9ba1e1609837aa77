//! BMI from caller-supplied height and weight.

use body_types::Bmi;
use tracing::warn;

use crate::params::AnalysisParams;

/// Computes BMI when both height and weight are supplied and plausible.
///
/// Missing values yield `None` silently; implausible values are logged.
///
/// # Example
///
/// ```
/// use body_analysis::{AnalysisParams, compute_bmi};
/// use body_types::BmiCategory;
///
/// let params = AnalysisParams::default();
/// let bmi = compute_bmi(Some(170.0), Some(65.0), &params).unwrap();
/// assert_eq!(bmi.category, BmiCategory::Normal);
/// assert!(compute_bmi(Some(170.0), None, &params).is_none());
/// ```
#[must_use]
pub fn compute_bmi(
    height_cm: Option<f64>,
    weight_kg: Option<f64>,
    params: &AnalysisParams,
) -> Option<Bmi> {
    let (height_cm, weight_kg) = (height_cm?, weight_kg?);

    if !params.is_plausible_height(height_cm) {
        warn!(height_cm, "Height out of range, skipping BMI");
        return None;
    }
    if !params.is_plausible_weight(weight_kg) {
        warn!(weight_kg, "Weight out of range, skipping BMI");
        return None;
    }
    Bmi::from_metrics(height_cm, weight_kg)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use body_types::BmiCategory;

    #[test]
    fn test_reference_value() {
        let bmi = compute_bmi(Some(170.0), Some(65.0), &AnalysisParams::default()).unwrap();
        assert_relative_eq!(bmi.value, 22.49, epsilon = 0.01);
        assert_eq!(bmi.category, BmiCategory::Normal);
    }

    #[test]
    fn test_requires_both_values() {
        let params = AnalysisParams::default();
        assert!(compute_bmi(None, Some(65.0), &params).is_none());
        assert!(compute_bmi(None, None, &params).is_none());
    }

    #[test]
    fn test_rejects_implausible_values() {
        let params = AnalysisParams::default();
        assert!(compute_bmi(Some(170.0), Some(5.0), &params).is_none());
        assert!(compute_bmi(Some(170.0), Some(f64::NAN), &params).is_none());
        assert!(compute_bmi(Some(30.0), Some(65.0), &params).is_none());
    }
}
