//! Body mass index and its category bands.

use serde::{Deserialize, Serialize};

/// BMI band.
///
/// Cut-offs: underweight below 18.5, normal below 23, overweight below 25,
/// obese from 25.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    /// BMI < 18.5.
    Underweight,
    /// 18.5 ≤ BMI < 23.
    Normal,
    /// 23 ≤ BMI < 25.
    Overweight,
    /// BMI ≥ 25.
    Obese,
}

impl BmiCategory {
    /// Upper bound (exclusive) of the underweight band.
    pub const UNDERWEIGHT_BELOW: f64 = 18.5;
    /// Upper bound (exclusive) of the normal band.
    pub const NORMAL_BELOW: f64 = 23.0;
    /// Upper bound (exclusive) of the overweight band.
    pub const OVERWEIGHT_BELOW: f64 = 25.0;

    /// Band for a BMI value.
    #[must_use]
    pub fn from_value(bmi: f64) -> Self {
        if bmi < Self::UNDERWEIGHT_BELOW {
            Self::Underweight
        } else if bmi < Self::NORMAL_BELOW {
            Self::Normal
        } else if bmi < Self::OVERWEIGHT_BELOW {
            Self::Overweight
        } else {
            Self::Obese
        }
    }
}

/// Body mass index computed from real height and weight.
///
/// # Example
///
/// ```
/// use body_types::{Bmi, BmiCategory};
///
/// let bmi = Bmi::from_metrics(170.0, 65.0).unwrap();
/// assert!((bmi.value - 22.49).abs() < 0.01);
/// assert_eq!(bmi.category, BmiCategory::Normal);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bmi {
    /// kg / m².
    pub value: f64,
    /// Band of `value`.
    pub category: BmiCategory,
}

impl Bmi {
    /// Computes BMI. Returns `None` for non-positive or non-finite input.
    #[must_use]
    pub fn from_metrics(height_cm: f64, weight_kg: f64) -> Option<Self> {
        if !(height_cm.is_finite() && weight_kg.is_finite()) || height_cm <= 0.0 || weight_kg <= 0.0
        {
            return None;
        }
        let height_m = height_cm / 100.0;
        let value = weight_kg / (height_m * height_m);
        Some(Self {
            value,
            category: BmiCategory::from_value(value),
        })
    }
}
