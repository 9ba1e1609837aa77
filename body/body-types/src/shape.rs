//! Body shape categories and their static reference records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypesError;

/// The five canonical body shape categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BodyShapeType {
    /// Shoulders, waist and hips of similar width.
    Rectangle,
    /// Shoulders noticeably wider than hips.
    InvertedTriangle,
    /// Hips noticeably wider than shoulders.
    Triangle,
    /// Waist at least as wide as shoulders or hips.
    Oval,
    /// Balanced shoulders and hips with a clearly narrower waist.
    Hourglass,
}

impl BodyShapeType {
    /// All shapes, in classification priority order (most specific first),
    /// with the default last.
    pub const ALL: [Self; 5] = [
        Self::Hourglass,
        Self::InvertedTriangle,
        Self::Triangle,
        Self::Oval,
        Self::Rectangle,
    ];

    /// Kebab-case identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rectangle => "rectangle",
            Self::InvertedTriangle => "inverted-triangle",
            Self::Triangle => "triangle",
            Self::Oval => "oval",
            Self::Hourglass => "hourglass",
        }
    }

    /// Static reference record for this shape.
    #[must_use]
    pub fn info(self) -> &'static BodyShapeInfo {
        match self {
            Self::Rectangle => &SHAPE_INFO[0],
            Self::InvertedTriangle => &SHAPE_INFO[1],
            Self::Triangle => &SHAPE_INFO[2],
            Self::Oval => &SHAPE_INFO[3],
            Self::Hourglass => &SHAPE_INFO[4],
        }
    }
}

impl fmt::Display for BodyShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BodyShapeType {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|shape| shape.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TypesError::unknown_shape(s))
    }
}

/// Read-only descriptive record for a body shape.
///
/// Records live in [`SHAPE_INFO`] and are only ever handed out as
/// `&'static` references.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct BodyShapeInfo {
    /// Shape this record describes.
    pub shape: BodyShapeType,
    /// Display label.
    pub label: &'static str,
    /// One-paragraph description.
    pub description: &'static str,
    /// Typical proportions.
    pub characteristics: &'static [&'static str],
    /// Clothing choices that suit the shape.
    pub styling_tips: &'static [&'static str],
    /// Clothing choices to avoid.
    pub avoid: &'static [&'static str],
}

/// Reference table, one record per [`BodyShapeType`].
pub static SHAPE_INFO: [BodyShapeInfo; 5] = [
    BodyShapeInfo {
        shape: BodyShapeType::Rectangle,
        label: "Rectangle",
        description: "Shoulders, waist and hips are close in width, giving a straight, \
                      athletic silhouette with little waist definition.",
        characteristics: &[
            "Shoulder and hip widths within about 10% of each other",
            "Waist only slightly narrower than shoulders and hips",
            "Straight vertical line from underarm to hip",
        ],
        styling_tips: &[
            "Belted dresses and wrap tops to create waist definition",
            "Peplum tops and ruffled hems to add curves",
            "Layered outfits with contrasting textures",
            "Scoop and sweetheart necklines",
        ],
        avoid: &[
            "Boxy, shapeless dresses",
            "Dropped waistlines",
            "Head-to-toe straight cuts in a single color",
        ],
    },
    BodyShapeInfo {
        shape: BodyShapeType::InvertedTriangle,
        label: "Inverted Triangle",
        description: "Shoulders are broader than the hips, drawing the eye upward and \
                      giving a strong, V-shaped upper body.",
        characteristics: &[
            "Shoulders at least 10% wider than hips",
            "Narrow hips and straight lower body",
            "Broad chest or back",
        ],
        styling_tips: &[
            "V-necks and deep scoop necklines to narrow the shoulder line",
            "A-line and full skirts to add volume below the waist",
            "Wide-leg and bootcut trousers",
            "Dark, simple tops with brighter or patterned bottoms",
        ],
        avoid: &[
            "Shoulder pads and puff sleeves",
            "Boat necks and horizontal stripes across the chest",
            "Skinny trousers paired with voluminous tops",
        ],
    },
    BodyShapeInfo {
        shape: BodyShapeType::Triangle,
        label: "Triangle",
        description: "Hips are wider than the shoulders, with weight carried in the \
                      hips and thighs and a comparatively narrow upper body.",
        characteristics: &[
            "Hips at least 10% wider than shoulders",
            "Defined waist",
            "Narrower shoulders and upper body",
        ],
        styling_tips: &[
            "Boat necks, wide collars and structured shoulders",
            "Bright colors and patterns on top",
            "A-line skirts and straight-leg trousers in darker tones",
            "Tops that end above the widest part of the hip",
        ],
        avoid: &[
            "Hip pockets and embellishment at the hip line",
            "Tapered or pleated trousers",
            "Tops that end at the widest point of the hips",
        ],
    },
    BodyShapeInfo {
        shape: BodyShapeType::Oval,
        label: "Oval",
        description: "The midsection is the fullest part of the body, with the waist at \
                      least as wide as the shoulders or hips and slimmer limbs.",
        characteristics: &[
            "Waist as wide as or wider than shoulders and hips",
            "Fuller midsection",
            "Often slimmer arms and legs",
        ],
        styling_tips: &[
            "Empire waistlines that fall from under the bust",
            "Vertical lines and long open layers",
            "V-necks to elongate the torso",
            "Structured fabrics that skim rather than cling",
        ],
        avoid: &[
            "Belts at the natural waist",
            "Clingy knits across the midsection",
            "Cropped tops and high-contrast waistbands",
        ],
    },
    BodyShapeInfo {
        shape: BodyShapeType::Hourglass,
        label: "Hourglass",
        description: "Shoulders and hips are balanced with a clearly narrower waist, \
                      giving a curved, proportionate silhouette.",
        characteristics: &[
            "Shoulder and hip widths within 10% of each other",
            "Waist at most 75% of shoulder and hip width",
            "Balanced upper and lower body",
        ],
        styling_tips: &[
            "Wrap dresses and belted styles that follow the waist",
            "Fitted, tailored pieces",
            "High-waisted skirts and trousers",
            "Sweetheart and V-necklines",
        ],
        avoid: &[
            "Boxy, oversized cuts that hide the waist",
            "Stiff fabrics with no drape",
            "Drop-waist silhouettes",
        ],
    },
];
