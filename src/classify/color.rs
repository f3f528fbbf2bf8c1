//! Colour scales for the data layer.
//!
//! Three scales share the breakpoint-table machinery:
//! - the six coarse index bands (plus transparent "no data"),
//! - the diverging scale for difference projects,
//! - the six-step travel-time scale for score mode.

use serde::{Deserialize, Serialize};

use super::table::{BoundConvention, ClassTable};

/// sRGB colour with straight alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);

    /// `rgba(r, g, b, a)`, accepted verbatim by map renderers.
    pub fn css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }

    /// `#rrggbb`, alpha dropped. Used by chart palettes.
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

// ---------------------------------------------------------------------------
// Index bands
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorBand {
    NoData,
    Green,
    LightGreen,
    Yellow,
    Orange,
    Red,
    Purple,
}

impl ColorBand {
    pub fn color(&self) -> Rgba {
        match self {
            ColorBand::NoData => Rgba { r: 128, g: 128, b: 128, a: 0.0 },
            ColorBand::Green => Rgba::opaque(26, 150, 65),
            ColorBand::LightGreen => Rgba::opaque(166, 217, 106),
            ColorBand::Yellow => Rgba::opaque(255, 224, 102),
            ColorBand::Orange => Rgba::opaque(253, 141, 60),
            ColorBand::Red => Rgba::opaque(215, 25, 28),
            ColorBand::Purple => Rgba::opaque(123, 50, 148),
        }
    }
}

pub static BAND_TABLE: ClassTable<ColorBand> = ClassTable {
    stops: &[
        (0.0, ColorBand::NoData),
        (0.35, ColorBand::Green),
        (0.5, ColorBand::LightGreen),
        (0.71, ColorBand::Yellow),
        (1.0, ColorBand::Orange),
        (1.41, ColorBand::Red),
    ],
    overflow: ColorBand::Purple,
    nan: ColorBand::NoData,
};

pub fn color_band_of(score: f64) -> ColorBand {
    BAND_TABLE.classify(score, BoundConvention::Inclusive)
}

/// Fill colour for an index value.
pub fn band_color_of(score: f64) -> Rgba {
    color_band_of(score).color()
}

// ---------------------------------------------------------------------------
// Difference scale
// ---------------------------------------------------------------------------

/// Dark red (much worse) through near-white to dark green (much better).
pub static DIFF_TABLE: ClassTable<Rgba> = ClassTable {
    stops: &[
        (-1.41, Rgba::opaque(103, 0, 13)),
        (-1.0, Rgba::opaque(165, 15, 21)),
        (-0.71, Rgba::opaque(203, 24, 29)),
        (-0.5, Rgba::opaque(239, 59, 44)),
        (-0.35, Rgba::opaque(251, 106, 74)),
        (-0.15, Rgba::opaque(252, 146, 114)),
        (-0.05, Rgba::opaque(252, 187, 161)),
        (0.05, Rgba::opaque(247, 247, 247)),
        (0.15, Rgba::opaque(199, 233, 192)),
        (0.35, Rgba::opaque(161, 217, 155)),
        (0.5, Rgba::opaque(116, 196, 118)),
        (0.71, Rgba::opaque(65, 171, 93)),
        (1.0, Rgba::opaque(35, 139, 69)),
        (1.41, Rgba::opaque(0, 109, 44)),
    ],
    overflow: Rgba::opaque(0, 68, 27),
    nan: Rgba::opaque(247, 247, 247),
};

pub fn diff_color_of(delta: f64) -> Rgba {
    DIFF_TABLE.classify(delta, BoundConvention::Inclusive)
}

// ---------------------------------------------------------------------------
// Travel-time scale (score mode)
// ---------------------------------------------------------------------------

/// Step width of the score scale, in seconds.
pub const TIME_STEP_SECS: f64 = 600.0;

pub static TIME_COLORS: [Rgba; 6] = [
    Rgba::opaque(0, 104, 55),
    Rgba::opaque(26, 152, 80),
    Rgba::opaque(166, 217, 106),
    Rgba::opaque(254, 224, 139),
    Rgba::opaque(244, 109, 67),
    Rgba::opaque(165, 0, 38),
];

/// Lower-inclusive steps at 600, 1200, … 3000 s, as a renderer `step` evaluates them.
pub fn time_color_of(seconds: f64) -> Rgba {
    if !(seconds >= TIME_STEP_SECS) {
        return TIME_COLORS[0];
    }
    let idx = (seconds / TIME_STEP_SECS).floor() as usize;
    TIME_COLORS[idx.min(TIME_COLORS.len() - 1)]
}

/// Thresholds where [`time_color_of`] changes colour.
pub fn time_thresholds() -> impl Iterator<Item = f64> {
    (1..TIME_COLORS.len()).map(|i| i as f64 * TIME_STEP_SECS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::grade::{grade_of, GRADE_TABLE};

    #[test]
    fn test_band_boundaries() {
        assert_eq!(color_band_of(0.0), ColorBand::NoData);
        assert_eq!(color_band_of(-3.0), ColorBand::NoData);
        assert_eq!(color_band_of(0.35), ColorBand::Green);
        assert_eq!(color_band_of(0.351), ColorBand::LightGreen);
        assert_eq!(color_band_of(1.0), ColorBand::Orange);
        assert_eq!(color_band_of(1.42), ColorBand::Purple);
        assert_eq!(band_color_of(0.0).a, 0.0);
    }

    #[test]
    fn test_bands_partition_grade_sextets() {
        for bound in GRADE_TABLE.bounds() {
            for s in [bound - 1e-6, bound, bound + 1e-6] {
                assert_eq!(color_band_of(s), grade_of(s).sextet(), "mismatch at {}", s);
            }
        }
    }

    #[test]
    fn test_diff_moderate_negative() {
        assert_eq!(diff_color_of(-0.6), Rgba::opaque(239, 59, 44));
        assert_eq!(diff_color_of(-0.71), Rgba::opaque(203, 24, 29));
        assert_eq!(diff_color_of(0.0), Rgba::opaque(247, 247, 247));
        assert_eq!(diff_color_of(0.05), Rgba::opaque(247, 247, 247));
        assert_eq!(diff_color_of(-0.05), Rgba::opaque(252, 187, 161));
        assert_eq!(diff_color_of(9.0), Rgba::opaque(0, 68, 27));
        assert_eq!(DIFF_TABLE.classes().count(), 15);
    }

    #[test]
    fn test_time_steps() {
        assert_eq!(time_color_of(0.0), TIME_COLORS[0]);
        assert_eq!(time_color_of(599.9), TIME_COLORS[0]);
        assert_eq!(time_color_of(600.0), TIME_COLORS[1]);
        assert_eq!(time_color_of(3000.0), TIME_COLORS[5]);
        assert_eq!(time_color_of(86_400.0), TIME_COLORS[5]);
        assert_eq!(time_color_of(f64::NAN), TIME_COLORS[0]);
        assert_eq!(time_thresholds().collect::<Vec<_>>(), vec![600.0, 1200.0, 1800.0, 2400.0, 3000.0]);
    }

    #[test]
    fn test_css_and_hex() {
        assert_eq!(Rgba::opaque(26, 150, 65).css(), "rgba(26, 150, 65, 1)");
        assert_eq!(Rgba::opaque(26, 150, 65).hex(), "#1a9641");
    }
}
