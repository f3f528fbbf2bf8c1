//! Score Classification
//!
//! Pure functions from a number to a grade, a colour or an opacity. Map
//! paint rules, legend, tooltips and chart palettes all go through here.

pub mod table;
pub mod grade;
pub mod color;
pub mod opacity;

pub use table::{BoundConvention, ClassTable};
pub use grade::{grade_of, grade_of_with, Grade, GRADE_TABLE};
pub use color::{
    band_color_of, color_band_of, diff_color_of, time_color_of, ColorBand, Rgba, BAND_TABLE,
    DIFF_TABLE, TIME_COLORS,
};
pub use opacity::{opacity_of, FLAT_OPACITY, OPACITY_CEIL, OPACITY_FLOOR};

/// Tooltip text such as `B+ (0.38)`. No-data scores render as a dash.
pub fn score_label(score: f64) -> String {
    match grade_of(score) {
        Grade::Error => "–".to_string(),
        grade => format!("{} ({:.2})", grade, score),
    }
}
