//! Density-scaled fill opacity.
//!
//! Sparse areas fade out so that a good index in an empty forest does not
//! read as loudly as the same index in a city centre.

use crate::model::ResolutionLevel;

pub const OPACITY_FLOOR: f64 = 0.3;
pub const OPACITY_CEIL: f64 = 0.9;
/// Opacity of every level that is not density-scaled.
pub const FLAT_OPACITY: f64 = 0.9;

pub const MIN_DENSITY: f64 = 1.0;

/// Densest unit observed at each level (inhabitants / km²).
pub fn max_density(level: ResolutionLevel) -> f64 {
    match level {
        ResolutionLevel::State | ResolutionLevel::County => 1_782_202.0,
        ResolutionLevel::Municipality => 3_062.0,
        ResolutionLevel::Hexagon => 18_338.0,
    }
}

/// Position of `density` on the log scale `[MIN_DENSITY, max_density]`,
/// clamped to `[0, 1]`. Zero, negative and NaN map to 0.
pub fn log_position(density: f64, level: ResolutionLevel) -> f64 {
    if !(density > 0.0) {
        return 0.0;
    }
    let span = (max_density(level) / MIN_DENSITY).ln();
    let t = (density / MIN_DENSITY).ln() / span;
    if t.is_nan() {
        return 0.0;
    }
    t.clamp(0.0, 1.0)
}

pub fn opacity_of(density: f64, level: ResolutionLevel) -> f64 {
    let t = log_position(density, level);
    // endpoints land exactly on the floor and ceiling
    (OPACITY_FLOOR * (1.0 - t) + OPACITY_CEIL * t).clamp(OPACITY_FLOOR, OPACITY_CEIL)
}
