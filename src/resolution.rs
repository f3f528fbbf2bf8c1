//! Resolution Selection
//!
//! Which administrative level to request tiles for. Recomputed from scratch
//! on every zoom tick, toggle flip or project switch; nothing is remembered
//! beyond the caller's cached last value.

use serde::{Deserialize, Serialize};

use crate::model::ResolutionLevel;

/// Zoom at which counties replace states.
pub const COUNTY_ZOOM: f64 = 7.0;
pub const MUNICIPALITY_ZOOM: f64 = 9.0;
pub const HEXAGON_ZOOM: f64 = 10.0;

/// Explicit level overrides from the view menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewToggles {
    pub hexagon: bool,
    pub municipality: bool,
    pub county: bool,
}

/// The selected level plus what it implies for other UI elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionChoice {
    pub level: ResolutionLevel,
    /// Set when an override toggle, not the zoom, decided the level
    pub overridden: bool,
    /// Grade labels are suppressed at hexagon granularity
    pub labels_allowed: bool,
}

pub fn level_for_zoom(zoom: f64) -> ResolutionLevel {
    if zoom >= HEXAGON_ZOOM {
        ResolutionLevel::Hexagon
    } else if zoom >= MUNICIPALITY_ZOOM {
        ResolutionLevel::Municipality
    } else if zoom >= COUNTY_ZOOM {
        ResolutionLevel::County
    } else {
        // also NaN
        ResolutionLevel::State
    }
}

/// Toggles win over zoom (hexagon, then municipality, then county), but only
/// for signed-in users.
pub fn select_resolution(zoom: f64, toggles: ViewToggles, logged_in: bool) -> ResolutionChoice {
    let forced = if !logged_in {
        None
    } else if toggles.hexagon {
        Some(ResolutionLevel::Hexagon)
    } else if toggles.municipality {
        Some(ResolutionLevel::Municipality)
    } else if toggles.county {
        Some(ResolutionLevel::County)
    } else {
        None
    };

    let level = forced.unwrap_or_else(|| level_for_zoom(zoom));
    ResolutionChoice {
        level,
        overridden: forced.is_some(),
        labels_allowed: level != ResolutionLevel::Hexagon,
    }
}
