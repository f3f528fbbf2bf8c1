//! Data Model
//!
//! Administrative levels, projects, features and the per-hexagon records
//! that feed aggregation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Administrative resolution, ordered from coarsest to finest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionLevel {
    State,
    County,
    Municipality,
    Hexagon,
}

impl ResolutionLevel {
    pub const ALL: [ResolutionLevel; 4] = [
        ResolutionLevel::State,
        ResolutionLevel::County,
        ResolutionLevel::Municipality,
        ResolutionLevel::Hexagon,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionLevel::State => "state",
            ResolutionLevel::County => "county",
            ResolutionLevel::Municipality => "municipality",
            ResolutionLevel::Hexagon => "hexagon",
        }
    }
}

impl fmt::Display for ResolutionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the user asked to see. Difference rendering is not a choice here:
/// it follows from the project (see [`VisualizationMode::resolve`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualizationType {
    #[default]
    Index,
    Score,
}

/// The mode actually used to paint the data layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualizationMode {
    Index,
    Score,
    Difference,
}

impl VisualizationMode {
    /// Difference projects always paint the diverging scale.
    pub fn resolve(project: Option<&Project>, requested: VisualizationType) -> Self {
        match (project, requested) {
            (Some(p), _) if p.difference => VisualizationMode::Difference,
            (_, VisualizationType::Score) => VisualizationMode::Score,
            (_, VisualizationType::Index) => VisualizationMode::Index,
        }
    }

    /// Feature property the paint rules read.
    pub fn property(&self) -> &'static str {
        match self {
            VisualizationMode::Score => "score",
            VisualizationMode::Index | VisualizationMode::Difference => "index",
        }
    }
}

/// Weighting used when averaging sub-scores across hexagons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AverageType {
    #[default]
    Population,
    Area,
}

impl AverageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AverageType::Population => "population",
            AverageType::Area => "area",
        }
    }
}

/// A computed accessibility analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    /// Comparison of two runs; values are deltas rather than indices
    #[serde(default)]
    pub difference: bool,
    /// Ask the tile server to bypass its cache
    #[serde(default)]
    pub overwrite: bool,
}

impl Project {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self { id, name: name.into(), difference: false, overwrite: false }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub min_lng: f64,
    pub min_lat: f64,
    pub max_lng: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    pub fn is_valid(&self) -> bool {
        [self.min_lng, self.min_lat, self.max_lng, self.max_lat]
            .iter()
            .all(|v| v.is_finite())
            && self.min_lng <= self.max_lng
            && self.min_lat <= self.max_lat
    }

    /// `[[w, s], [e, n]]`, the order map renderers expect.
    pub fn corners(&self) -> [[f64; 2]; 2] {
        [[self.min_lng, self.min_lat], [self.max_lng, self.max_lat]]
    }
}

/// One administrative entity as delivered in tile properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "index")]
    pub score: f64,
    #[serde(default)]
    pub population: f64,
    #[serde(default)]
    pub population_density: f64,
    pub level: ResolutionLevel,
    #[serde(default)]
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeScore {
    pub mode: u32,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: u32,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaScore {
    pub persona: u32,
    pub score: f64,
}

/// Finest-grained analysis unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HexagonRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub population: f64,
    #[serde(default)]
    pub mode_scores: Vec<ModeScore>,
    #[serde(default)]
    pub category_scores: Vec<CategoryScore>,
    #[serde(default)]
    pub persona_scores: Vec<PersonaScore>,
}

/// Side-table row naming a mode, category or persona.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisInfo {
    pub id: u32,
    pub name: String,
    /// Importance weight; only meaningful for categories
    #[serde(default = "default_axis_weight")]
    pub weight: f64,
}

fn default_axis_weight() -> f64 {
    1.0
}

/// Detail payload for one selected feature.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectDetail {
    #[serde(default)]
    pub hexagons: Vec<HexagonRecord>,
    #[serde(default)]
    pub modes: Vec<AxisInfo>,
    #[serde(default)]
    pub categories: Vec<AxisInfo>,
    #[serde(default)]
    pub personas: Vec<AxisInfo>,
}
