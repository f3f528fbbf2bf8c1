//! Weighted averaging of hexagon sub-scores.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::model::{AverageType, AxisInfo, HexagonRecord};

/// Which sub-score collection of a hexagon is being aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Mode,
    Category,
    Persona,
}

/// Ordering of the category list in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategorySort {
    #[default]
    Weight,
    Score,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateEntry {
    pub key: u32,
    pub label: String,
    /// Weighted average across all hexagons carrying this key
    pub score: f64,
    /// Importance weight from the side table (0 when unknown)
    pub weight: f64,
    /// Sum of the aggregation weights that contributed
    pub total_weight: f64,
}

/// Running `Σ score·w` and `Σ w` for one key. Division happens once at the end.
#[derive(Debug, Default, Clone, Copy)]
struct Accumulator {
    sum: f64,
    weight: f64,
}

impl Accumulator {
    fn add(&mut self, score: f64, weight: f64) {
        self.sum += score * weight;
        self.weight += weight;
    }

    fn average(&self) -> f64 {
        if self.weight == 0.0 {
            0.0
        } else {
            self.sum / self.weight
        }
    }
}

/// Key → display name / weight lookup.
#[derive(Debug, Clone, Default)]
pub struct LabelTable {
    rows: HashMap<u32, AxisInfo>,
}

impl LabelTable {
    pub fn new(rows: &[AxisInfo]) -> Self {
        Self { rows: rows.iter().map(|r| (r.id, r.clone())).collect() }
    }

    /// Unknown keys fall back to the stringified key.
    pub fn label(&self, key: u32) -> String {
        self.rows.get(&key).map(|r| r.name.clone()).unwrap_or_else(|| key.to_string())
    }

    pub fn weight(&self, key: u32) -> f64 {
        self.rows.get(&key).map(|r| r.weight).unwrap_or(0.0)
    }
}

pub struct AggregationEngine {
    average: AverageType,
}

impl AggregationEngine {
    pub fn new(average: AverageType) -> Self {
        Self { average }
    }

    pub fn average_type(&self) -> AverageType {
        self.average
    }

    /// Population weighting uses the hexagon population; area weighting counts
    /// every hexagon once. Non-finite or negative populations weigh nothing.
    pub fn weight_of(&self, hexagon: &HexagonRecord) -> f64 {
        match self.average {
            AverageType::Area => 1.0,
            AverageType::Population if hexagon.population.is_finite() && hexagon.population > 0.0 => {
                hexagon.population
            }
            AverageType::Population => 0.0,
        }
    }

    /// Unsorted weighted averages, ascending by key.
    pub fn aggregate(&self, hexagons: &[HexagonRecord], axis: Axis, labels: &LabelTable) -> Vec<AggregateEntry> {
        let mut acc: BTreeMap<u32, Accumulator> = BTreeMap::new();

        for hexagon in hexagons {
            let w = self.weight_of(hexagon);
            for (key, score) in sub_scores(hexagon, axis) {
                if !score.is_finite() {
                    continue;
                }
                acc.entry(key).or_default().add(score, w);
            }
        }

        debug!("Aggregated {} {:?} keys over {} hexagons", acc.len(), axis, hexagons.len());

        acc.into_iter()
            .map(|(key, a)| AggregateEntry {
                key,
                label: labels.label(key),
                score: a.average(),
                weight: labels.weight(key),
                total_weight: a.weight,
            })
            .collect()
    }

    /// Modes, best (lowest) score first.
    pub fn modes(&self, hexagons: &[HexagonRecord], labels: &LabelTable) -> Vec<AggregateEntry> {
        let mut entries = self.aggregate(hexagons, Axis::Mode, labels);
        entries.sort_by(|a, b| a.score.total_cmp(&b.score));
        entries
    }

    pub fn categories(&self, hexagons: &[HexagonRecord], labels: &LabelTable, sort: CategorySort) -> Vec<AggregateEntry> {
        let mut entries = self.aggregate(hexagons, Axis::Category, labels);
        match sort {
            CategorySort::Weight => entries.sort_by(|a, b| b.weight.total_cmp(&a.weight)),
            CategorySort::Score => entries.sort_by(|a, b| b.score.total_cmp(&a.score)),
        }
        entries
    }

    /// Personas, highest score first.
    pub fn personas(&self, hexagons: &[HexagonRecord], labels: &LabelTable) -> Vec<AggregateEntry> {
        let mut entries = self.aggregate(hexagons, Axis::Persona, labels);
        entries.sort_by(|a, b| b.score.total_cmp(&a.score));
        entries
    }
}

fn sub_scores(hexagon: &HexagonRecord, axis: Axis) -> Vec<(u32, f64)> {
    match axis {
        Axis::Mode => hexagon.mode_scores.iter().map(|s| (s.mode, s.score)).collect(),
        Axis::Category => hexagon.category_scores.iter().map(|s| (s.category, s.score)).collect(),
        Axis::Persona => hexagon.persona_scores.iter().map(|s| (s.persona, s.score)).collect(),
    }
}
