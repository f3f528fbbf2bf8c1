//! Chart-ready summaries for a selected feature.

use serde::{Deserialize, Serialize};

use super::engine::{AggregateEntry, AggregationEngine, CategorySort, LabelTable};
use crate::classify::band_color_of;
use crate::model::ProjectDetail;

/// Radar axis padding: `highest * 1.05 + 0.35`.
const AXIS_SCALE: f64 = 1.05;
const AXIS_OFFSET: f64 = 0.35;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSummary {
    pub modes: Vec<AggregateEntry>,
    pub categories: Vec<AggregateEntry>,
    pub personas: Vec<AggregateEntry>,
    pub mode_colors: Vec<String>,
    pub category_colors: Vec<String>,
    pub persona_colors: Vec<String>,
    /// Highest score on the radar axes (categories and personas)
    pub highest_score: f64,
    pub axis_max: f64,
}

impl ChartSummary {
    pub fn build(engine: &AggregationEngine, detail: &ProjectDetail, sort: CategorySort) -> Self {
        let modes = engine.modes(&detail.hexagons, &LabelTable::new(&detail.modes));
        let categories = engine.categories(&detail.hexagons, &LabelTable::new(&detail.categories), sort);
        let personas = engine.personas(&detail.hexagons, &LabelTable::new(&detail.personas));

        let highest_score = categories
            .iter()
            .chain(personas.iter())
            .map(|e| e.score)
            .fold(0.0_f64, f64::max);

        Self {
            mode_colors: palette(&modes),
            category_colors: palette(&categories),
            persona_colors: palette(&personas),
            modes,
            categories,
            personas,
            highest_score,
            axis_max: radar_axis_max(highest_score),
        }
    }
}

pub fn radar_axis_max(highest_score: f64) -> f64 {
    highest_score * AXIS_SCALE + AXIS_OFFSET
}

fn palette(entries: &[AggregateEntry]) -> Vec<String> {
    entries.iter().map(|e| band_color_of(e.score).hex()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AverageType, AxisInfo, CategoryScore, HexagonRecord, PersonaScore};

    #[test]
    fn test_summary_axis_and_palette() {
        let detail = ProjectDetail {
            hexagons: vec![HexagonRecord {
                population: 50.0,
                category_scores: vec![CategoryScore { category: 1, score: 0.3 }],
                persona_scores: vec![PersonaScore { persona: 9, score: 1.0 }],
                ..Default::default()
            }],
            categories: vec![AxisInfo { id: 1, name: "Shopping".into(), weight: 2.0 }],
            ..Default::default()
        };
        let engine = AggregationEngine::new(AverageType::Population);
        let summary = ChartSummary::build(&engine, &detail, CategorySort::Weight);

        assert_eq!(summary.highest_score, 1.0);
        assert!((summary.axis_max - 1.4).abs() < 1e-12);
        assert_eq!(summary.category_colors, vec![band_color_of(0.3).hex()]);
        assert_eq!(summary.categories[0].label, "Shopping");
        assert_eq!(summary.personas[0].label, "9");
        assert!(summary.modes.is_empty());
    }

    #[test]
    fn test_empty_detail() {
        let engine = AggregationEngine::new(AverageType::Area);
        let summary = ChartSummary::build(&engine, &ProjectDetail::default(), CategorySort::Score);
        assert_eq!(summary.highest_score, 0.0);
        assert_eq!(summary.axis_max, 0.35);
    }
}
