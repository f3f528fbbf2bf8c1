//! Legend entries, derived from the same tables as the paint rules.

use serde::{Deserialize, Serialize};

use crate::classify::color::{time_thresholds, TIME_COLORS, TIME_STEP_SECS};
use crate::classify::{ColorBand, BAND_TABLE, DIFF_TABLE};
use crate::model::VisualizationMode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    /// CSS colour, identical to the paint rule output
    pub color: String,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

pub fn legend_for(mode: VisualizationMode) -> Vec<LegendEntry> {
    match mode {
        VisualizationMode::Index => BAND_TABLE
            .ranges()
            .into_iter()
            .map(|(lower, upper, band)| LegendEntry {
                label: band_label(band).to_string(),
                color: band.color().css(),
                lower,
                upper,
            })
            .collect(),
        VisualizationMode::Difference => DIFF_TABLE
            .ranges()
            .into_iter()
            .map(|(lower, upper, color)| LegendEntry {
                label: range_label(lower, upper),
                color: color.css(),
                lower,
                upper,
            })
            .collect(),
        VisualizationMode::Score => {
            let bounds: Vec<f64> = time_thresholds().collect();
            TIME_COLORS
                .iter()
                .enumerate()
                .map(|(i, color)| {
                    let lower = if i == 0 { None } else { Some(bounds[i - 1]) };
                    let upper = bounds.get(i).copied();
                    LegendEntry { label: minutes_label(lower, upper), color: color.css(), lower, upper }
                })
                .collect()
        }
    }
}

fn band_label(band: ColorBand) -> &'static str {
    match band {
        ColorBand::NoData => "No data",
        ColorBand::Green => "A",
        ColorBand::LightGreen => "B",
        ColorBand::Yellow => "C",
        ColorBand::Orange => "D",
        ColorBand::Red => "E",
        ColorBand::Purple => "F",
    }
}

fn range_label(lower: Option<f64>, upper: Option<f64>) -> String {
    match (lower, upper) {
        (None, Some(u)) => format!("≤ {}", u),
        (Some(l), Some(u)) => format!("{} to {}", l, u),
        (Some(l), None) => format!("> {}", l),
        (None, None) => String::new(),
    }
}

fn minutes_label(lower: Option<f64>, upper: Option<f64>) -> String {
    let min = |s: f64| (s / TIME_STEP_SECS * 10.0).round() as i64;
    match (lower, upper) {
        (None, Some(u)) => format!("< {} min", min(u)),
        (Some(l), Some(u)) => format!("{}–{} min", min(l), min(u)),
        (Some(l), None) => format!("≥ {} min", min(l)),
        (None, None) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{band_color_of, diff_color_of, time_color_of};

    #[test]
    fn test_index_legend() {
        let legend = legend_for(VisualizationMode::Index);
        assert_eq!(legend.len(), 7);
        assert_eq!(legend[0].label, "No data");
        assert_eq!(legend[1].upper, Some(0.35));
        assert_eq!(legend[6].lower, Some(1.41));
        assert_eq!(legend[6].upper, None);
        for entry in &legend[1..] {
            let upper = entry.upper.unwrap_or(5.0);
            assert_eq!(entry.color, band_color_of(upper).css());
        }
    }

    #[test]
    fn test_difference_legend_colors_match_scale() {
        let legend = legend_for(VisualizationMode::Difference);
        assert_eq!(legend.len(), 15);
        for entry in &legend {
            let probe = entry.upper.unwrap_or(10.0);
            assert_eq!(entry.color, diff_color_of(probe).css(), "{}", entry.label);
        }
        assert_eq!(legend[0].label, "≤ -1.41");
        assert_eq!(legend[14].label, "> 1.41");
    }

    #[test]
    fn test_score_legend_minutes() {
        let legend = legend_for(VisualizationMode::Score);
        assert_eq!(legend.len(), 6);
        assert_eq!(legend[0].label, "< 10 min");
        assert_eq!(legend[1].label, "10–20 min");
        assert_eq!(legend[5].label, "≥ 50 min");
        assert_eq!(legend[2].color, time_color_of(1200.0).css());
    }
}
