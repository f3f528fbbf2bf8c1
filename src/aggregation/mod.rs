//! Aggregation Module
//!
//! Population- or area-weighted roll-ups of per-hexagon sub-scores into
//! mode, category and persona summaries for charting.

pub mod engine;
pub mod chart;

pub use engine::{AggregateEntry, AggregationEngine, Axis, CategorySort, LabelTable};
pub use chart::{radar_axis_max, ChartSummary};
