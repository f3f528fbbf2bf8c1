//! Mobility Map View
//!
//! Map-side logic for an accessibility dashboard:
//! - Score classification into grades, colours and opacities
//! - Style documents (sources, layers, paint expressions) per resolution
//! - A throttled view controller with stale-response protection
//! - Weighted aggregation of per-hexagon sub-scores for charts

pub mod aggregation;
pub mod backend;
pub mod classify;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod resolution;
pub mod server;
pub mod style;
pub mod telemetry;

// Re-exports for convenience
pub use config::MaprConfig;
pub use controller::{Command, ControllerEvent, MapViewController};
pub use error::{MaprError, Result};
pub use style::{MapStyleSpec, StyleBuilder, StyleInputs};
