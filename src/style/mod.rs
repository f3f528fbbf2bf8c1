//! Style Module
//!
//! Map style documents for the rendering surface: typed paint expressions,
//! the source/layer document and the builder that assembles them.

pub mod expr;
pub mod spec;
pub mod builder;
pub mod legend;

pub use expr::{CmpOp, Curve, Expr};
pub use spec::{Layer, LayerKind, MapStyleSpec, Source};
pub use builder::{StyleBuilder, StyleInputs};
pub use legend::{legend_for, LegendEntry};
