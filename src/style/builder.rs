//! Style Builder
//!
//! Turns a `(project, level, mode, toggles)` tuple into a full style
//! document. Every call starts from an empty spec; nothing is patched.

use serde_json::{json, Value};
use tracing::{debug, warn};

use super::expr::{get, lit, number, CmpOp, Curve, Expr};
use super::spec::{Layer, LayerKind, MapStyleSpec, Source};
use crate::backend::Credential;
use crate::classify::color::{time_thresholds, TIME_COLORS};
use crate::classify::opacity::{max_density, MIN_DENSITY};
use crate::classify::{
    BoundConvention, Grade, Rgba, BAND_TABLE, DIFF_TABLE, FLAT_OPACITY, GRADE_TABLE, OPACITY_CEIL,
    OPACITY_FLOOR,
};
use crate::config::MaprConfig;
use crate::model::{AverageType, Project, ResolutionLevel, VisualizationMode};

pub const BASEMAP_SOURCE: &str = "basemap";
pub const LABEL_SOURCE: &str = "labels";
pub const PREVIEW_SOURCE: &str = "preview";
pub const DATA_SOURCE: &str = "mobility";

pub const BASEMAP_LAYER: &str = "basemap";
pub const PREVIEW_LAYER: &str = "preview-outline";
pub const DATA_LAYER: &str = "mobility-fill";
pub const SCORE_LABEL_LAYER: &str = "mobility-grades";
pub const LABEL_LAYER: &str = "labels";

/// H3 resolution requested for hexagon tiles.
pub const HEXAGON_RESOLUTION: u8 = 9;

/// Everything a style depends on. Equal inputs give equal styles.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleInputs {
    pub project: Option<Project>,
    pub level: ResolutionLevel,
    pub mode: VisualizationMode,
    pub average: AverageType,
    pub selected_feature: Option<String>,
    /// Grade labels over the fill; only honoured in index mode away from hexagons
    pub score_shown: bool,
    pub credential: Option<Credential>,
    /// GeoJSON feature shown in the scratch layer before a project exists
    pub preview: Option<Value>,
}

impl StyleInputs {
    pub fn empty(level: ResolutionLevel) -> Self {
        Self {
            project: None,
            level,
            mode: VisualizationMode::Index,
            average: AverageType::Population,
            selected_feature: None,
            score_shown: false,
            credential: None,
            preview: None,
        }
    }
}

pub struct StyleBuilder {
    api_base_url: String,
    basemap_tiles: String,
    label_tiles: String,
    attribution: String,
}

impl StyleBuilder {
    pub fn new(config: &MaprConfig) -> Self {
        Self {
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            basemap_tiles: config.basemap_tiles.clone(),
            label_tiles: config.label_tiles.clone(),
            attribution: config.basemap_attribution.clone(),
        }
    }

    pub fn build(&self, inputs: &StyleInputs) -> MapStyleSpec {
        let mut spec = MapStyleSpec::new();

        spec.sources.insert(BASEMAP_SOURCE.to_string(), self.raster(&self.basemap_tiles));
        spec.sources.insert(LABEL_SOURCE.to_string(), self.raster(&self.label_tiles));
        spec.sources.insert(
            PREVIEW_SOURCE.to_string(),
            Source::GeoJson { data: preview_data(inputs.preview.as_ref()) },
        );

        spec.layers.push(Layer::new(BASEMAP_LAYER, LayerKind::Raster, BASEMAP_SOURCE));
        spec.layers.push(
            Layer::new(PREVIEW_LAYER, LayerKind::Line, PREVIEW_SOURCE)
                .paint("line-color", lit(Rgba::BLACK.css()))
                .paint("line-width", lit(2.0)),
        );

        if let Some(project) = &inputs.project {
            match &inputs.credential {
                Some(credential) => self.add_data_layers(&mut spec, project, credential, inputs),
                None => warn!("Project {} has no credential; data layer skipped", project.id),
            }
        }

        // Labels paint above everything else
        spec.layers.push(Layer::new(LABEL_LAYER, LayerKind::Raster, LABEL_SOURCE));

        debug!("Built style: level={} mode={:?} layers={:?}", inputs.level, inputs.mode, spec.layer_ids());
        spec
    }

    fn raster(&self, template: &str) -> Source {
        Source::Raster {
            tiles: vec![template.to_string()],
            tile_size: 256,
            attribution: self.attribution.clone(),
        }
    }

    fn add_data_layers(&self, spec: &mut MapStyleSpec, project: &Project, credential: &Credential, inputs: &StyleInputs) {
        let level = inputs.level;
        spec.sources.insert(
            DATA_SOURCE.to_string(),
            Source::Vector { tiles: vec![self.tile_url(project, level, inputs.average, credential)], maxzoom: None },
        );

        let color = fill_color(inputs.mode);
        let outline = match &inputs.selected_feature {
            Some(id) => selected_outline(id, color.clone()),
            None => color.clone(),
        };

        spec.layers.push(
            Layer::new(DATA_LAYER, LayerKind::Fill, DATA_SOURCE)
                .source_layer(level.as_str())
                .paint("fill-color", color)
                .paint("fill-outline-color", outline)
                .paint("fill-opacity", fill_opacity(level)),
        );

        // grade labels read `index`, which score and difference tiles do not grade
        if inputs.score_shown && level != ResolutionLevel::Hexagon && inputs.mode == VisualizationMode::Index {
            spec.layers.push(
                Layer::new(SCORE_LABEL_LAYER, LayerKind::Symbol, DATA_SOURCE)
                    .source_layer(level.as_str())
                    .layout("text-field", grade_label())
                    .layout("text-size", lit(12))
                    .paint("text-halo-color", lit(Rgba::opaque(255, 255, 255).css()))
                    .paint("text-halo-width", lit(1.0)),
            );
        }
    }

    /// Vector tile template for one project and level.
    pub fn tile_url(&self, project: &Project, level: ResolutionLevel, average: AverageType, credential: &Credential) -> String {
        let mut query = vec![
            format!("aggregation={}", average.as_str()),
            format!("project={}", project.id),
        ];
        if level == ResolutionLevel::Hexagon {
            query.push(format!("resolution={}", HEXAGON_RESOLUTION));
        }
        let (key, value) = credential.query_pair();
        query.push(format!("{}={}", key, urlencoding::encode(value)));
        if project.overwrite {
            query.push("overwrite=true".to_string());
        }
        format!("{}/tiles/{}/{{z}}/{{x}}/{{y}}.pbf?{}", self.api_base_url, level.as_str(), query.join("&"))
    }
}

fn preview_data(preview: Option<&Value>) -> Value {
    match preview {
        Some(feature) => feature.clone(),
        None => json!({ "type": "FeatureCollection", "features": [] }),
    }
}

/// Fill colour expression for the active mode.
pub fn fill_color(mode: VisualizationMode) -> Expr {
    let input = number(mode.property(), 0.0);
    match mode {
        VisualizationMode::Index => {
            Expr::classify(input, &BAND_TABLE, BoundConvention::Inclusive, |band| lit(band.color().css()))
        }
        VisualizationMode::Difference => {
            Expr::classify(input, &DIFF_TABLE, BoundConvention::Inclusive, |c| lit(c.css()))
        }
        VisualizationMode::Score => Expr::Step {
            input: Box::new(input),
            base: Box::new(lit(TIME_COLORS[0].css())),
            stops: time_thresholds().zip(TIME_COLORS.iter().skip(1)).map(|(t, c)| (t, lit(c.css()))).collect(),
        },
    }
}

/// Black outline for the selected feature, `color` for the rest.
pub fn selected_outline(feature_id: &str, color: Expr) -> Expr {
    Expr::Case {
        branches: vec![(
            Expr::Compare(CmpOp::Eq, Box::new(Expr::ToStr(Box::new(get("id")))), Box::new(lit(feature_id))),
            lit(Rgba::BLACK.css()),
        )],
        fallback: Box::new(color),
    }
}

/// Flat opacity, except hexagons which fade with population density on the
/// same log scale as `classify::opacity_of`.
pub fn fill_opacity(level: ResolutionLevel) -> Expr {
    if level != ResolutionLevel::Hexagon {
        return lit(FLAT_OPACITY);
    }
    let density = Expr::Max(Box::new(number("population_density", 0.0)), Box::new(lit(MIN_DENSITY)));
    Expr::Interpolate {
        curve: Curve::Linear,
        input: Box::new(Expr::Ln(Box::new(density))),
        stops: vec![(0.0, OPACITY_FLOOR), ((max_density(level) / MIN_DENSITY).ln(), OPACITY_CEIL)],
    }
}

/// Grade text per feature from its `index` property; no-data features get
/// no label. Only meaningful for index-mode styles.
pub fn grade_label() -> Expr {
    Expr::classify(number("index", 0.0), &GRADE_TABLE, BoundConvention::Inclusive, |g| match g {
        Grade::Error => lit(""),
        g => lit(g.as_str()),
    })
}
