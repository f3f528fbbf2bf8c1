use serde_json::{Map, Value};

use mobi_mapr::aggregation::{AggregationEngine, Axis, LabelTable};
use mobi_mapr::backend::Credential;
use mobi_mapr::classify::{diff_color_of, grade_of, opacity_of, Grade, Rgba};
use mobi_mapr::model::{AverageType, CategoryScore, HexagonRecord, Project, ResolutionLevel, VisualizationMode};
use mobi_mapr::resolution::{select_resolution, ViewToggles};
use mobi_mapr::{MaprConfig, StyleBuilder, StyleInputs};

fn props(pairs: &[(&str, Value)]) -> Map<String, Value> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

fn inputs(project: Project, level: ResolutionLevel) -> StyleInputs {
    StyleInputs {
        mode: VisualizationMode::resolve(Some(&project), Default::default()),
        project: Some(project),
        credential: Some(Credential::Token("t".into())),
        ..StyleInputs::empty(level)
    }
}

#[test]
fn test_population_weighted_category_average() {
    let hexagon = |population: f64, score: f64| HexagonRecord {
        population,
        category_scores: vec![CategoryScore { category: 1, score }],
        ..Default::default()
    };
    let hexagons = vec![hexagon(100.0, 0.4), hexagon(300.0, 0.8)];

    let out = AggregationEngine::new(AverageType::Population).aggregate(&hexagons, Axis::Category, &LabelTable::default());
    assert!((out[0].score - 0.7).abs() < 1e-12);
}

#[test]
fn test_grade_boundaries() {
    // 0.36 sits above the A- bound of 0.35
    assert_eq!(grade_of(0.36), Grade::BPlus);
    assert_eq!(grade_of(0.35), Grade::AMinus);
    assert_eq!(grade_of(0.0), Grade::Error);
    assert_eq!(grade_of(2.5), Grade::FMinus);
}

#[test]
fn test_difference_project_paints_moderate_negative_band() {
    let mut project = Project::new(3, "diff");
    project.difference = true;
    let spec = StyleBuilder::new(&MaprConfig::default()).build(&inputs(project, ResolutionLevel::County));

    let fill = &spec.layer("mobility-fill").unwrap().paint["fill-color"];
    let painted = fill.eval(&props(&[("index", Value::from(-0.6))]));
    assert_eq!(painted, Value::from(diff_color_of(-0.6).css()));
    assert_eq!(diff_color_of(-0.6), Rgba::opaque(239, 59, 44));
}

#[test]
fn test_zoom_to_resolution() {
    let none = ViewToggles::default();
    assert_eq!(select_resolution(9.5, none, true).level, ResolutionLevel::Municipality);
    assert_eq!(select_resolution(6.9, none, true).level, ResolutionLevel::State);
    assert_eq!(select_resolution(10.0, none, true).level, ResolutionLevel::Hexagon);
}

#[test]
fn test_hexagon_style_fades_sparse_cells() {
    let spec = StyleBuilder::new(&MaprConfig::default()).build(&inputs(Project::new(1, "p"), ResolutionLevel::Hexagon));
    let layer = spec.layer("mobility-fill").unwrap();
    assert_eq!(layer.source_layer.as_deref(), Some("hexagon"));

    for density in [0.0, 1.0, 50.0, 18_338.0] {
        let painted = layer.paint["fill-opacity"].eval(&props(&[("population_density", Value::from(density))]));
        let expected = opacity_of(density, ResolutionLevel::Hexagon);
        assert!((painted.as_f64().unwrap() - expected).abs() < 1e-9, "density {}", density);
    }

    let ids = spec.layer_ids();
    assert_eq!(ids.first(), Some(&"basemap"));
    assert_eq!(ids.last(), Some(&"labels"));
}
