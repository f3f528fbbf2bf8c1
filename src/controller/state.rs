//! View state and the reducer that applies commands to it.
//!
//! The reducer is synchronous and side-effect free: it mutates the state and
//! reports what the actor has to do next (rebuild, fetch, notify).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::backend::Credential;
use crate::model::{AverageType, BoundingBox, Project, VisualizationMode, VisualizationType};
use crate::resolution::{select_resolution, ResolutionChoice, ViewToggles};
use crate::style::StyleInputs;

/// Zoom shown before the first camera update.
pub const INITIAL_ZOOM: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    /// Bounds fetch in flight
    Loading,
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ComparisonState {
    pub active: bool,
    /// One-shot signal for the renderer, cleared shortly after stopping
    pub stop_requested: bool,
}

/// Camera animation flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitKind {
    Initial,
    ZoomToFeatures,
    Recenter,
}

impl FitKind {
    pub fn duration(&self, initial: Duration, recenter: Duration) -> Duration {
        match self {
            FitKind::Initial | FitKind::ZoomToFeatures => initial,
            FitKind::Recenter => recenter,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", content = "value", rename_all = "snake_case")]
pub enum Command {
    SetZoom(f64),
    SetToggles(ViewToggles),
    SetVisualization(VisualizationType),
    SetAverage(AverageType),
    SelectFeature(Option<String>),
    SetScoreShown(bool),
    SetCredential(Option<Credential>),
    SetPreview(Option<Value>),
    SelectProject(Project),
    ResetProject,
    StartComparison,
    StopComparison,
    FitTo {
        bounds: BoundingBox,
        kind: FitKind,
        #[serde(default)]
        max_zoom: Option<f64>,
    },
}

/// Follow-up work requested by the reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    RebuildNow,
    RebuildThrottled,
    LoadBounds { project: Project, generation: u64, credential: Credential },
    PhaseChanged(Phase),
    ComparisonStarted,
    ComparisonStopped,
    Fit { bounds: BoundingBox, kind: FitKind, max_zoom: Option<f64> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    pub project: Option<Project>,
    /// Bumped on every project switch; async results carry the value they started with
    pub generation: u64,
    pub phase: Phase,
    pub zoom: f64,
    pub visualization: VisualizationType,
    pub average: AverageType,
    pub selected_feature: Option<String>,
    pub toggles: ViewToggles,
    pub score_shown: bool,
    #[serde(skip)]
    pub credential: Option<Credential>,
    pub preview: Option<Value>,
    pub comparison: ComparisonState,
    pub bounds: Option<BoundingBox>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            project: None,
            generation: 0,
            phase: Phase::Idle,
            zoom: INITIAL_ZOOM,
            visualization: VisualizationType::Index,
            average: AverageType::Population,
            selected_feature: None,
            toggles: ViewToggles::default(),
            score_shown: false,
            credential: None,
            preview: None,
            comparison: ComparisonState::default(),
            bounds: None,
        }
    }
}

impl ViewState {
    pub fn logged_in(&self) -> bool {
        self.credential.as_ref().is_some_and(Credential::is_logged_in)
    }

    pub fn resolution(&self) -> ResolutionChoice {
        select_resolution(self.zoom, self.toggles, self.logged_in())
    }

    /// Project as far as rendering is concerned: only once its bounds are in.
    pub fn active_project(&self) -> Option<&Project> {
        match self.phase {
            Phase::Active => self.project.as_ref(),
            _ => None,
        }
    }

    pub fn mode(&self) -> VisualizationMode {
        VisualizationMode::resolve(self.active_project(), self.visualization)
    }

    pub fn style_inputs(&self) -> StyleInputs {
        StyleInputs {
            project: self.active_project().cloned(),
            level: self.resolution().level,
            mode: self.mode(),
            average: self.average,
            selected_feature: self.selected_feature.clone(),
            score_shown: self.score_shown,
            credential: self.credential.clone(),
            preview: self.preview.clone(),
        }
    }

    pub fn apply(&mut self, command: Command) -> Vec<Effect> {
        match command {
            Command::SetZoom(zoom) => {
                if !zoom.is_finite() || zoom == self.zoom {
                    return vec![];
                }
                self.zoom = zoom;
                vec![Effect::RebuildThrottled]
            }
            Command::SetToggles(toggles) => self.set(|s| &mut s.toggles, toggles),
            Command::SetVisualization(v) => self.set(|s| &mut s.visualization, v),
            Command::SetAverage(a) => self.set(|s| &mut s.average, a),
            Command::SelectFeature(id) => self.set(|s| &mut s.selected_feature, id),
            Command::SetScoreShown(shown) => self.set(|s| &mut s.score_shown, shown),
            Command::SetCredential(c) => self.set(|s| &mut s.credential, c),
            Command::SetPreview(p) => self.set(|s| &mut s.preview, p),
            Command::SelectProject(project) => self.begin_project(project),
            Command::ResetProject => {
                self.generation += 1;
                self.clear_project();
                vec![Effect::PhaseChanged(Phase::Idle), Effect::RebuildNow]
            }
            Command::StartComparison => {
                if self.phase != Phase::Active || self.comparison.active {
                    return vec![];
                }
                self.comparison = ComparisonState { active: true, stop_requested: false };
                vec![Effect::ComparisonStarted]
            }
            Command::StopComparison => {
                if !self.comparison.active {
                    return vec![];
                }
                self.comparison = ComparisonState { active: false, stop_requested: true };
                vec![Effect::ComparisonStopped]
            }
            Command::FitTo { bounds, kind, max_zoom } => {
                if !bounds.is_valid() {
                    return vec![];
                }
                vec![Effect::Fit { bounds, kind, max_zoom }]
            }
        }
    }

    /// Bounds for `generation` arrived. Returns `None` when the result is stale.
    pub fn bounds_loaded(&mut self, generation: u64, bounds: Option<BoundingBox>) -> Option<Vec<Effect>> {
        if generation != self.generation || self.phase != Phase::Loading {
            return None;
        }
        Some(match bounds {
            Some(bounds) => {
                self.phase = Phase::Active;
                self.bounds = Some(bounds);
                vec![
                    Effect::PhaseChanged(Phase::Active),
                    Effect::RebuildNow,
                    Effect::Fit { bounds, kind: FitKind::Initial, max_zoom: None },
                ]
            }
            None => {
                self.clear_project();
                vec![Effect::PhaseChanged(Phase::Idle)]
            }
        })
    }

    pub fn clear_comparison_signal(&mut self) -> bool {
        std::mem::replace(&mut self.comparison.stop_requested, false)
    }

    fn begin_project(&mut self, project: Project) -> Vec<Effect> {
        self.generation += 1;
        let was_active = self.phase == Phase::Active;
        self.clear_project();

        let Some(credential) = self.credential.clone() else {
            return vec![Effect::PhaseChanged(Phase::Idle), Effect::RebuildNow];
        };

        self.project = Some(project.clone());
        self.phase = Phase::Loading;
        let mut effects = vec![
            Effect::PhaseChanged(Phase::Loading),
            Effect::LoadBounds { project, generation: self.generation, credential },
        ];
        if was_active {
            // drop the previous project's layers right away
            effects.push(Effect::RebuildNow);
        }
        effects
    }

    fn clear_project(&mut self) {
        self.project = None;
        self.phase = Phase::Idle;
        self.bounds = None;
        self.selected_feature = None;
        self.comparison = ComparisonState::default();
    }

    fn set<T: PartialEq>(&mut self, field: impl FnOnce(&mut Self) -> &mut T, value: T) -> Vec<Effect> {
        let slot = field(self);
        if *slot == value {
            return vec![];
        }
        *slot = value;
        vec![Effect::RebuildNow]
    }
}
