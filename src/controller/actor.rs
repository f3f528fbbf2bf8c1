//! The single owner of `ViewState`.
//!
//! Commands arrive over one mpsc queue and are applied in order. Results of
//! async fetches re-enter through the same queue tagged with the project
//! generation they were started for.

use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

use super::events::{ControllerEvent, EventBus};
use super::state::{Command, ComparisonState, Effect, FitKind, Phase, ViewState};
use super::throttle::TrailingThrottle;
use crate::backend::{Credential, MapBackend};
use crate::config::MaprConfig;
use crate::error::MaprError;
use crate::model::{BoundingBox, Project};
use crate::resolution::ResolutionChoice;
use crate::style::{MapStyleSpec, StyleBuilder, StyleInputs};

/// A published style with its position in the emission sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleFrame {
    pub revision: u64,
    pub style: MapStyleSpec,
}

pub(crate) enum Msg {
    Command(Command),
    BoundsLoaded { generation: u64, result: Result<BoundingBox, MaprError> },
}

/// Write halves of the channels the controller handle reads from.
pub(crate) struct Outputs {
    pub style: watch::Sender<Arc<StyleFrame>>,
    pub state: watch::Sender<Arc<ViewState>>,
    pub resolution: watch::Sender<ResolutionChoice>,
    pub comparison: watch::Sender<ComparisonState>,
    pub events: Arc<EventBus>,
}

pub(crate) struct Actor {
    state: ViewState,
    builder: StyleBuilder,
    backend: Arc<dyn MapBackend>,
    config: MaprConfig,
    throttle: TrailingThrottle,
    comparison_reset_at: Option<Instant>,
    last_inputs: StyleInputs,
    revision: u64,
    rx: mpsc::Receiver<Msg>,
    tx: mpsc::WeakSender<Msg>,
    out: Outputs,
}

impl Actor {
    pub fn new(
        config: MaprConfig,
        backend: Arc<dyn MapBackend>,
        rx: mpsc::Receiver<Msg>,
        tx: mpsc::WeakSender<Msg>,
        out: Outputs,
        state: ViewState,
        initial_inputs: StyleInputs,
    ) -> Self {
        Self {
            builder: StyleBuilder::new(&config),
            throttle: TrailingThrottle::new(config.throttle()),
            config,
            backend,
            state,
            comparison_reset_at: None,
            last_inputs: initial_inputs,
            revision: 0,
            rx,
            tx,
            out,
        }
    }

    pub async fn run(mut self) {
        debug!("Map view controller started");
        loop {
            let throttle_at = self.throttle.deadline();
            let reset_at = self.comparison_reset_at;

            tokio::select! {
                biased;
                msg = self.rx.recv() => match msg {
                    Some(msg) => self.handle(msg),
                    None => break,
                },
                _ = wait_until(throttle_at) => {
                    if self.throttle.take_due(Instant::now()) {
                        self.rebuild("zoom");
                    }
                }
                _ = wait_until(reset_at) => {
                    self.comparison_reset_at = None;
                    if self.state.clear_comparison_signal() {
                        self.out.comparison.send_replace(self.state.comparison);
                        self.out.events.publish(ControllerEvent::ComparisonReset);
                        self.publish_state();
                    }
                }
            }
        }
        debug!("Map view controller stopped");
    }

    fn handle(&mut self, msg: Msg) {
        let effects = match msg {
            Msg::Command(command) => {
                debug!("Command: {:?}", command);
                self.state.apply(command)
            }
            Msg::BoundsLoaded { generation, result } => self.bounds_loaded(generation, result),
        };

        for effect in effects {
            self.run_effect(effect);
        }
        self.publish_state();
    }

    fn bounds_loaded(&mut self, generation: u64, result: Result<BoundingBox, MaprError>) -> Vec<Effect> {
        let project_id = self.state.project.as_ref().map(|p| p.id).unwrap_or_default();
        let bounds = match result {
            Ok(bounds) => Some(bounds),
            Err(e) if generation == self.state.generation => {
                warn!("Bounds fetch for project {} failed: {}", project_id, e);
                self.out.events.publish(ControllerEvent::BoundsFailed { project: project_id, message: e.to_string() });
                None
            }
            Err(_) => None,
        };

        match self.state.bounds_loaded(generation, bounds) {
            Some(effects) => effects,
            None => {
                debug!("Dropping stale bounds (generation {} vs {})", generation, self.state.generation);
                self.out.events.publish(ControllerEvent::StaleResponseDropped {
                    generation,
                    current: self.state.generation,
                });
                vec![]
            }
        }
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::RebuildNow => self.rebuild("input"),
            Effect::RebuildThrottled => {
                let at = self.throttle.request(Instant::now());
                debug!("Style rebuild deferred by {:?}", at.saturating_duration_since(Instant::now()));
            }
            Effect::LoadBounds { project, generation, credential } => self.load_bounds(project, generation, credential),
            Effect::PhaseChanged(phase) => {
                if phase == Phase::Active {
                    if let Some(p) = &self.state.project {
                        info!("🗺️ Project {} ({}) active", p.id, p.name);
                    }
                }
                self.out.events.publish(ControllerEvent::PhaseChanged { phase });
                let comparison = self.state.comparison;
                self.out.comparison.send_if_modified(|c| {
                    let changed = *c != comparison;
                    *c = comparison;
                    changed
                });
            }
            Effect::ComparisonStarted => {
                self.comparison_reset_at = None;
                self.out.comparison.send_replace(self.state.comparison);
                self.out.events.publish(ControllerEvent::ComparisonStarted);
            }
            Effect::ComparisonStopped => {
                self.comparison_reset_at = Some(Instant::now() + self.config.comparison_reset());
                self.out.comparison.send_replace(self.state.comparison);
                self.out.events.publish(ControllerEvent::ComparisonStopped);
            }
            Effect::Fit { bounds, kind, max_zoom } => self.fit(bounds, kind, max_zoom),
        }
    }

    fn load_bounds(&self, project: Project, generation: u64, credential: Credential) {
        let Some(tx) = self.tx.upgrade() else {
            return;
        };
        let backend = self.backend.clone();
        info!("Loading bounds for project {} (generation {})", project.id, generation);

        tokio::spawn(async move {
            let result = backend.fetch_bounds(&project, &credential).await;
            let _ = tx.send(Msg::BoundsLoaded { generation, result }).await;
        });
    }

    fn fit(&self, bounds: BoundingBox, kind: FitKind, max_zoom: Option<f64>) {
        let duration = kind.duration(
            std::time::Duration::from_millis(self.config.fit_duration_initial_ms),
            std::time::Duration::from_millis(self.config.fit_duration_recenter_ms),
        );
        self.out.events.publish(ControllerEvent::FitBounds {
            bounds: bounds.corners(),
            padding: self.config.fit_padding_px,
            duration_ms: duration.as_millis() as u64,
            max_zoom,
        });
    }

    /// Build and publish unless nothing the style depends on has changed.
    /// The resolution is published here so it never runs ahead of the style.
    fn rebuild(&mut self, reason: &str) {
        let inputs = self.state.style_inputs();
        if inputs == self.last_inputs {
            debug!("Style inputs unchanged ({}), skipping rebuild", reason);
            self.publish_resolution();
            return;
        }

        let style = self.builder.build(&inputs);
        self.revision += 1;
        debug!("Publishing style revision {} ({})", self.revision, reason);

        self.out.style.send_replace(Arc::new(StyleFrame { revision: self.revision, style }));
        self.out.events.publish(ControllerEvent::StyleUpdated {
            revision: self.revision,
            level: inputs.level,
            mode: inputs.mode,
        });
        self.last_inputs = inputs;
        self.publish_resolution();
    }

    fn publish_resolution(&self) {
        let choice = self.state.resolution();
        let changed = self.out.resolution.send_if_modified(|current| {
            if *current == choice {
                return false;
            }
            *current = choice;
            true
        });
        if changed {
            self.out.events.publish(ControllerEvent::ResolutionChanged(choice));
        }
    }

    fn publish_state(&self) {
        self.out.state.send_replace(Arc::new(self.state.clone()));
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => std::future::pending().await,
    }
}
