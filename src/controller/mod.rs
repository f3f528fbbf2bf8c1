//! Map View Controller
//!
//! Owns the view state and turns user actions into style documents. The
//! controller runs as a task; this handle is cheap to clone and is the only
//! way in. Everything it publishes is available both as the latest value
//! (watch channels) and as a stream of events (broadcast).

pub mod actor;
pub mod events;
pub mod state;
pub mod throttle;

pub use actor::StyleFrame;
pub use events::{ControllerEvent, EventBus};
pub use state::{Command, ComparisonState, Effect, FitKind, Phase, ViewState, INITIAL_ZOOM};
pub use throttle::TrailingThrottle;

use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};
use tracing::debug;

use crate::aggregation::{AggregationEngine, CategorySort, ChartSummary};
use crate::backend::MapBackend;
use crate::config::MaprConfig;
use crate::error::{MaprError, Result};
use crate::resolution::ResolutionChoice;
use crate::style::{MapStyleSpec, StyleBuilder};
use actor::{Actor, Msg, Outputs};

const COMMAND_QUEUE: usize = 256;

#[derive(Clone)]
pub struct MapViewController {
    tx: mpsc::Sender<Msg>,
    backend: Arc<dyn MapBackend>,
    style: watch::Receiver<Arc<StyleFrame>>,
    state: watch::Receiver<Arc<ViewState>>,
    resolution: watch::Receiver<ResolutionChoice>,
    comparison: watch::Receiver<ComparisonState>,
    events: Arc<EventBus>,
}

impl MapViewController {
    /// Start the controller task. Must be called inside a tokio runtime.
    ///
    /// The base style (basemap and labels, no data) is available immediately
    /// as revision 0.
    pub fn spawn(config: MaprConfig, backend: Arc<dyn MapBackend>) -> Self {
        let state = ViewState::default();
        let inputs = state.style_inputs();
        let base = StyleBuilder::new(&config).build(&inputs);

        let (style_tx, style_rx) = watch::channel(Arc::new(StyleFrame { revision: 0, style: base }));
        let (state_tx, state_rx) = watch::channel(Arc::new(state.clone()));
        let (resolution_tx, resolution_rx) = watch::channel(state.resolution());
        let (comparison_tx, comparison_rx) = watch::channel(state.comparison);
        let events = Arc::new(EventBus::new());

        let (tx, rx) = mpsc::channel(COMMAND_QUEUE);
        let outputs = Outputs {
            style: style_tx,
            state: state_tx,
            resolution: resolution_tx,
            comparison: comparison_tx,
            events: events.clone(),
        };
        let actor = Actor::new(config, backend.clone(), rx, tx.downgrade(), outputs, state, inputs);
        tokio::spawn(actor.run());

        Self {
            tx,
            backend,
            style: style_rx,
            state: state_rx,
            resolution: resolution_rx,
            comparison: comparison_rx,
            events,
        }
    }

    pub async fn send(&self, command: Command) -> Result<()> {
        self.tx
            .send(Msg::Command(command))
            .await
            .map_err(|_| MaprError::ControllerClosed)
    }

    /// Latest style; `changed()` on the receiver wakes on every emission.
    pub fn style(&self) -> watch::Receiver<Arc<StyleFrame>> {
        self.style.clone()
    }

    pub fn current_style(&self) -> MapStyleSpec {
        self.style.borrow().style.clone()
    }

    pub fn state(&self) -> watch::Receiver<Arc<ViewState>> {
        self.state.clone()
    }

    pub fn resolution(&self) -> watch::Receiver<ResolutionChoice> {
        self.resolution.clone()
    }

    pub fn comparison(&self) -> watch::Receiver<ComparisonState> {
        self.comparison.clone()
    }

    pub fn events(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    /// Fetch and aggregate sub-scores for one feature of the active project.
    ///
    /// Fails with `Stale` if the project changed while the request was out.
    pub async fn analyze_feature(&self, feature_id: &str, sort: CategorySort) -> Result<ChartSummary> {
        let snapshot = self.state.borrow().clone();
        let (Some(project), Some(credential)) = (snapshot.active_project(), snapshot.credential.as_ref()) else {
            return Err(MaprError::NoProject);
        };
        let level = snapshot.resolution().level;

        debug!("Analyzing feature {} of project {} at {}", feature_id, project.id, level);
        let detail = self.backend.fetch_detail(project, feature_id, level, credential).await?;

        let current = self.state.borrow().generation;
        if current != snapshot.generation {
            return Err(MaprError::Stale { got: snapshot.generation, current });
        }

        let engine = AggregationEngine::new(snapshot.average);
        Ok(ChartSummary::build(&engine, &detail, sort))
    }
}
