//! Controller Event Bus
//!
//! Pub/sub for everything the controller tells the outside world beyond the
//! style itself: lifecycle, fit-bounds commands, comparison pulses.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::state::Phase;
use crate::model::{ResolutionLevel, VisualizationMode};
use crate::resolution::ResolutionChoice;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ControllerEvent {
    PhaseChanged { phase: Phase },
    /// A new style was published on the style channel
    StyleUpdated { revision: u64, level: ResolutionLevel, mode: VisualizationMode },
    ResolutionChanged(ResolutionChoice),
    /// Renderer should animate to these bounds
    FitBounds {
        bounds: [[f64; 2]; 2],
        padding: u32,
        duration_ms: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_zoom: Option<f64>,
    },
    ComparisonStarted,
    ComparisonStopped,
    /// One-shot stop signal cleared
    ComparisonReset,
    BoundsFailed { project: u64, message: String },
    StaleResponseDropped { generation: u64, current: u64 },
}

pub struct EventBus {
    tx: broadcast::Sender<ControllerEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1024);
        Self { tx }
    }

    /// Publish to all current subscribers; nobody listening is fine.
    pub fn publish(&self, event: ControllerEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ControllerEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_subscribe() {
        let bus = EventBus::new();
        bus.publish(ControllerEvent::ComparisonStarted); // dropped, no subscriber yet
        let mut rx = bus.subscribe();
        bus.publish(ControllerEvent::ComparisonStopped);
        assert_eq!(rx.recv().await.unwrap(), ControllerEvent::ComparisonStopped);
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(ControllerEvent::FitBounds {
            bounds: [[5.9, 47.3], [15.0, 55.1]],
            padding: 50,
            duration_ms: 2000,
            max_zoom: None,
        })
        .unwrap();
        assert_eq!(json["type"], "FitBounds");
        assert_eq!(json["payload"]["padding"], 50);
        assert!(json["payload"].get("max_zoom").is_none());
    }
}
