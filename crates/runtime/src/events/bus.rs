//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{EffectEvent, VitalsEvent};

/// Topics for event routing.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Effect lifecycle (added / removed).
    Effect,
    /// Health consequences of payload application.
    Vitals,
}

/// Event wrapper that carries the topic and typed event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    Effect(EffectEvent),
    Vitals(VitalsEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Effect(_) => Topic::Effect,
            Event::Vitals(_) => Topic::Vitals,
        }
    }
}

/// Topic-based event bus.
///
/// Consumers subscribe to a topic and get their own receiver handle back, so
/// each registration and teardown is visible and independently testable.
/// Publishing is best-effort and never blocks: an event with no subscribers
/// is simply dropped.
#[derive(Debug, Clone)]
pub struct EventBus {
    effect_tx: broadcast::Sender<Event>,
    vitals_tx: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic.
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with the given capacity per topic.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            effect_tx: broadcast::channel(capacity).0,
            vitals_tx: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Effect => &self.effect_tx,
            Topic::Vitals => &self.vitals_tx,
        }
    }

    /// Publishes an event to its corresponding topic.
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            tracing::trace!(?topic, "no subscribers for topic, event dropped");
        }
    }

    /// Subscribes to a topic.
    ///
    /// The returned receiver only sees events published to that topic after
    /// this call; dropping it tears the registration down.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    /// Number of live subscribers on a topic.
    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.sender(topic).receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
