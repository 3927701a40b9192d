//! Topic-based event bus for effect notifications.
mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{EffectEvent, RemovalReason, VitalsEvent};
