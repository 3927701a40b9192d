//! Runtime orchestration for the temporary-effect engine.
//!
//! This crate wires the deterministic `game-core` store and tick pass to
//! wall-clock timers, late-bound target resolution, and a topic-based event
//! bus. Subsystems that cast or react to effects (combat, movement, UI)
//! embed [`EffectManager`] and depend only on the two lifecycle events it
//! publishes.
//!
//! Modules are organized by responsibility:
//! - [`manager`] hosts the facade every other subsystem calls
//! - [`events`] provides the topic-based event bus for effect notifications
//! - [`resolver`] late-binds target ids to live sessions and NPC instances
//! - `scheduler` keeps the per-effect wall-clock timers internal to the crate
pub mod error;
pub mod events;
pub mod manager;
pub mod resolver;

mod scheduler;

pub use error::{Result, RuntimeError};
pub use events::{EffectEvent, Event, EventBus, RemovalReason, Topic, VitalsEvent};
pub use manager::{EffectManager, RuntimeConfig};
pub use resolver::{NpcInstance, PlayerSession, RoomId, TargetResolver, WorldRegistry};
