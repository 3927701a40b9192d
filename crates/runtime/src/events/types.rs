//! Event payloads published by the effect engine.

use game_core::{Effect, EffectId, TargetId};
use serde::{Deserialize, Serialize};

/// Why an effect left the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalReason {
    /// Natural countdown reached zero.
    Expired,
    /// Explicit removal by a caller.
    Dispelled,
}

/// Effect lifecycle notifications.
///
/// These two events are the only integration surface external modules may
/// depend on. Handlers must be idempotent and must tolerate the target
/// having already vanished by the time they run; the carried effect is a
/// clone, so handlers can inspect it without racing the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EffectEvent {
    /// An effect was stored and its scheduling armed.
    Added { effect: Effect },
    /// An effect was finalized. Emitted exactly once per effect.
    Removed {
        effect: Effect,
        reason: RemovalReason,
    },
}

/// Vital-resource consequences reported upward.
///
/// The engine clamps health at zero but never decides what depletion means;
/// combat and user management subscribe here for that call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum VitalsEvent {
    /// A periodic payload drained the target's last hit point.
    HealthDepleted {
        target: TargetId,
        effect: EffectId,
        source: Option<TargetId>,
    },
}
