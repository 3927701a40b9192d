//! Effect data model: the engine-owned record and the caller-facing descriptor.
//!
//! Lifecycle per effect: created by an insert, `ACTIVE` while stored, then
//! terminal on expiry (countdown reached zero) or explicit removal. Removal
//! from the store is the single finalize point; whoever removes the record
//! owns announcing it, which is what makes finalization idempotent when a
//! tick expiry races a manual removal.
mod apply;
mod kind;
mod payload;
mod store;
mod ticker;

pub use apply::{ApplyOutcome, EffectTarget, PayloadApplier};
pub use kind::{CATALOG, EffectKind, KindEntry, Stat};
pub use payload::EffectPayload;
pub use store::EffectStore;
pub use ticker::{TickPass, TickScheduler};

use std::fmt;
use std::time::Duration;

use crate::state::TargetId;

/// Unique identifier for an effect. Never reused within a store's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectId(pub u64);

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "effect#{}", self.0)
    }
}

/// A temporary modifier attached to a player or NPC for a bounded duration.
///
/// Owned exclusively by the [`EffectStore`]; target entities never hold a
/// reference to it. Anything handed out by the store or carried on an event
/// is a clone.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Effect {
    pub id: EffectId,
    pub kind: EffectKind,
    pub name: String,
    pub description: String,
    pub target: TargetId,
    /// Caster or origin, for attribution and logging.
    pub source: Option<TargetId>,
    /// Total world-tick budget granted at creation.
    pub duration_ticks: u64,
    /// Remaining world-tick budget. Zero is terminal.
    pub remaining_ticks: u64,
    /// Apply the payload once every N world ticks, when present.
    pub tick_interval: Option<u64>,
    /// Apply the payload on an independent wall-clock cadence, when present.
    ///
    /// Orthogonal to `tick_interval`: an effect may have a tick-based
    /// lifespan and a real-time application cadence at the same time.
    pub real_time_interval: Option<Duration>,
    pub payload: EffectPayload,
}

impl Effect {
    /// True when the wall-clock timer owns this effect's countdown.
    ///
    /// A timer-owned effect spends one duration unit per firing, so
    /// `duration_ticks = 1` with an interval of N milliseconds reads "apply
    /// once, after N milliseconds, then expire": a one-shot delayed effect.
    pub fn timer_owns_countdown(&self) -> bool {
        self.real_time_interval.is_some() && self.tick_interval.is_none()
    }

    /// True when the world-tick pass owns this effect's countdown.
    pub fn tick_owns_countdown(&self) -> bool {
        !self.timer_owns_countdown()
    }
}

/// Everything a caller provides to create an effect.
///
/// Mirrors [`Effect`] minus the engine-assigned `id` and `remaining_ticks`.
/// The engine assumes descriptors are pre-validated; [`Self::validate`] is
/// the check callers run at their own boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectDescriptor {
    pub kind: EffectKind,
    pub name: String,
    /// Display description; when left empty the store fills it in from the
    /// kind catalog using the payload's primary magnitude.
    pub description: String,
    pub target: TargetId,
    pub source: Option<TargetId>,
    pub duration_ticks: u64,
    pub tick_interval: Option<u64>,
    pub real_time_interval: Option<Duration>,
    pub payload: EffectPayload,
}

impl EffectDescriptor {
    /// Starts a descriptor with catalog display strings and a once-per-tick
    /// application cadence.
    pub fn new(kind: EffectKind, target: TargetId, duration_ticks: u64) -> Self {
        Self {
            kind,
            name: kind.display_name().to_string(),
            description: String::new(),
            target,
            source: None,
            duration_ticks,
            tick_interval: Some(1),
            real_time_interval: None,
            payload: EffectPayload::new(),
        }
    }

    /// One-shot delayed effect: apply once after `delay`, then expire,
    /// independent of how many world ticks elapse meanwhile.
    pub fn one_shot(kind: EffectKind, target: TargetId, delay: Duration) -> Self {
        Self {
            duration_ticks: 1,
            tick_interval: None,
            real_time_interval: Some(delay),
            ..Self::new(kind, target, 1)
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: TargetId) -> Self {
        self.source = Some(source);
        self
    }

    /// Applies the payload once every `ticks` world ticks instead of every tick.
    #[must_use]
    pub fn every_n_ticks(mut self, ticks: u64) -> Self {
        self.tick_interval = Some(ticks);
        self
    }

    /// No periodic payload; the effect only contributes derived views
    /// (stat modifiers, block flags) while its countdown runs.
    #[must_use]
    pub fn passive(mut self) -> Self {
        self.tick_interval = None;
        self
    }

    /// Adds a wall-clock application cadence on top of whatever tick
    /// scheduling the descriptor already carries.
    #[must_use]
    pub fn with_real_time_interval(mut self, interval: Duration) -> Self {
        self.real_time_interval = Some(interval);
        self
    }

    #[must_use]
    pub fn with_payload(mut self, payload: EffectPayload) -> Self {
        self.payload = payload;
        self
    }

    /// Boundary check for caller-assembled descriptors.
    ///
    /// The engine never runs this itself: by the time a descriptor reaches
    /// the store it is assumed well-formed, and `add_effect` never fails.
    pub fn validate(&self) -> Result<(), DescriptorError> {
        if self.duration_ticks == 0 {
            return Err(DescriptorError::ZeroDuration);
        }
        if self.tick_interval == Some(0) {
            return Err(DescriptorError::ZeroTickInterval);
        }
        if self.real_time_interval == Some(Duration::ZERO) {
            return Err(DescriptorError::ZeroRealTimeInterval);
        }
        Ok(())
    }
}

/// Why a descriptor failed pre-validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DescriptorError {
    #[error("duration must be at least one tick")]
    ZeroDuration,
    #[error("tick interval must be at least one tick when present")]
    ZeroTickInterval,
    #[error("real-time interval must be non-zero when present")]
    ZeroRealTimeInterval,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poison(target: TargetId) -> EffectDescriptor {
        EffectDescriptor::new(EffectKind::Poison, target, 3)
            .with_payload(EffectPayload::new().with_damage_per_tick(5))
    }

    #[test]
    fn clock_ownership_follows_cadence_fields() {
        let target = TargetId::npc(7);

        let tick_only = poison(target.clone());
        let one_shot =
            EffectDescriptor::one_shot(EffectKind::Stun, target.clone(), Duration::from_secs(3));
        let both = poison(target).with_real_time_interval(Duration::from_millis(500));

        let mut store = EffectStore::new();
        let a = store.insert(tick_only);
        let b = store.insert(one_shot);
        let c = store.insert(both);

        assert!(store.get(a).is_some_and(Effect::tick_owns_countdown));
        assert!(store.get(b).is_some_and(Effect::timer_owns_countdown));
        assert!(store.get(c).is_some_and(Effect::tick_owns_countdown));
    }

    #[test]
    fn validate_rejects_degenerate_cadences() {
        let target = TargetId::player("alric");
        assert!(poison(target.clone()).validate().is_ok());

        let mut zero_duration = poison(target.clone());
        zero_duration.duration_ticks = 0;
        assert_eq!(
            zero_duration.validate(),
            Err(DescriptorError::ZeroDuration)
        );

        assert_eq!(
            poison(target.clone()).every_n_ticks(0).validate(),
            Err(DescriptorError::ZeroTickInterval)
        );
        assert_eq!(
            poison(target)
                .with_real_time_interval(Duration::ZERO)
                .validate(),
            Err(DescriptorError::ZeroRealTimeInterval)
        );
    }
}
