//! Clamped payload application against a resolved target.

use super::Effect;
use crate::state::ResourceMeter;

/// Mutable view of a resolved target's vital resources.
///
/// The seam between the engine and user/NPC management: player sessions and
/// NPC instances implement this, and the engine only ever touches health
/// through it.
pub trait EffectTarget {
    fn health(&self) -> ResourceMeter;
    fn set_health(&mut self, meter: ResourceMeter);
}

/// What one payload application did to the target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub damage_dealt: u32,
    pub healing_done: u32,
    /// Health reached zero during this application. What that means
    /// (unconscious, dead) is the combat subsystem's call; the engine only
    /// reports it upward.
    pub health_depleted: bool,
}

/// Computes and applies one effect's numeric delta to a resolved target.
///
/// Only `damage_per_tick` and `heal_per_tick` pass through here. Stat
/// modifiers and block flags are derived views over the effect store, so
/// concurrent effects compose and unwind correctly without ever mutating the
/// target's permanent fields.
#[derive(Clone, Copy, Debug, Default)]
pub struct PayloadApplier;

impl PayloadApplier {
    pub fn new() -> Self {
        Self
    }

    /// Applies the effect's health deltas, clamped to `[0, maximum]`.
    pub fn apply(&self, effect: &Effect, target: &mut dyn EffectTarget) -> ApplyOutcome {
        let mut meter = target.health();
        let was_depleted = meter.is_depleted();
        let mut outcome = ApplyOutcome::default();

        if let Some(amount) = effect.payload.damage_per_tick {
            outcome.damage_dealt = meter.damage(amount);
        }
        if let Some(amount) = effect.payload.heal_per_tick {
            outcome.healing_done = meter.heal(amount);
        }
        outcome.health_depleted = !was_depleted && meter.is_depleted();

        target.set_health(meter);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::{EffectDescriptor, EffectKind, EffectPayload, EffectStore};
    use crate::state::TargetId;

    struct Dummy(ResourceMeter);

    impl EffectTarget for Dummy {
        fn health(&self) -> ResourceMeter {
            self.0
        }
        fn set_health(&mut self, meter: ResourceMeter) {
            self.0 = meter;
        }
    }

    fn stored(descriptor: EffectDescriptor) -> Effect {
        let mut store = EffectStore::new();
        let id = store.insert(descriptor);
        store.remove(id).unwrap()
    }

    #[test]
    fn damage_reports_depletion_exactly_once() {
        let effect = stored(
            EffectDescriptor::new(EffectKind::Poison, TargetId::npc(1), 3)
                .with_payload(EffectPayload::new().with_damage_per_tick(5)),
        );
        let mut target = Dummy(ResourceMeter::new(8, 20));
        let applier = PayloadApplier::new();

        let first = applier.apply(&effect, &mut target);
        assert_eq!(first.damage_dealt, 5);
        assert!(!first.health_depleted);

        let second = applier.apply(&effect, &mut target);
        assert_eq!(second.damage_dealt, 3);
        assert!(second.health_depleted);

        // already at zero; nothing further to report
        let third = applier.apply(&effect, &mut target);
        assert_eq!(third.damage_dealt, 0);
        assert!(!third.health_depleted);
    }

    #[test]
    fn heal_never_exceeds_maximum() {
        let effect = stored(
            EffectDescriptor::new(EffectKind::HealOverTime, TargetId::npc(1), 3)
                .with_payload(EffectPayload::new().with_heal_per_tick(500)),
        );
        let mut target = Dummy(ResourceMeter::new(10, 30));
        let outcome = PayloadApplier::new().apply(&effect, &mut target);
        assert_eq!(outcome.healing_done, 20);
        assert_eq!(target.0.current, 30);
    }

    #[test]
    fn stat_only_payload_leaves_health_alone() {
        let effect = stored(
            EffectDescriptor::new(EffectKind::StrengthBuff, TargetId::player("alric"), 5)
                .passive()
                .with_payload(
                    EffectPayload::new().with_stat_modifier(super::super::Stat::Strength, 4),
                ),
        );
        let mut target = Dummy(ResourceMeter::new(12, 20));
        let outcome = PayloadApplier::new().apply(&effect, &mut target);
        assert_eq!(outcome, ApplyOutcome::default());
        assert_eq!(target.0.current, 12);
    }
}
