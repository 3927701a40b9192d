//! The per-application delta an effect contributes.

use std::collections::{BTreeMap, BTreeSet};

use super::kind::Stat;

/// A union of optional fields; absent fields contribute nothing.
///
/// `damage_per_tick` / `heal_per_tick` are applied to the target's health by
/// the payload applier. `stat_modifiers` and the block flags are never
/// written onto the target: they are summed into derived views recomputed
/// from the live effect list, so concurrent effects compose and unwind
/// correctly on partial expiry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectPayload {
    pub damage_per_tick: Option<u32>,
    pub heal_per_tick: Option<u32>,
    /// Signed deltas per stat, summed across all active effects on a target.
    pub stat_modifiers: BTreeMap<Stat, i32>,
    pub block_movement: bool,
    pub block_combat: bool,
    /// Free-form tags consumers use to recognize their own effects, e.g. a
    /// root spell marking the effect it owns so its event handler can attach
    /// the right restriction message.
    pub metadata: BTreeSet<String>,
}

impl EffectPayload {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_damage_per_tick(mut self, amount: u32) -> Self {
        self.damage_per_tick = Some(amount);
        self
    }

    #[must_use]
    pub fn with_heal_per_tick(mut self, amount: u32) -> Self {
        self.heal_per_tick = Some(amount);
        self
    }

    #[must_use]
    pub fn with_stat_modifier(mut self, stat: Stat, delta: i32) -> Self {
        self.stat_modifiers.insert(stat, delta);
        self
    }

    #[must_use]
    pub fn with_block_movement(mut self) -> Self {
        self.block_movement = true;
        self
    }

    #[must_use]
    pub fn with_block_combat(mut self) -> Self {
        self.block_combat = true;
        self
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.metadata.insert(tag.into());
        self
    }

    /// Returns true if applying this payload could never be observed.
    pub fn is_inert(&self) -> bool {
        self.damage_per_tick.is_none()
            && self.heal_per_tick.is_none()
            && self.stat_modifiers.is_empty()
            && !self.block_movement
            && !self.block_combat
    }

    /// Primary magnitude, used when rendering catalog description templates.
    pub fn magnitude(&self) -> i64 {
        if let Some(amount) = self.damage_per_tick {
            return i64::from(amount);
        }
        if let Some(amount) = self.heal_per_tick {
            return i64::from(amount);
        }
        self.stat_modifiers
            .values()
            .next()
            .map(|delta| i64::from(*delta))
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magnitude_prefers_damage_then_heal_then_stats() {
        let payload = EffectPayload::new()
            .with_damage_per_tick(4)
            .with_heal_per_tick(9);
        assert_eq!(payload.magnitude(), 4);

        let payload = EffectPayload::new().with_stat_modifier(Stat::Agility, -2);
        assert_eq!(payload.magnitude(), -2);

        assert_eq!(EffectPayload::new().magnitude(), 0);
    }

    #[test]
    fn inert_payload_has_no_observable_fields() {
        assert!(EffectPayload::new().is_inert());
        assert!(EffectPayload::new().with_tag("root-spell").is_inert());
        assert!(!EffectPayload::new().with_block_movement().is_inert());
    }
}
