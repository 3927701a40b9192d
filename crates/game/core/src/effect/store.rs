//! The authoritative map from target to its active effects.

use std::collections::{BTreeMap, HashMap};

use super::{Effect, EffectDescriptor, EffectId, EffectKind, Stat};
use crate::state::TargetId;

/// Per-target effect buckets plus an id index for O(1) removal.
///
/// One store is owned by one manager and passed by reference to everything
/// that needs it; nothing in the crate keeps ambient global state. Buckets
/// accumulate: multiple concurrent effects of the same kind coexist, and the
/// derived views below recompute from the live list on every query so a
/// partially-expiring stack unwinds correctly.
#[derive(Debug, Default)]
pub struct EffectStore {
    buckets: HashMap<TargetId, Vec<Effect>>,
    index: HashMap<EffectId, TargetId>,
    next_id: u64,
}

impl EffectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Materializes a descriptor into an active effect and stores it.
    ///
    /// Ids are assigned monotonically and never reused. The remaining budget
    /// starts at the full duration; an empty description is filled in from
    /// the kind catalog. Never fails for a well-formed descriptor.
    pub fn insert(&mut self, descriptor: EffectDescriptor) -> EffectId {
        self.next_id += 1;
        let id = EffectId(self.next_id);

        let description = if descriptor.description.is_empty() {
            descriptor.kind.describe(descriptor.payload.magnitude())
        } else {
            descriptor.description
        };

        let effect = Effect {
            id,
            kind: descriptor.kind,
            name: descriptor.name,
            description,
            target: descriptor.target,
            source: descriptor.source,
            duration_ticks: descriptor.duration_ticks,
            remaining_ticks: descriptor.duration_ticks,
            tick_interval: descriptor.tick_interval,
            real_time_interval: descriptor.real_time_interval,
            payload: descriptor.payload,
        };

        self.index.insert(id, effect.target.clone());
        self.buckets
            .entry(effect.target.clone())
            .or_default()
            .push(effect);
        id
    }

    /// Removes and returns an effect. Unknown ids are a no-op.
    ///
    /// This is the single finalize point: whoever takes the record out of
    /// the store owns cancelling its timer and announcing the removal.
    pub fn remove(&mut self, id: EffectId) -> Option<Effect> {
        let target = self.index.remove(&id)?;
        let bucket = self.buckets.get_mut(&target)?;
        let position = bucket.iter().position(|effect| effect.id == id)?;
        let effect = bucket.remove(position);
        if bucket.is_empty() {
            self.buckets.remove(&target);
        }
        Some(effect)
    }

    pub fn get(&self, id: EffectId) -> Option<&Effect> {
        let target = self.index.get(&id)?;
        self.buckets
            .get(target)?
            .iter()
            .find(|effect| effect.id == id)
    }

    pub fn get_mut(&mut self, id: EffectId) -> Option<&mut Effect> {
        let target = self.index.get(&id)?;
        self.buckets
            .get_mut(target)?
            .iter_mut()
            .find(|effect| effect.id == id)
    }

    pub fn contains(&self, id: EffectId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Cloned snapshot of a target's active effects, in insertion order.
    ///
    /// Never a live view: callers cannot observe a half-finalized record, and
    /// mutating the snapshot has no consequence for the store.
    pub fn effects_for(&self, target: &TargetId) -> Vec<Effect> {
        self.buckets.get(target).cloned().unwrap_or_default()
    }

    /// Ids of every effect whose countdown the tick pass owns, in id order.
    ///
    /// Id order is creation order, which gives the pass a fixed, total
    /// processing order within a tick.
    pub fn tick_owned_ids(&self) -> Vec<EffectId> {
        let mut ids: Vec<EffectId> = self
            .buckets
            .values()
            .flatten()
            .filter(|effect| effect.tick_owns_countdown())
            .map(|effect| effect.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    // ========================================================================
    // Derived views, recomputed from the live buckets on every query
    // ========================================================================

    /// Net stat deltas from every active effect on the target.
    pub fn modifier_totals(&self, target: &TargetId) -> BTreeMap<Stat, i64> {
        let mut totals = BTreeMap::new();
        for effect in self.buckets.get(target).into_iter().flatten() {
            for (stat, delta) in &effect.payload.stat_modifiers {
                *totals.entry(*stat).or_insert(0i64) += i64::from(*delta);
            }
        }
        totals.retain(|_, total| *total != 0);
        totals
    }

    pub fn blocks_movement(&self, target: &TargetId) -> bool {
        self.buckets
            .get(target)
            .into_iter()
            .flatten()
            .any(|effect| effect.payload.block_movement)
    }

    pub fn blocks_combat(&self, target: &TargetId) -> bool {
        self.buckets
            .get(target)
            .into_iter()
            .flatten()
            .any(|effect| effect.payload.block_combat)
    }

    pub fn has_kind(&self, target: &TargetId, kind: EffectKind) -> bool {
        self.buckets
            .get(target)
            .into_iter()
            .flatten()
            .any(|effect| effect.kind == kind)
    }

    /// Ids of every active effect of `kind` on the target, in insertion order.
    ///
    /// Supports the callers that dispel speculatively: collect, then remove
    /// each id and ignore the ones something else finalized first.
    pub fn ids_of_kind(&self, target: &TargetId, kind: EffectKind) -> Vec<EffectId> {
        self.buckets
            .get(target)
            .into_iter()
            .flatten()
            .filter(|effect| effect.kind == kind)
            .map(|effect| effect.id)
            .collect()
    }

    /// Cloned snapshot of the target's effects carrying a metadata tag.
    pub fn effects_tagged(&self, target: &TargetId, tag: &str) -> Vec<Effect> {
        self.buckets
            .get(target)
            .into_iter()
            .flatten()
            .filter(|effect| effect.payload.metadata.contains(tag))
            .cloned()
            .collect()
    }
}
