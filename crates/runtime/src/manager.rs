//! The effect manager facade.
//!
//! [`EffectManager`] is the one type other subsystems instantiate or call.
//! It owns the authoritative store behind a single lock, drives the tick
//! pass, arms and cancels wall-clock timers, and publishes lifecycle events.
//!
//! Every mutation completes within one lock scope, so snapshot queries can
//! never observe a mid-finalization record, and a cancelled effect can never
//! be touched by a late timer firing: application paths re-check the store
//! under the lock before doing anything.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use game_core::{
    Effect, EffectDescriptor, EffectId, EffectKind, EffectStore, PayloadApplier, Stat, TargetId,
    Tick, TickScheduler,
};
use tokio::sync::broadcast;

use crate::events::{EffectEvent, Event, EventBus, RemovalReason, Topic, VitalsEvent};
use crate::resolver::TargetResolver;
use crate::scheduler::RealTimeScheduler;

/// Runtime-tunable knobs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Per-topic event bus capacity.
    pub event_capacity: usize,
}

impl RuntimeConfig {
    pub const DEFAULT_EVENT_CAPACITY: usize = 100;

    pub fn new() -> Self {
        Self {
            event_capacity: Self::DEFAULT_EVENT_CAPACITY,
        }
    }

    pub fn with_event_capacity(event_capacity: usize) -> Self {
        Self { event_capacity }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether a timer task should keep firing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TimerFire {
    Continue,
    Done,
}

/// Facade combining the store, both schedulers, the payload applier, and the
/// event bus behind the engine's public operations.
///
/// Cheap to clone; clones share the same engine state. The target resolver
/// is injected so the engine stays decoupled from user and room management.
/// `add_effect` must run inside a tokio runtime when the descriptor carries
/// a real-time cadence (it spawns the timer task); everything else is plain
/// synchronous code.
#[derive(Clone)]
pub struct EffectManager {
    inner: Arc<Inner>,
}

struct Inner {
    store: Mutex<EffectStore>,
    ticker: Mutex<TickScheduler>,
    timers: RealTimeScheduler,
    applier: PayloadApplier,
    resolver: Arc<dyn TargetResolver>,
    bus: EventBus,
}

impl EffectManager {
    pub fn new(resolver: Arc<dyn TargetResolver>) -> Self {
        Self::with_config(resolver, RuntimeConfig::default())
    }

    pub fn with_config(resolver: Arc<dyn TargetResolver>, config: RuntimeConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                store: Mutex::new(EffectStore::new()),
                ticker: Mutex::new(TickScheduler::new()),
                timers: RealTimeScheduler::new(),
                applier: PayloadApplier::new(),
                resolver,
                bus: EventBus::with_capacity(config.event_capacity),
            }),
        }
    }

    /// Stores a pre-validated descriptor, arms its wall-clock timer when one
    /// is requested, and announces it.
    ///
    /// Never fails for a well-formed descriptor; callers validate the kind
    /// and cadences at their own boundary before calling.
    pub fn add_effect(&self, descriptor: EffectDescriptor) -> EffectId {
        let period = descriptor.real_time_interval;
        let (id, effect) = {
            let mut store = self.inner.lock_store();
            let id = store.insert(descriptor);
            (id, store.get(id).cloned())
        };

        if let Some(period) = period {
            self.arm_timer(id, period);
        }
        if let Some(effect) = effect {
            tracing::debug!(
                %id,
                kind = %effect.kind,
                target = %effect.target,
                source = ?effect.source,
                duration = effect.duration_ticks,
                "effect added"
            );
            self.inner
                .bus
                .publish(Event::Effect(EffectEvent::Added { effect }));
        }
        id
    }

    /// Finalizes an effect ahead of schedule.
    ///
    /// Cancels any pending timer synchronously and emits `Removed` exactly
    /// once. Returns false for unknown ids with no event and no error;
    /// callers routinely remove speculatively. After this returns, no
    /// further payload application for `id` can occur.
    pub fn remove_effect(&self, id: EffectId) -> bool {
        let removed = self.inner.lock_store().remove(id);
        match removed {
            Some(effect) => {
                self.inner.timers.cancel(id);
                self.inner.publish_removed(effect, RemovalReason::Dispelled);
                true
            }
            None => false,
        }
    }

    /// Removes every active effect of `kind` on the target, emitting one
    /// `Removed` per instance. Returns how many were removed.
    pub fn remove_effects_of_kind(&self, target: &TargetId, kind: EffectKind) -> usize {
        let ids = self.inner.lock_store().ids_of_kind(target, kind);
        ids.into_iter().filter(|id| self.remove_effect(*id)).count()
    }

    /// Advances all tick-owned effects for one world tick.
    ///
    /// Called once per discrete step by the external world tick source. Due
    /// payloads are applied through the resolver while the store stays
    /// locked; an unresolvable target skips its application for this cycle
    /// and the countdown continues regardless.
    pub fn advance(&self, tick: Tick) {
        let (expired, vitals) = {
            let mut ticker = self
                .inner
                .ticker
                .lock()
                .expect("tick scheduler lock poisoned");
            let mut store = self.inner.lock_store();
            let pass = ticker.advance(tick, &mut store);

            let mut vitals = Vec::new();
            for effect in &pass.due {
                let resolved = self.inner.resolver.with_target(&effect.target, &mut |target| {
                    let outcome = self.inner.applier.apply(effect, target);
                    if outcome.health_depleted {
                        vitals.push(VitalsEvent::HealthDepleted {
                            target: effect.target.clone(),
                            effect: effect.id,
                            source: effect.source.clone(),
                        });
                    }
                });
                if !resolved {
                    tracing::debug!(
                        id = %effect.id,
                        target = %effect.target,
                        %tick,
                        "target unresolved, skipping application"
                    );
                }
            }
            (pass.expired, vitals)
        };

        for effect in expired {
            self.inner.timers.cancel(effect.id);
            self.inner.publish_removed(effect, RemovalReason::Expired);
        }
        for event in vitals {
            self.inner.bus.publish(Event::Vitals(event));
        }
    }

    /// Cloned snapshot of a target's active effects; never a live view.
    pub fn effects_for_target(&self, target: &TargetId) -> Vec<Effect> {
        self.inner.lock_store().effects_for(target)
    }

    /// Net stat deltas from every active effect on the target, recomputed
    /// from the live effect list.
    pub fn modifier_totals(&self, target: &TargetId) -> BTreeMap<Stat, i64> {
        self.inner.lock_store().modifier_totals(target)
    }

    pub fn movement_blocked(&self, target: &TargetId) -> bool {
        self.inner.lock_store().blocks_movement(target)
    }

    pub fn combat_blocked(&self, target: &TargetId) -> bool {
        self.inner.lock_store().blocks_combat(target)
    }

    pub fn has_effect(&self, target: &TargetId, kind: EffectKind) -> bool {
        self.inner.lock_store().has_kind(target, kind)
    }

    /// Effects on the target carrying a metadata tag, for consumers that
    /// need to recognize their own effects.
    pub fn effects_tagged(&self, target: &TargetId, tag: &str) -> Vec<Effect> {
        self.inner.lock_store().effects_tagged(target, tag)
    }

    /// Total number of active effects across all targets.
    pub fn active_effect_count(&self) -> usize {
        self.inner.lock_store().len()
    }

    /// Last world tick the engine processed, if any.
    pub fn last_tick(&self) -> Option<Tick> {
        self.inner
            .ticker
            .lock()
            .expect("tick scheduler lock poisoned")
            .last_tick()
    }

    /// Subscribes to a topic; the receiver is the consumer's registration
    /// handle and dropping it tears the registration down.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.inner.bus.subscribe(topic)
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.inner.bus
    }

    fn arm_timer(&self, id: EffectId, period: Duration) {
        let weak = Arc::downgrade(&self.inner);
        let handle = tokio::spawn(async move {
            loop {
                tokio::time::sleep(period).await;
                let Some(inner) = weak.upgrade() else {
                    break;
                };
                match inner.fire_timer(id) {
                    TimerFire::Continue => {}
                    TimerFire::Done => {
                        inner.timers.clear(id);
                        break;
                    }
                }
            }
        });
        self.inner.timers.arm(id, handle);
    }
}

impl Inner {
    fn lock_store(&self) -> MutexGuard<'_, EffectStore> {
        self.store.lock().expect("effect store lock poisoned")
    }

    /// One wall-clock firing for `id`.
    ///
    /// Resolution, application, and countdown bookkeeping all happen under
    /// the store lock. An effect removed before the lock was taken is gone
    /// by now and the firing degrades to a no-op. That store check is what
    /// makes cancellation strict without any handshake with the timer task.
    fn fire_timer(&self, id: EffectId) -> TimerFire {
        let mut expired = None;
        let mut depleted = None;

        let status = {
            let mut store = self.lock_store();
            let Some(effect) = store.get(id).cloned() else {
                return TimerFire::Done;
            };

            let resolved = self.resolver.with_target(&effect.target, &mut |target| {
                let outcome = self.applier.apply(&effect, target);
                if outcome.health_depleted {
                    depleted = Some(VitalsEvent::HealthDepleted {
                        target: effect.target.clone(),
                        effect: id,
                        source: effect.source.clone(),
                    });
                }
            });
            if !resolved {
                tracing::debug!(
                    %id,
                    target = %effect.target,
                    "timer target unresolved, skipping application"
                );
            }

            if effect.timer_owns_countdown() {
                let mut now_expired = false;
                if let Some(live) = store.get_mut(id) {
                    live.remaining_ticks = live.remaining_ticks.saturating_sub(1);
                    now_expired = live.remaining_ticks == 0;
                }
                if now_expired {
                    expired = store.remove(id);
                }
                if expired.is_some() {
                    TimerFire::Done
                } else {
                    TimerFire::Continue
                }
            } else {
                TimerFire::Continue
            }
        };

        if let Some(effect) = expired {
            self.publish_removed(effect, RemovalReason::Expired);
        }
        if let Some(event) = depleted {
            self.bus.publish(Event::Vitals(event));
        }
        status
    }

    fn publish_removed(&self, effect: Effect, reason: RemovalReason) {
        tracing::debug!(
            id = %effect.id,
            kind = %effect.kind,
            target = %effect.target,
            ?reason,
            "effect removed"
        );
        self.bus
            .publish(Event::Effect(EffectEvent::Removed { effect, reason }));
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.timers.cancel_all();
    }
}
