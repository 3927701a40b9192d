//! The once-per-tick scheduling pass.

use super::{Effect, EffectStore};
use crate::state::Tick;

/// Everything one world tick did to the store.
///
/// `due` holds clones taken at decrement time, so the caller applies payloads
/// against a stable snapshot even for effects that expired in the same pass.
#[derive(Clone, Debug, Default)]
pub struct TickPass {
    /// Effects whose payload is due for application this tick.
    pub due: Vec<Effect>,
    /// Effects whose countdown reached zero; already removed from the store.
    pub expired: Vec<Effect>,
}

/// Advances every tick-owned effect once per discrete world tick.
///
/// The pass runs single-threaded over a snapshot of ids taken up front, so a
/// removal during the pass can neither skip nor double-visit an entry.
/// Timer-owned effects (wall-clock countdown) are not touched here.
#[derive(Debug, Default)]
pub struct TickScheduler {
    last_tick: Option<Tick>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs the pass for `tick`.
    ///
    /// For each tracked effect: decrement `remaining_ticks`, mark the payload
    /// due when the decremented count is a multiple of the tick interval, and
    /// expire at zero. Expiry removes the record; the caller finalizes the
    /// returned entries (timer cancellation, removal events).
    pub fn advance(&mut self, tick: Tick, store: &mut EffectStore) -> TickPass {
        self.last_tick = Some(tick);

        let mut pass = TickPass::default();
        for id in store.tick_owned_ids() {
            let Some(effect) = store.get_mut(id) else {
                continue;
            };
            effect.remaining_ticks = effect.remaining_ticks.saturating_sub(1);

            let due = matches!(
                effect.tick_interval,
                Some(interval) if interval > 0 && effect.remaining_ticks % interval == 0
            );
            if due {
                pass.due.push(effect.clone());
            }

            if effect.remaining_ticks == 0 {
                if let Some(expired) = store.remove(id) {
                    pass.expired.push(expired);
                }
            }
        }
        pass
    }

    /// Last tick this scheduler processed, if any.
    pub fn last_tick(&self) -> Option<Tick> {
        self.last_tick
    }
}
