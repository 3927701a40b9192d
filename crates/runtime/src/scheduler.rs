//! Wall-clock timers for real-time effect cadences.

use std::collections::HashMap;
use std::sync::Mutex;

use game_core::EffectId;
use tokio::task::JoinHandle;

/// One independent timer task per effect.
///
/// Every armed effect owns its own task handle keyed by its never-reused id,
/// so cancelling one effect can never misroute through a shared timer-id
/// keyspace. Aborting the handle stops future firings; the manager's store
/// check under its lock is what makes an already-in-flight firing harmless.
#[derive(Debug, Default)]
pub(crate) struct RealTimeScheduler {
    timers: Mutex<HashMap<EffectId, JoinHandle<()>>>,
}

impl RealTimeScheduler {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registers the task driving `id`'s wall-clock cadence.
    ///
    /// The task sleeps a full period before its first firing, so it cannot
    /// observe the store before this registration completes.
    pub(crate) fn arm(&self, id: EffectId, handle: JoinHandle<()>) {
        if let Some(stale) = self
            .timers
            .lock()
            .expect("timer table lock poisoned")
            .insert(id, handle)
        {
            // Ids are never reused, so a collision is a logic error upstream;
            // abort the stale task rather than leak it.
            stale.abort();
            tracing::warn!(%id, "replaced an already-armed timer");
        }
    }

    /// Aborts the timer for `id`, if armed. No firing can start after this
    /// returns.
    pub(crate) fn cancel(&self, id: EffectId) {
        if let Some(handle) = self
            .timers
            .lock()
            .expect("timer table lock poisoned")
            .remove(&id)
        {
            handle.abort();
        }
    }

    /// Drops the bookkeeping for a timer task that finished on its own.
    pub(crate) fn clear(&self, id: EffectId) {
        self.timers
            .lock()
            .expect("timer table lock poisoned")
            .remove(&id);
    }

    /// Aborts every armed timer.
    pub(crate) fn cancel_all(&self) {
        let mut timers = self.timers.lock().expect("timer table lock poisoned");
        for (_, handle) in timers.drain() {
            handle.abort();
        }
    }

    #[cfg(test)]
    pub(crate) fn armed_count(&self) -> usize {
        self.timers.lock().expect("timer table lock poisoned").len()
    }
}

impl Drop for RealTimeScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cancel_drops_the_handle_and_tolerates_repeats() {
        let timers = RealTimeScheduler::new();
        timers.arm(EffectId(1), tokio::spawn(std::future::pending::<()>()));
        assert_eq!(timers.armed_count(), 1);

        timers.cancel(EffectId(1));
        assert_eq!(timers.armed_count(), 0);
        timers.cancel(EffectId(1));
    }

    #[tokio::test]
    async fn cancel_all_empties_the_table() {
        let timers = RealTimeScheduler::new();
        for id in 1..=3 {
            timers.arm(EffectId(id), tokio::spawn(std::future::pending::<()>()));
        }
        timers.cancel_all();
        assert_eq!(timers.armed_count(), 0);
    }
}
