//! Deterministic core of the temporary-effect engine.
//!
//! `game-core` owns the effect data model, the authoritative per-target
//! [`effect::EffectStore`], the once-per-tick scheduling pass, and the clamped
//! payload arithmetic. It has no clocks and no I/O: everything here is a pure
//! function of its inputs, so the same sequence of inserts, removals, and tick
//! advances always produces the same state. The `runtime` crate layers
//! wall-clock timers, late-bound target resolution, and event publishing on
//! top of the types re-exported here.
pub mod effect;
pub mod state;

pub use effect::{
    ApplyOutcome, CATALOG, DescriptorError, Effect, EffectDescriptor, EffectId, EffectKind,
    EffectPayload, EffectStore, EffectTarget, KindEntry, PayloadApplier, Stat, TickPass,
    TickScheduler,
};
pub use state::{ResourceMeter, TargetId, Tick};
