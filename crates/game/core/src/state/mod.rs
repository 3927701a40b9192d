//! Scalar state types shared across the engine.
mod common;

pub use common::{ResourceMeter, TargetId, Tick};
