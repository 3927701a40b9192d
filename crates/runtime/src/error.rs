//! Runtime error types.
//!
//! The effect API proper (`add_effect`, `remove_effect`, the snapshot and
//! derived-view queries) is infallible: failure paths there are
//! return values or skipped cycles, never errors. These variants cover the
//! registry seams where a caller names an entity that is not there.

/// Errors surfaced at the runtime's collaborator seams.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    /// No connected session for the named player.
    #[error("no connected session for player {0}")]
    SessionNotFound(String),

    /// The NPC instance is not spawned in any room.
    #[error("npc instance #{0} is not spawned")]
    NpcNotFound(u32),
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
