//! Late-bound target resolution.
//!
//! Effects store a [`TargetId`]; the live session or NPC instance behind it
//! is looked up at the moment a payload needs to act, never at creation
//! time. A vanished target (disconnect, despawn) skips the application for
//! that cycle while the countdown keeps running, so the effect still expires
//! on schedule.

use std::collections::HashMap;
use std::sync::Mutex;

use game_core::{EffectTarget, ResourceMeter, TargetId};

use crate::error::{Result, RuntimeError};

/// Resolves a target id to a live mutable entity for the duration of one
/// payload application.
///
/// Implementations lock whatever owns the entity, run `apply` against it,
/// and return `false` when the target cannot be resolved. The closure keeps
/// the borrow scoped to the application, so the engine never holds a
/// reference into user or room management across calls.
pub trait TargetResolver: Send + Sync {
    fn with_target(
        &self,
        target: &TargetId,
        apply: &mut dyn FnMut(&mut dyn EffectTarget),
    ) -> bool;
}

/// A connected player session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerSession {
    pub username: String,
    pub health: ResourceMeter,
}

impl EffectTarget for PlayerSession {
    fn health(&self) -> ResourceMeter {
        self.health
    }
    fn set_health(&mut self, meter: ResourceMeter) {
        self.health = meter;
    }
}

pub type RoomId = u32;

/// An NPC instance, living in whichever room currently holds it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NpcInstance {
    pub instance_id: u32,
    pub name: String,
    pub room: RoomId,
    pub health: ResourceMeter,
}

impl EffectTarget for NpcInstance {
    fn health(&self) -> ResourceMeter {
        self.health
    }
    fn set_health(&mut self, meter: ResourceMeter) {
        self.health = meter;
    }
}

/// In-memory world state: connected sessions by username and spawned NPC
/// instances by id.
///
/// Stands in for the server's user and room managers. The effect engine only
/// sees it through [`TargetResolver`]; everything else here is maintenance
/// surface for the session and spawn lifecycles.
#[derive(Debug, Default)]
pub struct WorldRegistry {
    sessions: Mutex<HashMap<String, PlayerSession>>,
    npcs: Mutex<HashMap<u32, NpcInstance>>,
}

impl WorldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a connected session. Reconnecting replaces the old session.
    pub fn connect(&self, username: impl Into<String>, health: ResourceMeter) {
        let username = username.into();
        tracing::debug!(%username, %health, "player session connected");
        self.sessions
            .lock()
            .expect("world registry lock poisoned")
            .insert(username.clone(), PlayerSession { username, health });
    }

    /// Drops a session. Returns false if the player was not connected.
    pub fn disconnect(&self, username: &str) -> bool {
        let removed = self
            .sessions
            .lock()
            .expect("world registry lock poisoned")
            .remove(username)
            .is_some();
        if removed {
            tracing::debug!(%username, "player session disconnected");
        }
        removed
    }

    /// Places an NPC instance into a room.
    pub fn spawn_npc(
        &self,
        instance_id: u32,
        name: impl Into<String>,
        room: RoomId,
        health: ResourceMeter,
    ) {
        self.npcs
            .lock()
            .expect("world registry lock poisoned")
            .insert(
                instance_id,
                NpcInstance {
                    instance_id,
                    name: name.into(),
                    room,
                    health,
                },
            );
    }

    /// Removes an NPC instance from the world. Returns false if unknown.
    pub fn despawn_npc(&self, instance_id: u32) -> bool {
        self.npcs
            .lock()
            .expect("world registry lock poisoned")
            .remove(&instance_id)
            .is_some()
    }

    /// Moves an NPC between rooms; the instance stays resolvable throughout.
    pub fn move_npc(&self, instance_id: u32, room: RoomId) -> bool {
        match self
            .npcs
            .lock()
            .expect("world registry lock poisoned")
            .get_mut(&instance_id)
        {
            Some(npc) => {
                npc.room = room;
                true
            }
            None => false,
        }
    }

    pub fn player_health(&self, username: &str) -> Result<ResourceMeter> {
        self.sessions
            .lock()
            .expect("world registry lock poisoned")
            .get(username)
            .map(|session| session.health)
            .ok_or_else(|| RuntimeError::SessionNotFound(username.to_string()))
    }

    pub fn npc_health(&self, instance_id: u32) -> Result<ResourceMeter> {
        self.npcs
            .lock()
            .expect("world registry lock poisoned")
            .get(&instance_id)
            .map(|npc| npc.health)
            .ok_or(RuntimeError::NpcNotFound(instance_id))
    }
}

impl TargetResolver for WorldRegistry {
    fn with_target(
        &self,
        target: &TargetId,
        apply: &mut dyn FnMut(&mut dyn EffectTarget),
    ) -> bool {
        match target {
            TargetId::Player(username) => {
                let mut sessions = self.sessions.lock().expect("world registry lock poisoned");
                match sessions.get_mut(username) {
                    Some(session) => {
                        apply(session);
                        true
                    }
                    None => false,
                }
            }
            TargetId::Npc(instance_id) => {
                let mut npcs = self.npcs.lock().expect("world registry lock poisoned");
                match npcs.get_mut(instance_id) {
                    Some(npc) => {
                        apply(npc);
                        true
                    }
                    None => false,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_is_late_bound() {
        let world = WorldRegistry::new();
        let target = TargetId::player("alric");

        assert!(!world.with_target(&target, &mut |_| {}));

        world.connect("alric", ResourceMeter::at_max(20));
        let mut seen = 0;
        assert!(world.with_target(&target, &mut |entity| {
            seen = entity.health().current;
        }));
        assert_eq!(seen, 20);

        world.disconnect("alric");
        assert!(!world.with_target(&target, &mut |_| {}));
    }

    #[test]
    fn npc_stays_resolvable_across_room_moves() {
        let world = WorldRegistry::new();
        world.spawn_npc(9, "cave rat", 1, ResourceMeter::at_max(12));
        assert!(world.move_npc(9, 4));
        assert!(world.with_target(&TargetId::npc(9), &mut |_| {}));
        assert!(world.despawn_npc(9));
        assert!(!world.with_target(&TargetId::npc(9), &mut |_| {}));
        assert_eq!(world.npc_health(9), Err(RuntimeError::NpcNotFound(9)));
    }
}
