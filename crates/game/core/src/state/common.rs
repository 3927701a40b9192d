use std::fmt;

/// Discrete time unit of the server's world loop.
///
/// Distinct from wall-clock time: the cadence is owned by the external world
/// tick source, and nothing in the engine assumes how long a tick takes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Self = Self(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies the entity an effect is attached to.
///
/// Players are addressed by the username of their connected session, NPCs by
/// spawn instance id. The id is late-bound: resolution to a live entity
/// happens at the moment a payload needs to act, never at creation time, so
/// an effect survives its target disconnecting or wandering between rooms.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetId {
    /// A player, by the username of their session.
    Player(String),
    /// An NPC, by spawn instance id.
    Npc(u32),
}

impl TargetId {
    pub fn player(username: impl Into<String>) -> Self {
        Self::Player(username.into())
    }

    pub fn npc(instance_id: u32) -> Self {
        Self::Npc(instance_id)
    }

    /// Returns true if this target is a player session.
    pub fn is_player(&self) -> bool {
        matches!(self, Self::Player(_))
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player(username) => write!(f, "player:{username}"),
            Self::Npc(instance_id) => write!(f, "npc:#{instance_id}"),
        }
    }
}

/// Integer resource meter (health) tracked per entity.
///
/// All mutation goes through [`damage`](Self::damage) and
/// [`heal`](Self::heal), which clamp to `[0, maximum]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceMeter {
    pub current: u32,
    pub maximum: u32,
}

impl ResourceMeter {
    pub fn new(current: u32, maximum: u32) -> Self {
        Self {
            current: current.min(maximum),
            maximum,
        }
    }

    /// A full meter.
    pub fn at_max(maximum: u32) -> Self {
        Self {
            current: maximum,
            maximum,
        }
    }

    /// Subtracts `amount`, clamped at zero. Returns the damage actually dealt.
    pub fn damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.current);
        self.current -= dealt;
        dealt
    }

    /// Adds `amount`, clamped at the maximum. Returns the healing actually done.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let healed = amount.min(self.maximum - self.current);
        self.current += healed;
        healed
    }

    pub fn is_depleted(&self) -> bool {
        self.current == 0
    }
}

impl fmt::Display for ResourceMeter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.current, self.maximum)
    }
}
