//! Closed sets of effect kinds and stats, plus the display catalog.
//!
//! Display names and description templates live in one data table keyed by
//! kind. Adding a new effect type is a data addition here, not a new branch
//! scattered across display code.

/// Types of temporary effects.
///
/// This is a closed set; callers validate anything user-supplied against it
/// before building a descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectKind {
    // ========================================================================
    // Over-time conditions
    // ========================================================================
    /// HP loss over time.
    Poison,

    /// HP recovery over time.
    Regen,

    /// Generic damage over time (fire, bleed, curses).
    DamageOverTime,

    /// Generic heal over time.
    HealOverTime,

    // ========================================================================
    // Stat buffs and debuffs
    // ========================================================================
    StrengthBuff,
    AgilityBuff,
    DefenseBuff,
    AttackBuff,

    // ========================================================================
    // Crowd control (restricts actions)
    // ========================================================================
    /// Cannot move and cannot act.
    Stun,

    /// Cannot move.
    MovementBlock,

    /// Cannot attack or be drawn into combat actions.
    CombatBlock,
}

/// Stats a temporary effect can shift.
///
/// Deltas against these never touch the target's permanent fields; they are
/// summed into a derived view recomputed from the live effect list.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Stat {
    Strength,
    Agility,
    Defense,
    Attack,
}

/// Display entry for one effect kind.
pub struct KindEntry {
    pub kind: EffectKind,
    pub display_name: &'static str,
    description: fn(i64) -> String,
}

impl KindEntry {
    /// Renders the description template with the effect's primary magnitude.
    pub fn describe(&self, amount: i64) -> String {
        (self.description)(amount)
    }
}

/// Catalog mapping every kind to its display strings.
///
/// Order must match the declaration order of [`EffectKind`]; the alignment
/// test below keeps the two honest.
pub const CATALOG: &[KindEntry] = &[
    KindEntry {
        kind: EffectKind::Poison,
        display_name: "Poison",
        description: |amount| format!("Suffers {amount} poison damage per tick."),
    },
    KindEntry {
        kind: EffectKind::Regen,
        display_name: "Regeneration",
        description: |amount| format!("Recovers {amount} health per tick."),
    },
    KindEntry {
        kind: EffectKind::DamageOverTime,
        display_name: "Withering",
        description: |amount| format!("Takes {amount} damage per tick."),
    },
    KindEntry {
        kind: EffectKind::HealOverTime,
        display_name: "Mending",
        description: |amount| format!("Heals {amount} per tick."),
    },
    KindEntry {
        kind: EffectKind::StrengthBuff,
        display_name: "Strength",
        description: |amount| format!("Strength shifted by {amount}."),
    },
    KindEntry {
        kind: EffectKind::AgilityBuff,
        display_name: "Agility",
        description: |amount| format!("Agility shifted by {amount}."),
    },
    KindEntry {
        kind: EffectKind::DefenseBuff,
        display_name: "Bulwark",
        description: |amount| format!("Defense shifted by {amount}."),
    },
    KindEntry {
        kind: EffectKind::AttackBuff,
        display_name: "Battle Fury",
        description: |amount| format!("Attack shifted by {amount}."),
    },
    KindEntry {
        kind: EffectKind::Stun,
        display_name: "Stunned",
        description: |_| "Cannot move or act.".to_string(),
    },
    KindEntry {
        kind: EffectKind::MovementBlock,
        display_name: "Rooted",
        description: |_| "Cannot move.".to_string(),
    },
    KindEntry {
        kind: EffectKind::CombatBlock,
        display_name: "Pacified",
        description: |_| "Cannot fight.".to_string(),
    },
];

impl EffectKind {
    fn entry(self) -> &'static KindEntry {
        &CATALOG[self as usize]
    }

    /// Human-readable name from the catalog.
    pub fn display_name(self) -> &'static str {
        self.entry().display_name
    }

    /// Renders this kind's description template for the given magnitude.
    pub fn describe(self, amount: i64) -> String {
        self.entry().describe(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn catalog_covers_every_kind_in_order() {
        assert_eq!(CATALOG.len(), EffectKind::iter().count());
        for (index, kind) in EffectKind::iter().enumerate() {
            assert_eq!(CATALOG[index].kind, kind, "catalog misaligned at {kind}");
        }
    }

    #[test]
    fn descriptions_render_with_magnitude() {
        assert_eq!(
            EffectKind::Poison.describe(5),
            "Suffers 5 poison damage per tick."
        );
        assert_eq!(EffectKind::MovementBlock.describe(0), "Cannot move.");
        assert_eq!(EffectKind::Regen.display_name(), "Regeneration");
    }
}
