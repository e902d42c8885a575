use core::fmt;

use crate::config::BattleConfig;

/// Roster slot index. Heroes occupy `0..MAX_PARTY`, enemies occupy
/// `MAX_PARTY..MAX_COMBATANTS`. Slots are stable for the whole battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Slot(pub usize);

impl Slot {
    /// First enemy slot.
    pub const FIRST_ENEMY: Self = Self(BattleConfig::MAX_PARTY);

    /// Which side of the battle this slot belongs to.
    #[inline]
    pub const fn side(self) -> Side {
        if self.0 < BattleConfig::MAX_PARTY {
            Side::Heroes
        } else {
            Side::Enemies
        }
    }

    #[inline]
    pub const fn is_hero(self) -> bool {
        matches!(self.side(), Side::Heroes)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot {}", self.0)
    }
}

/// One of the two sides of a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Heroes,
    Enemies,
}

impl Side {
    pub const fn opponent(self) -> Side {
        match self {
            Side::Heroes => Side::Enemies,
            Side::Enemies => Side::Heroes,
        }
    }
}

/// Runtime target choice attached to an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetSelection {
    One(Slot),
    AllAllies,
    AllEnemies,
}

/// Identifier of a spell definition in the spell table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellId(pub u16);

/// Identifier of a monster special-skill definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillId(pub u16);

/// Identifier of an item definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemId(pub u16);

/// Identifier of a monster template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterId(pub u16);

impl fmt::Display for SpellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "spell #{}", self.0)
    }
}

impl fmt::Display for MonsterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "monster #{}", self.0)
    }
}
