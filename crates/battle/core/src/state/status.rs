//! Status effect counters.
//!
//! Each combatant carries one counter per [`StatusKind`]. The meaning of a
//! counter depends on the kind:
//!
//! - plain flags (blind, mute, trueshot, infuse): 0 or 1;
//! - remaining durations (charm, stop, stone, sleep, ether): decremented by
//!   the scheduler, expired at 0;
//! - stack levels (malison 1..=2, resist 1..=2, shield 1..=2, bless 0..=3,
//!   strength 0..=2, time 0..=3);
//! - round-phase anchors (poison, regen): the phase at which the periodic
//!   tick fires, plus one; they persist until cured.

use strum::EnumCount;

/// Every status a combatant can carry.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumCount, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum StatusKind {
    Poison,
    Blind,
    Charm,
    Stop,
    Stone,
    Mute,
    Sleep,
    Dead,
    Malison,
    Resist,
    Time,
    Shield,
    Bless,
    Strength,
    Ether,
    Trueshot,
    Regen,
    Infuse,
}

/// The time-alteration tier derived from the `Time` counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeTier {
    Normal,
    Slow,
    Haste,
    Hyper,
}

/// Status counter vector for one combatant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    counters: [i32; StatusKind::COUNT],
}

impl StatusEffects {
    pub const fn none() -> Self {
        Self {
            counters: [0; StatusKind::COUNT],
        }
    }

    #[inline]
    pub fn get(&self, kind: StatusKind) -> i32 {
        self.counters[kind as usize]
    }

    #[inline]
    pub fn set(&mut self, kind: StatusKind, value: i32) {
        self.counters[kind as usize] = value;
    }

    #[inline]
    pub fn has(&self, kind: StatusKind) -> bool {
        self.get(kind) > 0
    }

    /// Add `delta` to a counter, clamping at zero.
    pub fn adjust(&mut self, kind: StatusKind, delta: i32) {
        let v = (self.get(kind) + delta).max(0);
        self.set(kind, v);
    }

    pub fn clear(&mut self, kind: StatusKind) {
        self.set(kind, 0);
    }

    /// Wipe every counter. Used by petrification, which overwrites the whole
    /// condition of the target.
    pub fn clear_all_except_dead(&mut self) {
        let dead = self.get(StatusKind::Dead);
        self.counters = [0; StatusKind::COUNT];
        self.set(StatusKind::Dead, dead);
    }

    pub fn clear_all(&mut self) {
        self.counters = [0; StatusKind::COUNT];
    }

    pub fn time_tier(&self) -> TimeTier {
        match self.get(StatusKind::Time) {
            0 => TimeTier::Normal,
            1 => TimeTier::Slow,
            2 => TimeTier::Haste,
            _ => TimeTier::Hyper,
        }
    }
}

/// Physical absorption from the shield buff. Tier 1 passes 75% of the
/// amount through, tier 2 passes 666/1000. Works on signed display amounts,
/// truncating toward zero either way.
pub fn shield_absorb(amount: i32, tier: i32) -> i32 {
    match tier {
        0 => amount,
        1 => amount * 75 / 100,
        _ => amount * 666 / 1000,
    }
}

/// Magical absorption from the shell (resist) buff: 75% at tier 1, half at
/// tier 2.
pub fn shell_absorb(amount: i32, tier: i32) -> i32 {
    match tier {
        0 => amount,
        1 => amount * 75 / 100,
        _ => amount * 5 / 10,
    }
}
