//! Hero seeds and write-back records at the persistence boundary.
//!
//! The persistence collaborator reads the party's long-lived state and
//! produces one [`HeroSeed`] per hero at battle start; at battle end it
//! receives a [`HeroWriteback`] per hero with everything that survives the
//! battle.

use crate::state::combatant::{Combatant, OnHitImbue, SkillRef, WeaponPower};
use crate::state::element::Resistances;
use crate::state::ids::ItemId;
use crate::state::stats::{BaseStats, StatBoost};
use crate::state::status::StatusKind;

/// Snapshot of one hero's persistent state, as handed in by the embedder.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeroSeed {
    pub name: String,
    pub stats: BaseStats,
    pub resistances: Resistances,
    pub hp: i32,
    pub max_hp: i32,
    pub mp: i32,
    pub max_mp: i32,
    /// Poisoned heroes walk into battle poisoned.
    pub poisoned: bool,
    pub weapon_power: Option<WeaponPower>,
    pub boost: StatBoost,
    pub keen_critical: bool,
    pub mp_rate: i32,
    pub spells: Vec<SkillRef>,
    pub imbued: [Option<ItemId>; 2],
    pub on_hit: Option<OnHitImbue>,
}

impl HeroSeed {
    /// Build the battle-local combatant for this hero.
    pub fn into_combatant(self) -> Combatant {
        let mut c = Combatant::named(self.name);
        c.stats = self.stats;
        c.resistances = self.resistances;
        c.hp = self.hp.clamp(0, self.max_hp);
        c.max_hp = self.max_hp;
        c.mp = self.mp.clamp(0, self.max_mp);
        c.max_mp = self.max_mp;
        c.weapon_power = self.weapon_power;
        c.boost = self.boost;
        c.keen_critical = self.keen_critical;
        c.mp_rate = self.mp_rate;
        for (slot, spell) in c.skills.iter_mut().zip(self.spells.into_iter()) {
            *slot = Some(spell);
        }
        c.imbued = self.imbued;
        c.on_hit = self.on_hit;
        if self.poisoned {
            // Anchored at phase 0, the same value a weapon proc writes.
            c.status.set(StatusKind::Poison, 1);
        }
        c
    }
}

/// Per-hero state written back to the persistent party record at battle end.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeroWriteback {
    pub name: String,
    pub hp: i32,
    pub mp: i32,
    pub dead: bool,
    pub poisoned: bool,
    pub xp_gained: i32,
}

impl HeroWriteback {
    pub fn from_combatant(c: &Combatant, xp_gained: i32) -> Self {
        Self {
            name: c.name.clone(),
            hp: c.hp,
            mp: c.mp,
            dead: !c.is_alive(),
            poisoned: c.status.has(StatusKind::Poison),
            xp_gained,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_clamps_and_carries_poison() {
        let seed = HeroSeed {
            name: "Rowan".into(),
            stats: BaseStats::default(),
            resistances: Resistances::neutral(),
            hp: 999,
            max_hp: 60,
            mp: -3,
            max_mp: 20,
            poisoned: true,
            weapon_power: None,
            boost: StatBoost::default(),
            keen_critical: false,
            mp_rate: 100,
            spells: Vec::new(),
            imbued: [None; 2],
            on_hit: None,
        };
        let c = seed.into_combatant();
        assert_eq!(c.hp, 60);
        assert_eq!(c.mp, 0);
        assert!(c.status.has(StatusKind::Poison));
    }
}
