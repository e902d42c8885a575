//! Victory spoils.

use crate::random::RandomSource;
use crate::state::{Battle, ItemId, Side, StatusKind};

/// Rewards distributed after a heroes' win, computed exactly once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rewards {
    /// Total enemy XP divided among the heroes still standing (petrified
    /// heroes forfeit their cut).
    pub xp_per_hero: i32,
    pub gold: i32,
    pub drops: Vec<ItemId>,
}

pub(crate) fn distribute(battle: &Battle, rng: &mut dyn RandomSource) -> Rewards {
    let sharers = battle
        .living_slots(Side::Heroes)
        .filter(|&s| !battle.combatant(s).status.has(StatusKind::Stone))
        .count() as i32;

    let mut xp_total = 0;
    let mut gold = 0;
    let mut drops = Vec::new();
    for slot in battle.side_slots(Side::Enemies) {
        let bounty = battle.combatant(slot).bounty;
        xp_total += bounty.xp;
        gold += bounty.gold;

        if rng.percent(bounty.drop_chance) {
            let mut found = bounty.common;
            if bounty.rare.is_some() && rng.percent(5) {
                found = bounty.rare;
            }
            if let Some(item) = found {
                drops.push(item);
            }
        }
    }

    Rewards {
        xp_per_hero: if sharers > 0 { xp_total / sharers } else { 0 },
        gold,
        drops,
    }
}
