//! Battle opening: surprise dice, starting gauges, imbued openers.

use crate::config::BattleConfig;
use crate::env::BattleEnv;
use crate::random::RandomSource;
use crate::resolve::{ActionOutcome, cast_imbued};
use crate::state::{Battle, Side, Slot, TargetSelection};

pub(crate) struct InitiativeReport {
    /// The side caught off guard, if the dice said so.
    pub surprised: Option<Side>,
    /// Outcomes of the battle-start imbued casts, in slot order.
    pub outcomes: Vec<(Slot, ActionOutcome)>,
}

/// Roll surprise, seed every gauge, and fire battle-start imbued items.
pub(crate) fn roll_initiative(
    battle: &mut Battle,
    config: &BattleConfig,
    random_encounter: bool,
    env: &BattleEnv<'_>,
    rng: &mut dyn RandomSource,
) -> InitiativeReport {
    // A 1 on exactly one die hands that side's opponents a full opening
    // gauge. Scripted battles never start surprised; a lone hero rolls a
    // wider die and faces a narrower one.
    let (mut hero_die, mut enemy_die) = if random_encounter {
        if battle.num_heroes() == 1 {
            (rng.range(1, config.surprise_die_solo), rng.range(1, 4))
        } else {
            (
                rng.range(1, config.surprise_die),
                rng.range(1, config.surprise_die),
            )
        }
    } else {
        (10, 10)
    };
    if hero_die == 1 && enemy_die == 1 {
        hero_die = 10;
        enemy_die = 10;
    }

    let span = (BattleConfig::ROUND_MAX * 66 / 100).max(1);
    let slots: Vec<Slot> = battle.occupied_slots().collect();
    for &slot in &slots {
        let gauge = rng.range(0, span);
        let c = battle.combatant_mut(slot);
        c.gauge = gauge;
        c.ready = true;
        c.last_spell = None;
    }
    for &slot in &slots {
        let gauge = match (slot.side(), hero_die, enemy_die) {
            (Side::Heroes, _, 1) => Some(BattleConfig::ROUND_MAX),
            (Side::Heroes, 1, _) => Some(0),
            (Side::Enemies, 1, _) => Some(BattleConfig::ROUND_MAX),
            (Side::Enemies, _, 1) => Some(0),
            _ => None,
        };
        if let Some(gauge) = gauge {
            battle.combatant_mut(slot).gauge = gauge;
        }
    }
    battle.round_phase = 0;

    let surprised = match (hero_die, enemy_die) {
        (1, e) if e > 1 => Some(Side::Heroes),
        (h, 1) if h > 1 => Some(Side::Enemies),
        _ => None,
    };

    let mut outcomes = Vec::new();
    for &slot in &slots {
        let imbued = battle.combatant(slot).imbued;
        for item in imbued.into_iter().flatten() {
            if let Some(outcome) =
                cast_imbued(battle, slot, item, 1, TargetSelection::One(slot), env, rng)
            {
                outcomes.push((slot, outcome));
            }
        }
    }

    InitiativeReport {
        surprised,
        outcomes,
    }
}
