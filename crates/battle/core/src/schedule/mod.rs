//! Gauge and status-timer advancement.
//!
//! Every gauge update moves each combatant through the
//! `Idle -> GaugeFilling -> ActionEligible` part of its turn automaton;
//! the controller drives `ActionEligible -> ActionCommitted -> Idle` when
//! it services the returned ready list. Within one update, decay and gauge
//! work for every combatant completes before anyone acts, so a combatant
//! the decay phase kills or incapacitates never acts on the same update.

use arrayvec::ArrayVec;

use crate::config::BattleConfig;
use crate::random::RandomSource;
use crate::state::{Battle, Slot, StatusKind, TimeTier};

/// A periodic effect that fired during a gauge update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TickEvent {
    Poison { slot: Slot, amount: i32 },
    Regen { slot: Slot, amount: i32 },
    StatusExpired { slot: Slot, status: StatusKind },
}

/// Result of one gauge update.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GaugeTick {
    pub events: Vec<TickEvent>,
    /// Combatants whose gauge crossed the threshold, ascending slot order.
    /// The controller must service all of them before the next update.
    pub ready: ArrayVec<Slot, { BattleConfig::MAX_COMBATANTS }>,
}

/// Advance the round phase, run status decay, and fill gauges.
pub fn advance_gauges(battle: &mut Battle, rng: &mut dyn RandomSource) -> GaugeTick {
    let mut tick = GaugeTick::default();

    battle.round_phase = (battle.round_phase + BattleConfig::BATTLE_INC) % BattleConfig::ROUND_MAX;
    let phase = battle.round_phase;

    let slots: Vec<Slot> = battle.occupied_slots().collect();
    for &slot in &slots {
        decay_one(battle, slot, phase, rng, &mut tick);
        advance_one(battle, slot);
    }

    for &slot in &slots {
        let c = battle.combatant(slot);
        if c.ready && c.gauge >= BattleConfig::ROUND_MAX {
            tick.ready.push(slot);
        }
    }
    tick
}

/// Periodic effects and status countdowns for one combatant.
fn decay_one(
    battle: &mut Battle,
    slot: Slot,
    phase: i32,
    rng: &mut dyn RandomSource,
    tick: &mut GaugeTick,
) {
    // Poison fires when its anchor realigns with the round phase, and can
    // never take the victim below 1 HP on its own.
    let (poison, hp, max_hp) = {
        let c = battle.combatant(slot);
        (c.status.get(StatusKind::Poison), c.hp, c.max_hp)
    };
    if poison > 0 && poison - 1 == phase && hp > 1 {
        let mut amount = rng.range(0, max_hp / 20) + 1;
        if amount < 2 {
            amount = 2;
        }
        if hp - amount < 1 {
            amount = hp - 1;
        }
        battle.combatant_mut(slot).hp -= amount;
        tick.events.push(TickEvent::Poison { slot, amount });
    }

    let regen = battle.combatant(slot).status.get(StatusKind::Regen);
    if regen > 0 && regen - 1 == phase {
        let max_hp = battle.combatant(slot).max_hp;
        let amount = (rng.range(0, 5) + max_hp / 10).max(5);
        battle.combatant_mut(slot).adjust_hp(amount);
        tick.events.push(TickEvent::Regen { slot, amount });
    }

    if phase == 0 {
        for status in [
            StatusKind::Ether,
            StatusKind::Stop,
            StatusKind::Sleep,
            StatusKind::Stone,
        ] {
            let c = battle.combatant_mut(slot);
            if c.status.has(status) {
                c.status.adjust(status, -1);
                if !c.status.has(status) {
                    tick.events.push(TickEvent::StatusExpired { slot, status });
                }
            }
        }
    }
}

/// Gauge movement for one combatant, after its decay ran.
fn advance_one(battle: &mut Battle, slot: Slot) {
    let c = battle.combatant_mut(slot);
    c.ready = true;
    if !c.is_alive() || c.max_hp <= 0 || c.is_incapacitated() {
        c.ready = false;
        c.gauge = 0;
        return;
    }
    let rate = match c.status.time_tier() {
        TimeTier::Slow => c.gauge_rate / 2 + 1,
        TimeTier::Normal => c.gauge_rate,
        TimeTier::Haste | TimeTier::Hyper => c.gauge_rate * 2,
    };
    c.gauge += rate;
}
