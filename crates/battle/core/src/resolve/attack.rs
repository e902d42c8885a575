//! Melee attack resolution.

use crate::config::BattleConfig;
use crate::env::BattleEnv;
use crate::random::RandomSource;
use crate::resolve::outcome::{ActionOutcome, DisplayAmount, TargetReport};
use crate::resolve::resist::{res_adjust, res_throw};
use crate::resolve::spell::cast_imbued;
use crate::resolve::sweep_deaths;
use crate::state::{
    Battle, Element, Slot, StatusKind, TargetSelection, WeaponPower, shield_absorb,
};
use crate::stats::effective_stats;

/// Stat substitution used by monster strike skills: the skill's power
/// replaces the attack stat and its ailment replaces the weapon charge.
#[derive(Clone, Copy, Debug)]
pub(crate) struct StrikeOverride {
    pub attack: i32,
    pub inflicts: Option<StatusKind>,
}

/// The resistance channel a status ailment travels through.
pub(crate) fn ailment_element(kind: StatusKind) -> Option<Element> {
    match kind {
        StatusKind::Poison => Some(Element::Poison),
        StatusKind::Blind => Some(Element::Blind),
        StatusKind::Charm => Some(Element::Charm),
        StatusKind::Stop => Some(Element::Paralyze),
        StatusKind::Stone => Some(Element::Petrify),
        StatusKind::Mute => Some(Element::Silence),
        StatusKind::Sleep => Some(Element::Sleep),
        _ => None,
    }
}

/// Resolve one melee attack.
pub fn resolve_attack(
    battle: &mut Battle,
    attacker: Slot,
    defender: Slot,
    env: &BattleEnv<'_>,
    rng: &mut dyn RandomSource,
) -> ActionOutcome {
    resolve_melee(battle, attacker, defender, None, env, rng)
}

/// Melee resolution shared by plain attacks and strike skills.
pub(crate) fn resolve_melee(
    battle: &mut Battle,
    attacker: Slot,
    defender: Slot,
    skill: Option<StrikeOverride>,
    env: &BattleEnv<'_>,
    rng: &mut dyn RandomSource,
) -> ActionOutcome {
    let mut outcome = ActionOutcome::default();

    let (atk, attacker_critical, keen, boost, on_hit) = {
        let a = battle.combatant(attacker);
        (
            effective_stats(a),
            a.at_critical_hp(),
            a.keen_critical,
            a.boost,
            a.on_hit,
        )
    };
    let def = effective_stats(battle.combatant(defender));

    let mut defender_defense = def.defense;
    if battle.combatant(defender).defend {
        defender_defense = defender_defense * 3 / 2;
    }

    let mut defender_evade = def.evade;
    if battle.combatant(attacker).status.has(StatusKind::Trueshot) {
        battle
            .combatant_mut(attacker)
            .status
            .clear(StatusKind::Trueshot);
        defender_evade = 0;
    }

    let attack_total = match skill {
        Some(s) => s.attack,
        None => atk.attack + boost.applied_to(&atk),
    };

    let mut base = if attack_total < BattleConfig::DMG_RND_MIN * 5 {
        rng.range(0, BattleConfig::DMG_RND_MIN)
    } else {
        rng.range(0, attack_total / 5)
    };
    base += attack_total - defender_defense;
    base = base.max(1);

    let to_hit = (atk.hit + defender_evade).max(1);
    let mut mult = if rng.range(0, to_hit) < atk.hit { 1 } else { 0 };

    if battle.combatant(defender).status.has(StatusKind::Ether) {
        mult = 0;
    }

    if mult > 0 {
        if battle.combatant(defender).crit_able {
            let mut bonus = if attacker_critical { 2 } else { 1 };
            if keen {
                bonus *= 2;
            }
            let threshold = 20 - bonus;
            if rng.range(0, 20) >= threshold {
                outcome.critical = true;
                base = base * 3 / 2;
            }
        }

        if battle.combatant(defender).status.has(StatusKind::Malison) {
            base = base * 5 / 4;
        }
        base = base.max(1);

        let charge = match skill {
            Some(s) => s.inflicts.map(WeaponPower::Ailment),
            None => battle.combatant(attacker).weapon_power,
        };
        match charge {
            Some(WeaponPower::Elemental(element)) => {
                let res = battle.combatant(defender).resistances.get(element);
                base = res_adjust(base, res);
            }
            Some(WeaponPower::Ailment(kind)) => {
                let resisted = ailment_element(kind)
                    .map(|el| {
                        let res = battle.combatant(defender).resistances.get(el);
                        res_throw(rng, res)
                    })
                    .unwrap_or(false);
                let lacks = !battle.combatant(defender).status.has(kind);
                if !resisted && lacks && rng.percent(50) {
                    let duration = match kind {
                        StatusKind::Poison | StatusKind::Stone | StatusKind::Mute => 1,
                        _ => rng.range(2, 5),
                    };
                    battle.combatant_mut(defender).status.set(kind, duration);
                    outcome.applied.push((defender, kind));
                }
            }
            None => {}
        }
    }

    let damage = mult * base;
    if damage == 0 {
        outcome
            .reports
            .push(TargetReport::hp(defender, DisplayAmount::Miss));
        return outcome;
    }

    let shield_tier = battle.combatant(defender).status.get(StatusKind::Shield);
    let amount = shield_absorb(-damage, shield_tier);
    outcome
        .reports
        .push(TargetReport::hp(defender, DisplayAmount::Amount(amount)));

    {
        let target = battle.combatant_mut(defender);
        target.adjust_hp(amount);
    }

    // On-hit imbued gear fires on one landed blow in five. The roll is only
    // consumed when the proc exists, keeping the RNG stream stable.
    if let Some(imbue) = on_hit {
        if rng.range(0, 5) == 0 {
            if let Some(sub) = cast_imbued(
                battle,
                attacker,
                imbue.item,
                imbue.power,
                TargetSelection::One(defender),
                env,
                rng,
            ) {
                outcome.absorb(sub);
            }
        }
    }

    sweep_deaths(battle, &mut outcome.reports);

    let defender_alive = battle.combatant(defender).is_alive();
    if defender_alive {
        if battle.combatant(defender).status.has(StatusKind::Sleep) {
            battle.combatant_mut(defender).wake();
            outcome.removed.push((defender, StatusKind::Sleep));
        }
        if attacker == defender && battle.combatant(defender).status.has(StatusKind::Charm) {
            battle.combatant_mut(defender).status.clear(StatusKind::Charm);
            outcome.removed.push((defender, StatusKind::Charm));
        }
    }

    outcome
}
