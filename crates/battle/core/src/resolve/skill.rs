//! Monster special-skill resolution.

use crate::config::BattleConfig;
use crate::env::{BattleEnv, SkillEffect};
use crate::random::RandomSource;
use crate::resolve::outcome::{ActionOutcome, DisplayAmount, TargetReport};
use crate::resolve::resist::{res_adjust, res_throw};
use crate::resolve::{StrikeOverride, resolve_melee, sweep_deaths};
use crate::state::{Battle, Element, Side, SkillId, Slot, StatusKind, shell_absorb};

/// Resolve one monster special skill from `user` against its foes (or the
/// single `target` for strike skills).
pub fn resolve_skill(
    battle: &mut Battle,
    user: Slot,
    skill_id: SkillId,
    target: Option<Slot>,
    env: &BattleEnv<'_>,
    rng: &mut dyn RandomSource,
) -> ActionOutcome {
    let skill = env.skill(skill_id);
    match skill.effect {
        SkillEffect::Strike { power, inflicts } => {
            let Some(defender) = target else {
                tracing::debug!(skill = %skill.name, "strike skill without a target is wasted");
                return ActionOutcome::fizzle();
            };
            resolve_melee(
                battle,
                user,
                defender,
                Some(StrikeOverride {
                    attack: power,
                    inflicts,
                }),
                env,
                rng,
            )
        }
        SkillEffect::Blast {
            power,
            element,
            split,
        } => blast(battle, user, power, element, split, rng),
    }
}

/// Group damage for breath and sweep attacks: one power roll, optionally
/// split across the living foes, then the magical mitigation pipeline per
/// target. The user's mental stats play no part.
fn blast(
    battle: &mut Battle,
    user: Slot,
    power: i32,
    element: Element,
    split: bool,
    rng: &mut dyn RandomSource,
) -> ActionOutcome {
    let mut outcome = ActionOutcome::default();
    let foe_side: Side = user.side().opponent();

    let living: Vec<Slot> = battle
        .living_slots(foe_side)
        .filter(|&s| battle.combatant(s).max_hp > 0)
        .collect();
    if living.is_empty() {
        tracing::debug!("blast found nobody standing");
        return ActionOutcome::fizzle();
    }

    let mut rolled = if power < BattleConfig::DMG_RND_MIN * 5 {
        rng.range(0, BattleConfig::DMG_RND_MIN) + power
    } else {
        rng.range(0, power / 5) + power
    };
    if living.len() > 1 && split {
        rolled /= living.len() as i32;
    }

    for &slot in &living {
        let b = {
            let target = battle.combatant(slot);
            let mut b = shell_absorb(rolled, target.status.get(StatusKind::Resist));
            b -= target.stats.magic_defense;
            b = b.max(0);
            b = res_adjust(b, target.resistances.get(element));
            if target.status.has(StatusKind::Stone) && !element.pierces_stone() {
                b /= 10;
            }
            b
        };
        outcome
            .reports
            .push(TargetReport::hp(slot, DisplayAmount::Amount(-b)));

        if b > 0 && element == Element::Poison {
            let target = battle.combatant(slot);
            let res = target.resistances.get(Element::Poison);
            if !target.status.has(StatusKind::Poison) && !res_throw(rng, res) && rng.percent(75) {
                let anchor = battle.round_phase + 1;
                battle
                    .combatant_mut(slot)
                    .status
                    .set(StatusKind::Poison, anchor);
                outcome.applied.push((slot, StatusKind::Poison));
            }
        }
        if b != 0 && battle.combatant(slot).status.has(StatusKind::Sleep) {
            battle.combatant_mut(slot).wake();
            outcome.removed.push((slot, StatusKind::Sleep));
        }
    }

    for report in &outcome.reports {
        if let DisplayAmount::Amount(v) = report.amount {
            battle.combatant_mut(report.slot).adjust_hp(v);
        }
    }
    sweep_deaths(battle, &mut outcome.reports);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{ContentRegistry, SkillDefinition, SkillPrecondition};
    use crate::random::ScriptedSource;
    use crate::state::{BaseStats, Combatant};

    fn party_of_two_vs_drake() -> Battle {
        let hero = |name: &str| {
            let mut c = Combatant::named(name);
            c.stats = BaseStats {
                defense: 5,
                evade: 5,
                magic_defense: 3,
                speed: 40,
                ..Default::default()
            };
            c.hp = 60;
            c.max_hp = 60;
            c
        };
        let mut drake = Combatant::named("drake");
        drake.stats = BaseStats {
            attack: 30,
            hit: 90,
            speed: 45,
            ..Default::default()
        };
        drake.hp = 120;
        drake.max_hp = 120;
        Battle::new(vec![hero("hero-a"), hero("hero-b")], vec![drake]).unwrap()
    }

    fn registry() -> ContentRegistry {
        let mut registry = ContentRegistry::new();
        registry.add_skill(
            SkillId(1),
            SkillDefinition {
                name: "fire breath".into(),
                effect: SkillEffect::Blast {
                    power: 60,
                    element: Element::Fire,
                    split: false,
                },
                precondition: None,
                fx: 0,
            },
        );
        registry.add_skill(
            SkillId(2),
            SkillDefinition {
                name: "sweep".into(),
                effect: SkillEffect::Blast {
                    power: 40,
                    element: Element::Earth,
                    split: true,
                },
                precondition: Some(SkillPrecondition::MultipleFoes),
                fx: 0,
            },
        );
        registry.add_skill(
            SkillId(3),
            SkillDefinition {
                name: "paralyzing claw".into(),
                effect: SkillEffect::Strike {
                    power: 35,
                    inflicts: Some(StatusKind::Stop),
                },
                precondition: None,
                fx: 0,
            },
        );
        registry
    }

    #[test]
    fn breath_hits_every_living_hero_at_full_power() {
        let registry = registry();
        let env = registry.env();
        let mut battle = party_of_two_vs_drake();
        // power roll 0 -> rolled 60, unsplit; per hero: 60 - 3 magdef = 57.
        let mut rng = ScriptedSource::new(vec![0]);
        let outcome = resolve_skill(&mut battle, Slot(2), SkillId(1), None, &env, &mut rng);
        assert_eq!(outcome.reports.len(), 2);
        for report in &outcome.reports {
            assert_eq!(report.amount, DisplayAmount::Amount(-57));
        }
        assert_eq!(battle.combatant(Slot(0)).hp, 3);
        assert_eq!(battle.combatant(Slot(1)).hp, 3);
    }

    #[test]
    fn sweep_splits_its_roll_across_targets() {
        let registry = registry();
        let env = registry.env();
        let mut battle = party_of_two_vs_drake();
        // rolled = 0 + 40, split across 2 -> 20; per hero 20 - 3 = 17.
        let mut rng = ScriptedSource::new(vec![0]);
        let outcome = resolve_skill(&mut battle, Slot(2), SkillId(2), None, &env, &mut rng);
        for report in &outcome.reports {
            assert_eq!(report.amount, DisplayAmount::Amount(-17));
        }
    }

    #[test]
    fn strike_skill_overrides_attack_and_can_paralyze() {
        let registry = registry();
        let env = registry.env();
        let mut battle = party_of_two_vs_drake();
        // damage roll 2, hit roll 0 (hits), crit roll 0 (no crit),
        // ailment save roll 0 (<50, lands), duration roll 1 -> 2..5 => 3.
        let mut rng = ScriptedSource::new(vec![2, 0, 0, 0, 1]);
        let outcome =
            resolve_skill(&mut battle, Slot(2), SkillId(3), Some(Slot(0)), &env, &mut rng);
        // base = 2 + 35 - 5 = 32.
        assert_eq!(outcome.reports[0].amount, DisplayAmount::Amount(-32));
        assert!(battle.combatant(Slot(0)).status.has(StatusKind::Stop));
    }

    #[test]
    fn blast_is_a_noop_against_a_dead_side() {
        let registry = registry();
        let env = registry.env();
        let mut battle = party_of_two_vs_drake();
        battle.combatant_mut(Slot(0)).kill();
        battle.combatant_mut(Slot(1)).kill();
        let mut rng = ScriptedSource::new(vec![0]);
        let outcome = resolve_skill(&mut battle, Slot(2), SkillId(1), None, &env, &mut rng);
        assert!(outcome.fizzled);
        assert!(outcome.reports.is_empty());
    }
}
