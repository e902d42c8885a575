//! Enemy action selection.
//!
//! The policy walks the combatant's percentile-priority table, checks the
//! situational precondition of special skills and the relevance descriptor
//! of spells, and falls back to a melee attack. It chooses; the controller
//! resolves the choice.

use crate::ai::relevance::is_relevant;
use crate::ai::targeting::{TargetFilter, select_target};
use crate::config::BattleConfig;
use crate::env::{BattleEnv, Enhancement, SkillEffect, SkillPrecondition, SpellEffect};
use crate::random::RandomSource;
use crate::state::{
    Battle, SkillId, SkillRef, Slot, SpellId, StatusKind, TargetSelection,
};

/// An action the decision policy settled on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyAction {
    /// Dither (confused combatants only).
    Nothing,
    Defend,
    Attack { target: Slot },
    Spell {
        spell: SpellId,
        target: TargetSelection,
    },
    Skill {
        skill: SkillId,
        target: Option<Slot>,
    },
}

/// Choose an action for an AI-controlled combatant taking its turn.
pub fn choose_action(
    battle: &mut Battle,
    slot: Slot,
    env: &BattleEnv<'_>,
    rng: &mut dyn RandomSource,
) -> EnemyAction {
    tick_cooldowns(battle, slot);

    let (hp, max_hp, mute) = {
        let c = battle.combatant(slot);
        (c.hp, c.max_hp, c.status.has(StatusKind::Mute))
    };

    // A battered caster reaches for recovery half the time.
    if hp < max_hp * 2 / 3 && rng.percent(50) && !mute {
        if let Some(spell) = best_recovery_spell(battle, slot, env) {
            tracing::debug!(combatant = %battle.combatant(slot).name, "AI self-heal");
            return EnemyAction::Spell {
                spell,
                target: TargetSelection::One(slot),
            };
        }
    }

    let mut ap = rng.range(0, 100);
    for idx in 0..BattleConfig::SKILL_SLOTS {
        let threshold = battle.combatant(slot).ai_priority[idx] as i32;
        if ap >= threshold {
            continue;
        }
        match battle.combatant(slot).skills[idx] {
            Some(SkillRef::Special(id)) => {
                if let Some(action) = try_skill(battle, slot, idx, id, env, rng) {
                    return action;
                }
                ap = threshold + 1;
            }
            Some(SkillRef::Spell(id)) if !mute => {
                if let Some(action) = try_spell(battle, slot, id, env, rng) {
                    return action;
                }
                ap = threshold + 1;
            }
            _ => {}
        }
    }

    melee_fallback(battle, slot, rng)
}

/// Action selection for a confused combatant, hero or enemy: dither,
/// strike the foes, or strike its own side, never casting. The d4 weighs
/// the own side double.
pub fn charm_action(
    battle: &mut Battle,
    slot: Slot,
    rng: &mut dyn RandomSource,
) -> EnemyAction {
    tick_cooldowns(battle, slot);
    let side = slot.side();
    let target_side = match rng.range(0, 4) {
        0 => return EnemyAction::Nothing,
        1 => side.opponent(),
        _ => side,
    };
    match select_target(battle, target_side, TargetFilter::Any, rng) {
        Some(target) => EnemyAction::Attack { target },
        None => EnemyAction::Nothing,
    }
}

fn tick_cooldowns(battle: &mut Battle, slot: Slot) {
    let c = battle.combatant_mut(slot);
    for cd in c.cooldowns.iter_mut() {
        *cd = cd.saturating_sub(1);
    }
}

/// Strongest affordable healing spell in the skill list, or a drain as the
/// last resort.
fn best_recovery_spell(battle: &Battle, slot: Slot, env: &BattleEnv<'_>) -> Option<SpellId> {
    let c = battle.combatant(slot);
    let mut best_heal: Option<(i32, SpellId)> = None;
    let mut drain: Option<SpellId> = None;
    for entry in c.skills.iter().flatten() {
        let SkillRef::Spell(id) = *entry else {
            continue;
        };
        let Some(def) = env.try_spell(id) else {
            continue;
        };
        if !can_afford(battle, slot, id, env) {
            continue;
        }
        match def.effect {
            SpellEffect::Heal => {
                if best_heal.is_none_or(|(power, _)| def.power > power) {
                    best_heal = Some((def.power, id));
                }
            }
            SpellEffect::Drain => drain = Some(id),
            _ => {}
        }
    }
    best_heal.map(|(_, id)| id).or(drain)
}

fn can_afford(battle: &Battle, slot: Slot, spell: SpellId, env: &BattleEnv<'_>) -> bool {
    let c = battle.combatant(slot);
    let Some(def) = env.try_spell(spell) else {
        return false;
    };
    let cost = (def.mp_cost * c.mp_rate / 100).max(1);
    c.mp >= cost
}

fn try_skill(
    battle: &mut Battle,
    slot: Slot,
    skill_slot: usize,
    id: SkillId,
    env: &BattleEnv<'_>,
    rng: &mut dyn RandomSource,
) -> Option<EnemyAction> {
    let def = env.try_skill(id)?;
    let foe_side = slot.side().opponent();

    if let Some(SkillPrecondition::MultipleFoes) = def.precondition {
        if battle.living_slots(foe_side).count() < 2 {
            battle.combatant_mut(slot).cooldowns[skill_slot] = 1;
        }
    }
    if battle.combatant(slot).cooldowns[skill_slot] != 0 {
        return None;
    }

    match def.effect {
        SkillEffect::Strike { .. } => {
            let target = select_target(battle, foe_side, TargetFilter::Any, rng)?;
            Some(EnemyAction::Skill {
                skill: id,
                target: Some(target),
            })
        }
        SkillEffect::Blast { .. } => Some(EnemyAction::Skill {
            skill: id,
            target: None,
        }),
    }
}

fn try_spell(
    battle: &Battle,
    slot: Slot,
    id: SpellId,
    env: &BattleEnv<'_>,
    rng: &mut dyn RandomSource,
) -> Option<EnemyAction> {
    use crate::env::TargetKind;

    let def = env.try_spell(id)?;
    if !can_afford(battle, slot, id, env) {
        return None;
    }
    if !is_relevant(battle, slot, def.relevance) {
        return None;
    }

    let ally_side = slot.side();
    let foe_side = ally_side.opponent();
    let target = match def.target {
        TargetKind::None => return None,
        TargetKind::AllyOne => {
            let filter = ally_filter(&def.effect);
            TargetSelection::One(select_target(battle, ally_side, filter, rng)?)
        }
        TargetKind::AllyAll => TargetSelection::AllAllies,
        TargetKind::AllyOneAll => {
            if matches!(def.effect, SpellEffect::Heal) {
                let hurt = battle
                    .living_slots(ally_side)
                    .filter(|&s| {
                        let c = battle.combatant(s);
                        c.hp < c.max_hp * 75 / 100
                    })
                    .count();
                if hurt > 1 {
                    TargetSelection::AllAllies
                } else {
                    TargetSelection::One(select_target(
                        battle,
                        ally_side,
                        TargetFilter::NeedsCure,
                        rng,
                    )?)
                }
            } else if rng.range(0, 4) < 2 {
                TargetSelection::AllAllies
            } else {
                TargetSelection::One(select_target(
                    battle,
                    ally_side,
                    TargetFilter::NeedsCure,
                    rng,
                )?)
            }
        }
        TargetKind::EnemyOne => {
            let filter = foe_filter(&def.effect);
            TargetSelection::One(select_target(battle, foe_side, filter, rng)?)
        }
        TargetKind::EnemyAll => TargetSelection::AllEnemies,
        TargetKind::EnemyOneAll => {
            if rng.range(0, 4) < 3 {
                TargetSelection::AllEnemies
            } else {
                TargetSelection::One(select_target(battle, foe_side, TargetFilter::Any, rng)?)
            }
        }
    };
    Some(EnemyAction::Spell { spell: id, target })
}

/// Buff targeting skips allies that already carry the effect.
fn ally_filter(effect: &SpellEffect) -> TargetFilter {
    match effect {
        SpellEffect::Enhance(e) => TargetFilter::Lacking(enhancement_status(*e)),
        _ => TargetFilter::Any,
    }
}

/// Affliction targeting skips foes that already carry the ailment.
fn foe_filter(effect: &SpellEffect) -> TargetFilter {
    match effect {
        SpellEffect::Afflict(a) => TargetFilter::Lacking(a.status()),
        _ => TargetFilter::Any,
    }
}

fn enhancement_status(e: Enhancement) -> StatusKind {
    match e {
        Enhancement::Trueshot => StatusKind::Trueshot,
        Enhancement::Ether => StatusKind::Ether,
        Enhancement::Regen => StatusKind::Regen,
        Enhancement::Strength => StatusKind::Strength,
        Enhancement::Shell | Enhancement::Wall => StatusKind::Resist,
        Enhancement::Shield | Enhancement::GreaterShield | Enhancement::DivineGuard => {
            StatusKind::Shield
        }
        Enhancement::Bless => StatusKind::Bless,
        Enhancement::Haste => StatusKind::Time,
    }
}

fn melee_fallback(battle: &Battle, slot: Slot, rng: &mut dyn RandomSource) -> EnemyAction {
    let (critical, charmed) = {
        let c = battle.combatant(slot);
        (c.hp < c.max_hp / 5, c.status.has(StatusKind::Charm))
    };
    if critical && !charmed && rng.range(0, 4) == 0 {
        return EnemyAction::Defend;
    }
    match select_target(battle, slot.side().opponent(), TargetFilter::Any, rng) {
        Some(target) => EnemyAction::Attack { target },
        None => EnemyAction::Defend,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{
        Affliction, ContentRegistry, SkillDefinition, SpellDefinition, TargetKind,
    };
    use crate::random::ScriptedSource;
    use crate::state::{BaseStats, CasterStat, Combatant, Element};

    fn simple_spell(
        name: &str,
        power: i32,
        mp_cost: i32,
        target: TargetKind,
        effect: SpellEffect,
    ) -> SpellDefinition {
        let relevance = SpellDefinition::default_relevance(&effect, target);
        SpellDefinition {
            name: name.into(),
            power,
            bonus: 0,
            hit_chance: 60,
            mp_cost,
            stat: CasterStat::Intellect,
            element: None,
            target,
            effect,
            relevance,
            fx: 0,
        }
    }

    fn registry() -> ContentRegistry {
        let mut r = ContentRegistry::new();
        r.add_spell(
            SpellId(1),
            simple_spell("cure", 25, 3, TargetKind::AllyOneAll, SpellEffect::Heal),
        );
        r.add_spell(
            SpellId(2),
            simple_spell(
                "sleep",
                0,
                3,
                TargetKind::EnemyOne,
                SpellEffect::Afflict(Affliction::Sleep),
            ),
        );
        r.add_spell(
            SpellId(3),
            simple_spell(
                "shield all",
                0,
                4,
                TargetKind::AllyAll,
                SpellEffect::Enhance(Enhancement::GreaterShield),
            ),
        );
        r.add_skill(
            SkillId(7),
            SkillDefinition {
                name: "sweep".into(),
                effect: SkillEffect::Blast {
                    power: 30,
                    element: Element::Earth,
                    split: true,
                },
                precondition: Some(SkillPrecondition::MultipleFoes),
                fx: 0,
            },
        );
        r
    }

    fn battlefield() -> Battle {
        let hero = |name: &str| {
            let mut c = Combatant::named(name);
            c.stats = BaseStats {
                speed: 40,
                ..Default::default()
            };
            c.hp = 70;
            c.max_hp = 70;
            c
        };
        let mut brute = Combatant::named("brute");
        brute.stats = BaseStats {
            speed: 40,
            attack: 25,
            hit: 80,
            intellect: 10,
            sagacity: 10,
            aura: 100,
            spirit: 100,
            ..Default::default()
        };
        brute.hp = 90;
        brute.max_hp = 90;
        brute.mp = 20;
        brute.max_mp = 20;
        brute.skills[0] = Some(SkillRef::Spell(SpellId(2)));
        brute.ai_priority[0] = 40;
        brute.skills[1] = Some(SkillRef::Special(SkillId(7)));
        brute.ai_priority[1] = 70;
        brute.skills[2] = Some(SkillRef::Spell(SpellId(1)));
        Battle::new(vec![hero("hero-a"), hero("hero-b")], vec![brute]).unwrap()
    }

    #[test]
    fn percentile_draw_picks_the_first_open_slot() {
        let registry = registry();
        let env = registry.env();
        let mut battle = battlefield();
        // Healthy: no cure phase roll for hp >= 2/3. Draw 10 < 40 picks the
        // sleep spell; target roll selects hero-a.
        let mut rng = ScriptedSource::new(vec![10, 0]);
        let action = choose_action(&mut battle, Slot(2), &env, &mut rng);
        assert_eq!(
            action,
            EnemyAction::Spell {
                spell: SpellId(2),
                target: TargetSelection::One(Slot(0)),
            }
        );
    }

    #[test]
    fn irrelevant_spell_falls_through_to_the_next_slot() {
        let registry = registry();
        let env = registry.env();
        let mut battle = battlefield();
        // Both heroes already asleep: the sleep slot is irrelevant, the
        // draw falls through to sweep (threshold 70).
        for s in [Slot(0), Slot(1)] {
            battle.combatant_mut(s).status.set(StatusKind::Sleep, 4);
        }
        let mut rng = ScriptedSource::new(vec![10]);
        let action = choose_action(&mut battle, Slot(2), &env, &mut rng);
        assert_eq!(
            action,
            EnemyAction::Skill {
                skill: SkillId(7),
                target: None,
            }
        );
    }

    #[test]
    fn sweep_against_a_lone_foe_arms_a_cooldown_and_is_skipped() {
        let registry = registry();
        let env = registry.env();
        let mut battle = battlefield();
        battle.combatant_mut(Slot(1)).kill();
        // Draw 50 lands between 40 and 70: sweep's slot. With one foe the
        // precondition fails; the fallback melee attack picks hero-a.
        let mut rng = ScriptedSource::new(vec![50, 0]);
        let action = choose_action(&mut battle, Slot(2), &env, &mut rng);
        assert_eq!(action, EnemyAction::Attack { target: Slot(0) });
        assert_eq!(battle.combatant(Slot(2)).cooldowns[1], 1);
    }

    #[test]
    fn battered_enemy_reaches_for_its_cure() {
        let registry = registry();
        let env = registry.env();
        let mut battle = battlefield();
        battle.combatant_mut(Slot(2)).hp = 30;
        // Cure-phase roll 10 < 50 triggers; the cure spell targets itself.
        let mut rng = ScriptedSource::new(vec![10]);
        let action = choose_action(&mut battle, Slot(2), &env, &mut rng);
        assert_eq!(
            action,
            EnemyAction::Spell {
                spell: SpellId(1),
                target: TargetSelection::One(Slot(2)),
            }
        );
    }

    #[test]
    fn muted_enemy_cannot_reach_its_spells() {
        let registry = registry();
        let env = registry.env();
        let mut battle = battlefield();
        battle.combatant_mut(Slot(2)).hp = 30;
        battle.combatant_mut(Slot(2)).status.set(StatusKind::Mute, 1);
        // Cure phase is sealed by the mute; draw 80 clears both table
        // slots, so the brute swings instead.
        let mut rng = ScriptedSource::new(vec![10, 80, 0]);
        let action = choose_action(&mut battle, Slot(2), &env, &mut rng);
        assert!(matches!(action, EnemyAction::Attack { .. }));
    }

    #[test]
    fn critical_hp_sometimes_defends() {
        let registry = registry();
        let env = registry.env();
        let mut battle = battlefield();
        battle.combatant_mut(Slot(2)).hp = 10;
        battle.combatant_mut(Slot(2)).mp = 0; // no cure available
        // Cure roll 60 (no), draw 99 (no table slot), defend roll 0.
        let mut rng = ScriptedSource::new(vec![60, 99, 0]);
        let action = choose_action(&mut battle, Slot(2), &env, &mut rng);
        assert_eq!(action, EnemyAction::Defend);
    }

    #[test]
    fn charm_distributes_between_nothing_and_both_sides() {
        let mut battle = battlefield();
        battle.combatant_mut(Slot(2)).status.set(StatusKind::Charm, 3);

        let mut rng = ScriptedSource::new(vec![0]);
        assert_eq!(
            charm_action(&mut battle, Slot(2), &mut rng),
            EnemyAction::Nothing
        );

        let mut rng = ScriptedSource::new(vec![1, 0]);
        assert_eq!(
            charm_action(&mut battle, Slot(2), &mut rng),
            EnemyAction::Attack { target: Slot(0) }
        );

        // 2 and 3 turn the confusion on its own side.
        let mut rng = ScriptedSource::new(vec![2, 0]);
        assert_eq!(
            charm_action(&mut battle, Slot(2), &mut rng),
            EnemyAction::Attack { target: Slot(2) }
        );
    }
}
