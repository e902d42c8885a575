//! Spell resolution.
//!
//! One entry point dispatches over the spell's [`SpellEffect`]. Each arm
//! handles one behavior family; which family a spell belongs to is settled
//! in its definition at load time, never re-derived here.

use arrayvec::ArrayVec;

use crate::config::BattleConfig;
use crate::env::{Affliction, BattleEnv, Enhancement, SpellDefinition, SpellEffect, TargetKind};
use crate::random::RandomSource;
use crate::resolve::outcome::{ActionOutcome, DisplayAmount, TargetReport};
use crate::resolve::resist::{res_adjust, res_throw};
use crate::resolve::sweep_deaths;
use crate::state::{
    BaseStats, Battle, ItemId, Side, Slot, SpellId, StatusKind, TargetSelection, shell_absorb,
};

/// Resolve one spell cast. `as_item` skips the MP cost and the flat save,
/// for item invocations and imbued procs.
pub fn resolve_spell(
    battle: &mut Battle,
    caster: Slot,
    spell_id: SpellId,
    selection: TargetSelection,
    env: &BattleEnv<'_>,
    rng: &mut dyn RandomSource,
    as_item: bool,
) -> ActionOutcome {
    resolve_spell_with(battle, caster, spell_id, selection, env, rng, as_item, None)
}

/// Invoke an item's spell with the caster's mental stats overridden, the
/// way imbued equipment casts. Returns `None` when the item carries no
/// spell (a content mismatch, logged rather than fatal).
pub fn cast_imbued(
    battle: &mut Battle,
    caster: Slot,
    item: ItemId,
    power: i32,
    selection: TargetSelection,
    env: &BattleEnv<'_>,
    rng: &mut dyn RandomSource,
) -> Option<ActionOutcome> {
    let spell = match env.item(item).and_then(|def| def.spell) {
        Some(spell) => spell,
        None => {
            tracing::warn!(item = item.0, "imbued item invokes no spell");
            return None;
        }
    };
    let mut stats = battle.combatant(caster).stats;
    stats.intellect = power;
    stats.sagacity = power;
    stats.aura = 100;
    stats.spirit = 100;
    Some(resolve_spell_with(
        battle,
        caster,
        spell,
        selection,
        env,
        rng,
        true,
        Some(stats),
    ))
}

#[allow(clippy::too_many_arguments)]
fn resolve_spell_with(
    battle: &mut Battle,
    caster: Slot,
    spell_id: SpellId,
    selection: TargetSelection,
    env: &BattleEnv<'_>,
    rng: &mut dyn RandomSource,
    as_item: bool,
    stats_override: Option<BaseStats>,
) -> ActionOutcome {
    let def = env.spell(spell_id);
    let caster_stats = stats_override.unwrap_or(battle.combatant(caster).stats);
    battle.combatant_mut(caster).last_spell = Some(spell_id);

    if def.target == TargetKind::None {
        tracing::debug!(spell = %def.name, "combat cast of a non-combat spell is a no-op");
        return ActionOutcome::fizzle();
    }

    let targets = expand_targets(battle, caster, def.target, selection);
    if targets.is_empty() {
        tracing::debug!(spell = %def.name, "no eligible targets, cast wasted");
        return ActionOutcome::fizzle();
    }

    if !as_item {
        let cost = (def.mp_cost * battle.combatant(caster).mp_rate / 100).max(1);
        if battle.combatant(caster).mp < cost {
            tracing::debug!(spell = %def.name, "caster lacks the MP, cast wasted");
            return ActionOutcome::fizzle();
        }
        battle.combatant_mut(caster).adjust_mp(-cost);

        // Spells with no power, bonus, or hit chance stand entirely on the
        // caster's scale stat; a failed flat save nullifies the whole cast.
        if def.is_pure() {
            let scale = def.stat.scale_of(&caster_stats);
            if rng.range(1, 101) > scale {
                let mut outcome = ActionOutcome::fizzle();
                for &t in &targets {
                    outcome.reports.push(TargetReport::hp(t, DisplayAmount::Miss));
                }
                return outcome;
            }
        }
    }

    let group_cast = matches!(
        selection,
        TargetSelection::AllAllies | TargetSelection::AllEnemies
    ) || matches!(def.target, TargetKind::AllyAll | TargetKind::EnemyAll);

    match def.effect.clone() {
        SpellEffect::Damage => damage_arm(battle, def, &caster_stats, &targets, rng),
        SpellEffect::Heal => heal_arm(battle, def, &caster_stats, &targets, group_cast, rng),
        SpellEffect::Cleanse { ailments } => cleanse_arm(battle, &targets, &ailments),
        SpellEffect::Revive { full } => revive_arm(battle, &targets, full),
        SpellEffect::Enhance(enhancement) => {
            enhance_arm(battle, &targets, enhancement, group_cast)
        }
        SpellEffect::Afflict(affliction) => afflict_arm(battle, def, &targets, affliction, rng),
        SpellEffect::Dispel => dispel_arm(battle, def, &targets, rng),
        SpellEffect::Absorb => absorb_arm(battle, caster, def, &caster_stats, &targets, rng),
        SpellEffect::Drain => drain_arm(battle, caster, def, &caster_stats, &targets, rng),
        SpellEffect::Doom => doom_arm(battle, def, &targets, rng),
        SpellEffect::Death => death_arm(battle, def, &targets, rng),
        SpellEffect::Vision => {
            battle.vision = true;
            ActionOutcome {
                vision: true,
                ..Default::default()
            }
        }
        SpellEffect::Warp => {
            if battle.escape_allowed {
                ActionOutcome {
                    escaped: true,
                    ..Default::default()
                }
            } else {
                tracing::debug!("warp is sealed in this encounter");
                ActionOutcome::fizzle()
            }
        }
        SpellEffect::Repulse => ActionOutcome {
            repulse: true,
            ..Default::default()
        },
    }
}

/// The bounded per-cast target list.
type Targets = ArrayVec<Slot, { BattleConfig::MAX_COMBATANTS }>;

/// Expand a runtime target selection against the spell's declared breadth.
/// Sides are relative to the caster. A mismatched selection yields an empty
/// list, which the caller treats as a wasted cast.
fn expand_targets(
    battle: &Battle,
    caster: Slot,
    kind: TargetKind,
    selection: TargetSelection,
) -> Targets {
    let ally_side = caster.side();
    let side_of = |scoped_allies: bool| -> Side {
        if scoped_allies {
            ally_side
        } else {
            ally_side.opponent()
        }
    };
    match (kind, selection) {
        (TargetKind::AllyAll, _) => battle.side_slots(side_of(true)).collect(),
        (TargetKind::EnemyAll, _) => battle.side_slots(side_of(false)).collect(),
        (TargetKind::AllyOne | TargetKind::AllyOneAll, TargetSelection::One(s))
            if s.side() == ally_side && battle.get(s).is_some() =>
        {
            [s].into_iter().collect()
        }
        (TargetKind::AllyOneAll, TargetSelection::AllAllies) => {
            battle.side_slots(side_of(true)).collect()
        }
        (TargetKind::EnemyOne | TargetKind::EnemyOneAll, TargetSelection::One(s))
            if s.side() != ally_side && battle.get(s).is_some() =>
        {
            [s].into_iter().collect()
        }
        (TargetKind::EnemyOneAll, TargetSelection::AllEnemies) => {
            battle.side_slots(side_of(false)).collect()
        }
        _ => Targets::new(),
    }
}

/// The shared power roll: small powers draw from the fixed minimum span,
/// larger ones from a fifth of themselves.
fn variance(rng: &mut dyn RandomSource, power: i32) -> i32 {
    if power < BattleConfig::DMG_RND_MIN * 5 {
        rng.range(0, BattleConfig::DMG_RND_MIN)
    } else {
        rng.range(0, power / 5)
    }
}

/// Magical damage against one target after the power is settled: shell
/// absorption, magic defense, elemental resistance, and the stone damp.
fn magical_hit(battle: &Battle, slot: Slot, power: i32, def: &SpellDefinition) -> i32 {
    let target = battle.combatant(slot);
    let mut b = shell_absorb(power, target.status.get(StatusKind::Resist));
    b -= target.stats.magic_defense;
    b = b.max(0);
    if let Some(element) = def.element {
        b = res_adjust(b, target.resistances.get(element));
    }
    if target.status.has(StatusKind::Stone) && def.element.is_none_or(|e| !e.pierces_stone()) {
        b /= 10;
    }
    b
}

fn commit_hp(battle: &mut Battle, outcome: &mut ActionOutcome) {
    for report in &outcome.reports {
        if let DisplayAmount::Amount(v) = report.amount {
            battle.combatant_mut(report.slot).adjust_hp(v);
        }
    }
    sweep_deaths(battle, &mut outcome.reports);
}

fn damage_arm(
    battle: &mut Battle,
    def: &SpellDefinition,
    caster_stats: &BaseStats,
    targets: &[Slot],
    rng: &mut dyn RandomSource,
) -> ActionOutcome {
    let mut outcome = ActionOutcome::default();

    let living = targets
        .iter()
        .filter(|&&s| {
            let c = battle.combatant(s);
            c.is_alive() && c.max_hp > 0
        })
        .count() as i32;
    if living == 0 {
        tracing::debug!(spell = %def.name, "damage spell found nobody standing");
        return ActionOutcome::fizzle();
    }

    let mut power = def.power + def.stat.power_of(caster_stats) * def.bonus / 100;
    power += variance(rng, power);
    power = power.max(1);
    power = power * def.stat.scale_of(caster_stats) / 100;
    power = power.max(0);
    // One-or-all group casts split their power; dedicated full-group
    // spells land whole on every target.
    if living > 1 && def.target != TargetKind::EnemyAll {
        power /= living;
    }

    for &slot in targets {
        let (alive, has_pool) = {
            let c = battle.combatant(slot);
            (c.is_alive(), c.max_hp > 0)
        };
        if !alive || !has_pool {
            continue;
        }
        let b = magical_hit(battle, slot, power, def);
        outcome
            .reports
            .push(TargetReport::hp(slot, DisplayAmount::Amount(-b)));

        if b > 0 && def.element == Some(crate::state::Element::Poison) {
            let res = battle
                .combatant(slot)
                .resistances
                .get(crate::state::Element::Poison);
            if !battle.combatant(slot).status.has(StatusKind::Poison)
                && !res_throw(rng, res)
                && rng.percent(def.hit_chance)
            {
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

    commit_hp(battle, &mut outcome);
    outcome
}

fn heal_arm(
    battle: &mut Battle,
    def: &SpellDefinition,
    caster_stats: &BaseStats,
    targets: &[Slot],
    group_cast: bool,
    rng: &mut dyn RandomSource,
) -> ActionOutcome {
    let mut outcome = ActionOutcome::default();
    let eligible: Vec<Slot> = targets
        .iter()
        .copied()
        .filter(|&s| {
            let c = battle.combatant(s);
            c.is_alive() && !c.status.has(StatusKind::Stone)
        })
        .collect();
    if eligible.is_empty() {
        tracing::debug!(spell = %def.name, "nobody to cure");
        return ActionOutcome::fizzle();
    }

    let power = def.power + def.stat.power_of(caster_stats) * def.bonus / 100;
    let mut b = power + variance(rng, power);
    b = b * def.stat.scale_of(caster_stats) / 100;
    b = b.max(1);
    if group_cast {
        b /= eligible.len() as i32;
    }

    for slot in eligible {
        let tier = battle.combatant(slot).status.get(StatusKind::Resist);
        let amount = shell_absorb(b, tier);
        outcome
            .reports
            .push(TargetReport::hp(slot, DisplayAmount::Amount(amount)));
        battle.combatant_mut(slot).adjust_hp(amount);
    }
    outcome
}

fn cleanse_arm(battle: &mut Battle, targets: &[Slot], ailments: &[StatusKind]) -> ActionOutcome {
    let mut outcome = ActionOutcome::default();
    for &slot in targets {
        if !battle.combatant(slot).is_alive() {
            outcome
                .reports
                .push(TargetReport::hp(slot, DisplayAmount::Miss));
            continue;
        }
        for &ailment in ailments {
            if battle.combatant(slot).status.has(ailment) {
                battle.combatant_mut(slot).status.clear(ailment);
                outcome.removed.push((slot, ailment));
            }
        }
        outcome
            .reports
            .push(TargetReport::hp(slot, DisplayAmount::NoDisplay));
    }
    outcome
}

fn revive_arm(battle: &mut Battle, targets: &[Slot], full: bool) -> ActionOutcome {
    let mut outcome = ActionOutcome::default();
    for &slot in targets {
        let dead = !battle.combatant(slot).is_alive();
        if !dead {
            outcome
                .reports
                .push(TargetReport::hp(slot, DisplayAmount::Miss));
            continue;
        }
        let c = battle.combatant_mut(slot);
        c.status.clear_all();
        c.hp = if full { c.max_hp } else { 1 };
        c.ready = true;
        outcome.removed.push((slot, StatusKind::Dead));
        outcome
            .reports
            .push(TargetReport::hp(slot, DisplayAmount::NoDisplay));
    }
    outcome
}

fn enhance_arm(
    battle: &mut Battle,
    targets: &[Slot],
    enhancement: Enhancement,
    group_cast: bool,
) -> ActionOutcome {
    let mut outcome = ActionOutcome::default();
    for &slot in targets {
        let report = apply_enhancement(battle, slot, enhancement, group_cast, &mut outcome);
        outcome.reports.push(TargetReport::hp(slot, report));
    }
    outcome
}

fn apply_enhancement(
    battle: &mut Battle,
    slot: Slot,
    enhancement: Enhancement,
    group_cast: bool,
    outcome: &mut ActionOutcome,
) -> DisplayAmount {
    if !battle.combatant(slot).is_alive() {
        return DisplayAmount::Miss;
    }
    let regen_anchor = battle.round_phase + 1;
    let c = battle.combatant_mut(slot);
    let applied = match enhancement {
        Enhancement::Trueshot => {
            if c.status.has(StatusKind::Trueshot) {
                return DisplayAmount::Miss;
            }
            c.status.set(StatusKind::Trueshot, 1);
            StatusKind::Trueshot
        }
        Enhancement::Ether => {
            if c.status.has(StatusKind::Ether) {
                return DisplayAmount::Miss;
            }
            c.status.set(StatusKind::Ether, 3);
            StatusKind::Ether
        }
        Enhancement::Regen => {
            if c.status.has(StatusKind::Regen) {
                return DisplayAmount::Miss;
            }
            c.status.set(StatusKind::Regen, regen_anchor);
            StatusKind::Regen
        }
        Enhancement::Strength => {
            if c.status.get(StatusKind::Strength) >= 2 {
                return DisplayAmount::Miss;
            }
            c.status.adjust(StatusKind::Strength, 1);
            StatusKind::Strength
        }
        Enhancement::Shell => {
            if c.status.has(StatusKind::Resist) {
                return DisplayAmount::Miss;
            }
            c.status.set(StatusKind::Resist, 1);
            StatusKind::Resist
        }
        Enhancement::Wall => {
            if c.status.get(StatusKind::Resist) == 2 {
                return DisplayAmount::Miss;
            }
            c.status.set(StatusKind::Resist, 2);
            StatusKind::Resist
        }
        Enhancement::Shield => {
            if c.status.has(StatusKind::Shield) {
                return DisplayAmount::Miss;
            }
            c.status.set(StatusKind::Shield, 1);
            StatusKind::Shield
        }
        Enhancement::GreaterShield => {
            if c.status.get(StatusKind::Shield) >= 2 {
                return DisplayAmount::Miss;
            }
            c.status.set(StatusKind::Shield, 2);
            StatusKind::Shield
        }
        Enhancement::DivineGuard => {
            let shield = c.status.get(StatusKind::Shield);
            let resist = c.status.get(StatusKind::Resist);
            if shield >= 2 && resist >= 2 {
                return DisplayAmount::Miss;
            }
            if shield < 2 {
                c.status.set(StatusKind::Shield, 2);
            }
            if resist < 2 {
                c.status.set(StatusKind::Resist, 2);
            }
            StatusKind::Shield
        }
        Enhancement::Bless => {
            if c.status.get(StatusKind::Bless) >= 3 {
                return DisplayAmount::Miss;
            }
            c.status.adjust(StatusKind::Bless, 1);
            let boost = (c.max_hp / 10).max(10);
            c.max_hp += boost;
            c.hp += boost;
            StatusKind::Bless
        }
        Enhancement::Haste => {
            if group_cast && c.status.has(StatusKind::Stone) {
                return DisplayAmount::Miss;
            }
            match c.status.get(StatusKind::Time) {
                2 => return DisplayAmount::Miss,
                1 => {
                    c.status.clear(StatusKind::Time);
                    outcome.removed.push((slot, StatusKind::Time));
                    return DisplayAmount::NoDisplay;
                }
                _ => {
                    c.status.set(StatusKind::Time, 2);
                    StatusKind::Time
                }
            }
        }
    };
    outcome.applied.push((slot, applied));
    DisplayAmount::NoDisplay
}

/// Shared prelude of every hostile status/special arm: petrified targets
/// and a passed resistance throw shrug the spell off before the save.
fn hostile_gate(
    battle: &Battle,
    slot: Slot,
    def: &SpellDefinition,
    rng: &mut dyn RandomSource,
) -> bool {
    let target = battle.combatant(slot);
    if !target.is_alive() || target.status.has(StatusKind::Stone) {
        return false;
    }
    if let Some(element) = def.element {
        if res_throw(rng, target.resistances.get(element)) {
            return false;
        }
    }
    true
}

fn afflict_arm(
    battle: &mut Battle,
    def: &SpellDefinition,
    targets: &[Slot],
    affliction: Affliction,
    rng: &mut dyn RandomSource,
) -> ActionOutcome {
    let mut outcome = ActionOutcome::default();
    for &slot in targets {
        // Petrify is itself the stone spell; the usual stone gate would
        // wall it off, so it only honors the resistance throw.
        let pass = if affliction == Affliction::Petrify {
            let alive = battle.combatant(slot).is_alive();
            let resisted = def.element.is_some_and(|el| {
                res_throw(rng, battle.combatant(slot).resistances.get(el))
            });
            alive && !resisted
        } else {
            hostile_gate(battle, slot, def, rng)
        };
        if !pass {
            outcome
                .reports
                .push(TargetReport::hp(slot, DisplayAmount::Miss));
            continue;
        }
        if !rng.percent(def.hit_chance) {
            outcome
                .reports
                .push(TargetReport::hp(slot, DisplayAmount::Miss));
            continue;
        }
        let report = apply_affliction(battle, slot, affliction, rng, &mut outcome);
        outcome.reports.push(TargetReport::hp(slot, report));
    }
    outcome
}

fn apply_affliction(
    battle: &mut Battle,
    slot: Slot,
    affliction: Affliction,
    rng: &mut dyn RandomSource,
    outcome: &mut ActionOutcome,
) -> DisplayAmount {
    let sts = &mut battle.combatant_mut(slot).status;
    let (kind, value) = match affliction {
        Affliction::Blind => {
            if sts.has(StatusKind::Blind) {
                return DisplayAmount::Miss;
            }
            (StatusKind::Blind, 1)
        }
        Affliction::Charm => {
            if sts.has(StatusKind::Charm) {
                return DisplayAmount::Miss;
            }
            (StatusKind::Charm, rng.range(3, 6))
        }
        Affliction::Petrify => {
            sts.clear_all_except_dead();
            (StatusKind::Stone, rng.range(3, 6))
        }
        Affliction::Hold => {
            if sts.has(StatusKind::Stop) {
                return DisplayAmount::Miss;
            }
            (StatusKind::Stop, rng.range(2, 5))
        }
        Affliction::Silence => {
            if sts.has(StatusKind::Mute) {
                return DisplayAmount::Miss;
            }
            (StatusKind::Mute, 1)
        }
        Affliction::Sleep => {
            if sts.has(StatusKind::Sleep) {
                return DisplayAmount::Miss;
            }
            (StatusKind::Sleep, rng.range(4, 6))
        }
        Affliction::Nausea => {
            if sts.has(StatusKind::Malison) {
                return DisplayAmount::Miss;
            }
            (StatusKind::Malison, 1)
        }
        Affliction::Malison => {
            if sts.has(StatusKind::Malison) {
                return DisplayAmount::Miss;
            }
            (StatusKind::Malison, 2)
        }
        Affliction::Slow => match sts.get(StatusKind::Time) {
            2 => {
                sts.clear(StatusKind::Time);
                outcome.removed.push((slot, StatusKind::Time));
                return DisplayAmount::NoDisplay;
            }
            0 => (StatusKind::Time, 1),
            _ => return DisplayAmount::Miss,
        },
    };
    sts.set(kind, value);
    outcome.applied.push((slot, kind));
    DisplayAmount::NoDisplay
}

fn dispel_arm(
    battle: &mut Battle,
    def: &SpellDefinition,
    targets: &[Slot],
    rng: &mut dyn RandomSource,
) -> ActionOutcome {
    let mut outcome = ActionOutcome::default();
    for &slot in targets {
        if !hostile_gate(battle, slot, def, rng) || !rng.percent(def.hit_chance) {
            outcome
                .reports
                .push(TargetReport::hp(slot, DisplayAmount::Miss));
            continue;
        }
        let mut stripped = 0;
        {
            let sts = &mut battle.combatant_mut(slot).status;
            for kind in [
                StatusKind::Resist,
                StatusKind::Shield,
                StatusKind::Bless,
                StatusKind::Strength,
            ] {
                if sts.has(kind) {
                    sts.clear(kind);
                    outcome.removed.push((slot, kind));
                    stripped += 1;
                }
            }
            // Only the haste tiers count as a dispellable time effect.
            if sts.get(StatusKind::Time) > 1 {
                sts.clear(StatusKind::Time);
                outcome.removed.push((slot, StatusKind::Time));
                stripped += 1;
            }
        }
        let report = if stripped == 0 {
            DisplayAmount::Miss
        } else {
            DisplayAmount::NoDisplay
        };
        outcome.reports.push(TargetReport::hp(slot, report));
    }
    outcome
}

fn absorb_arm(
    battle: &mut Battle,
    caster: Slot,
    def: &SpellDefinition,
    caster_stats: &BaseStats,
    targets: &[Slot],
    rng: &mut dyn RandomSource,
) -> ActionOutcome {
    let mut outcome = ActionOutcome::default();
    let Some(&slot) = targets.first() else {
        return ActionOutcome::fizzle();
    };
    if !hostile_gate(battle, slot, def, rng) {
        outcome
            .reports
            .push(TargetReport::mp(slot, DisplayAmount::Miss));
        return outcome;
    }

    let mut r = -rolled_power_against(battle, slot, def, caster_stats, rng);
    if !rng.percent(def.hit_chance) {
        r /= 2;
    }
    if battle.combatant(slot).mp < r.abs() {
        r = -battle.combatant(slot).mp;
    }
    battle.combatant_mut(slot).adjust_mp(r);
    battle.combatant_mut(caster).adjust_mp(-r);
    outcome
        .reports
        .push(TargetReport::mp(slot, DisplayAmount::Amount(r)));
    outcome
        .reports
        .push(TargetReport::mp(caster, DisplayAmount::Amount(-r)));
    outcome
}

fn drain_arm(
    battle: &mut Battle,
    caster: Slot,
    def: &SpellDefinition,
    caster_stats: &BaseStats,
    targets: &[Slot],
    rng: &mut dyn RandomSource,
) -> ActionOutcome {
    let mut outcome = ActionOutcome::default();
    let Some(&slot) = targets.first() else {
        return ActionOutcome::fizzle();
    };
    if !hostile_gate(battle, slot, def, rng) {
        outcome
            .reports
            .push(TargetReport::hp(slot, DisplayAmount::Miss));
        return outcome;
    }

    let mut r = -rolled_power_against(battle, slot, def, caster_stats, rng);
    if !rng.percent(def.hit_chance) {
        r /= 2;
    }
    if battle.combatant(slot).undead_level > 0 {
        // The undead drain the drainer.
        if battle.combatant(caster).hp < r.abs() {
            r = -battle.combatant(caster).hp;
        }
        outcome
            .reports
            .push(TargetReport::hp(slot, DisplayAmount::Amount(-r)));
        outcome
            .reports
            .push(TargetReport::hp(caster, DisplayAmount::Amount(r)));
    } else {
        if battle.combatant(slot).hp < r.abs() {
            r = -battle.combatant(slot).hp;
        }
        outcome
            .reports
            .push(TargetReport::hp(slot, DisplayAmount::Amount(r)));
        outcome
            .reports
            .push(TargetReport::hp(caster, DisplayAmount::Amount(-r)));
    }
    commit_hp(battle, &mut outcome);
    outcome
}

/// Power pipeline for the transfer spells, which run the full magical
/// damage computation against a single target.
fn rolled_power_against(
    battle: &Battle,
    slot: Slot,
    def: &SpellDefinition,
    caster_stats: &BaseStats,
    rng: &mut dyn RandomSource,
) -> i32 {
    let mut power = def.power + def.stat.power_of(caster_stats) * def.bonus / 100;
    power += variance(rng, power);
    power = power.max(1);
    power = power * def.stat.scale_of(caster_stats) / 100;
    power = power.max(0);
    magical_hit(battle, slot, power, def)
}

fn doom_arm(
    battle: &mut Battle,
    def: &SpellDefinition,
    targets: &[Slot],
    rng: &mut dyn RandomSource,
) -> ActionOutcome {
    let mut outcome = ActionOutcome::default();
    for &slot in targets {
        if !hostile_gate(battle, slot, def, rng) || !rng.percent(def.hit_chance) {
            outcome
                .reports
                .push(TargetReport::hp(slot, DisplayAmount::Miss));
            continue;
        }
        let hp = battle.combatant(slot).hp;
        let mut a = (hp * 3 / 4).max(1);
        if hp - a < 1 {
            a = hp - 1;
        }
        outcome
            .reports
            .push(TargetReport::hp(slot, DisplayAmount::Amount(-a)));
    }
    commit_hp(battle, &mut outcome);
    outcome
}

fn death_arm(
    battle: &mut Battle,
    def: &SpellDefinition,
    targets: &[Slot],
    rng: &mut dyn RandomSource,
) -> ActionOutcome {
    let mut outcome = ActionOutcome::default();
    for &slot in targets {
        if !hostile_gate(battle, slot, def, rng) || !rng.percent(def.hit_chance) {
            outcome
                .reports
                .push(TargetReport::hp(slot, DisplayAmount::Miss));
            continue;
        }
        let hp = battle.combatant(slot).hp;
        outcome
            .reports
            .push(TargetReport::hp(slot, DisplayAmount::Amount(-hp)));
    }
    commit_hp(battle, &mut outcome);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{Affliction, ContentRegistry, Enhancement, SpellEffect, TargetKind};
    use crate::random::ScriptedSource;
    use crate::state::{CasterStat, Combatant, Element};

    fn spell(
        name: &str,
        power: i32,
        bonus: i32,
        hit_chance: i32,
        mp_cost: i32,
        element: Option<Element>,
        target: TargetKind,
        effect: SpellEffect,
    ) -> SpellDefinition {
        let relevance = SpellDefinition::default_relevance(&effect, target);
        SpellDefinition {
            name: name.into(),
            power,
            bonus,
            hit_chance,
            mp_cost,
            stat: CasterStat::Intellect,
            element,
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
            spell(
                "fireball",
                30,
                50,
                0,
                5,
                Some(Element::Fire),
                TargetKind::EnemyOneAll,
                SpellEffect::Damage,
            ),
        );
        r.add_spell(
            SpellId(2),
            spell(
                "cure",
                20,
                100,
                0,
                4,
                None,
                TargetKind::AllyOneAll,
                SpellEffect::Heal,
            ),
        );
        r.add_spell(
            SpellId(3),
            spell(
                "sleep",
                0,
                0,
                75,
                3,
                Some(Element::Sleep),
                TargetKind::EnemyOne,
                SpellEffect::Afflict(Affliction::Sleep),
            ),
        );
        r.add_spell(
            SpellId(4),
            spell(
                "shield",
                0,
                0,
                0,
                2,
                None,
                TargetKind::AllyOne,
                SpellEffect::Enhance(Enhancement::Shield),
            ),
        );
        r.add_spell(
            SpellId(5),
            spell(
                "bless",
                0,
                0,
                0,
                4,
                None,
                TargetKind::AllyAll,
                SpellEffect::Enhance(Enhancement::Bless),
            ),
        );
        r.add_spell(
            SpellId(6),
            spell(
                "drain",
                25,
                0,
                50,
                6,
                None,
                TargetKind::EnemyOne,
                SpellEffect::Drain,
            ),
        );
        r.add_spell(
            SpellId(7),
            spell(
                "doom",
                0,
                0,
                60,
                6,
                None,
                TargetKind::EnemyOne,
                SpellEffect::Doom,
            ),
        );
        r.add_spell(
            SpellId(8),
            spell("warp", 0, 0, 0, 8, None, TargetKind::AllyAll, SpellEffect::Warp),
        );
        r.add_spell(
            SpellId(9),
            spell(
                "absorb",
                10,
                0,
                40,
                3,
                None,
                TargetKind::EnemyOne,
                SpellEffect::Absorb,
            ),
        );
        r.add_spell(
            SpellId(10),
            spell(
                "life",
                0,
                0,
                1,
                12,
                None,
                TargetKind::AllyOne,
                SpellEffect::Revive { full: false },
            ),
        );
        r
    }

    fn arena() -> Battle {
        let mut caster = Combatant::named("mage");
        caster.stats.intellect = 20;
        caster.stats.sagacity = 20;
        caster.stats.aura = 100;
        caster.stats.spirit = 100;
        caster.stats.speed = 40;
        caster.hp = 40;
        caster.max_hp = 60;
        caster.mp = 30;
        caster.max_mp = 30;

        let mut second = Combatant::named("squire");
        second.stats.speed = 40;
        second.hp = 30;
        second.max_hp = 60;
        second.mp = 5;
        second.max_mp = 5;

        let imp = |name: &str| {
            let mut c = Combatant::named(name);
            c.stats.magic_defense = 2;
            c.stats.speed = 40;
            c.hp = 50;
            c.max_hp = 50;
            c.mp = 8;
            c.max_mp = 8;
            c
        };
        Battle::new(vec![caster, second], vec![imp("imp-a"), imp("imp-b")]).unwrap()
    }

    #[test]
    fn group_damage_splits_power_and_spends_mp() {
        let registry = registry();
        let env = registry.env();
        let mut battle = arena();
        let mut rng = ScriptedSource::new(vec![0]);
        let outcome = resolve_spell(
            &mut battle,
            Slot(0),
            SpellId(1),
            TargetSelection::AllEnemies,
            &env,
            &mut rng,
            false,
        );
        // power = 30 + 20*50/100 = 40, split over 2 -> 20, minus magdef 2.
        for report in &outcome.reports {
            assert_eq!(report.amount, DisplayAmount::Amount(-18));
        }
        assert_eq!(battle.combatant(Slot(2)).hp, 32);
        assert_eq!(battle.combatant(Slot(3)).hp, 32);
        assert_eq!(battle.combatant(Slot(0)).mp, 25);
    }

    #[test]
    fn damage_cast_at_a_dead_side_is_a_noop() {
        let registry = registry();
        let env = registry.env();
        let mut battle = arena();
        battle.combatant_mut(Slot(2)).kill();
        battle.combatant_mut(Slot(3)).kill();
        let mut rng = ScriptedSource::new(vec![0]);
        let outcome = resolve_spell(
            &mut battle,
            Slot(0),
            SpellId(1),
            TargetSelection::AllEnemies,
            &env,
            &mut rng,
            false,
        );
        assert!(outcome.fizzled);
        assert!(outcome.reports.is_empty());
    }

    #[test]
    fn heal_splits_over_the_party_and_respects_shell() {
        let registry = registry();
        let env = registry.env();
        let mut battle = arena();
        battle.combatant_mut(Slot(1)).status.set(StatusKind::Resist, 2);
        let mut rng = ScriptedSource::new(vec![0]);
        let outcome = resolve_spell(
            &mut battle,
            Slot(0),
            SpellId(2),
            TargetSelection::AllAllies,
            &env,
            &mut rng,
            false,
        );
        // power = 20 + 20 = 40, split over 2 -> 20; shell tier 2 halves.
        assert_eq!(outcome.report_for(Slot(0)).unwrap().amount, DisplayAmount::Amount(20));
        assert_eq!(outcome.report_for(Slot(1)).unwrap().amount, DisplayAmount::Amount(10));
        assert_eq!(battle.combatant(Slot(1)).hp, 40);
    }

    #[test]
    fn sleep_lands_then_reports_ineffective_while_active() {
        let registry = registry();
        let env = registry.env();
        let mut battle = arena();
        let mut rng = ScriptedSource::new(vec![10, 1]);
        let outcome = resolve_spell(
            &mut battle,
            Slot(0),
            SpellId(3),
            TargetSelection::One(Slot(2)),
            &env,
            &mut rng,
            false,
        );
        assert!(outcome.applied.contains(&(Slot(2), StatusKind::Sleep)));
        assert_eq!(battle.combatant(Slot(2)).status.get(StatusKind::Sleep), 5);

        let mut rng = ScriptedSource::new(vec![10, 1]);
        let again = resolve_spell(
            &mut battle,
            Slot(0),
            SpellId(3),
            TargetSelection::One(Slot(2)),
            &env,
            &mut rng,
            false,
        );
        assert_eq!(again.reports[0].amount, DisplayAmount::Miss);
        assert!(again.applied.is_empty());
    }

    #[test]
    fn pure_spell_save_nullifies_the_whole_cast() {
        let registry = registry();
        let env = registry.env();
        let mut battle = arena();
        battle.combatant_mut(Slot(0)).stats.aura = 30;
        // range(1,101) = 1 + 50 % 100 = 51 > 30 -> fail.
        let mut rng = ScriptedSource::new(vec![50]);
        let outcome = resolve_spell(
            &mut battle,
            Slot(0),
            SpellId(4),
            TargetSelection::One(Slot(1)),
            &env,
            &mut rng,
            false,
        );
        assert!(outcome.fizzled);
        assert_eq!(outcome.reports[0].amount, DisplayAmount::Miss);
        assert!(!battle.combatant(Slot(1)).status.has(StatusKind::Shield));
        // MP is still spent on the failed cast.
        assert_eq!(battle.combatant(Slot(0)).mp, 28);
    }

    #[test]
    fn insufficient_mp_is_a_wasted_turn_not_a_panic() {
        let registry = registry();
        let env = registry.env();
        let mut battle = arena();
        battle.combatant_mut(Slot(0)).mp = 0;
        let mut rng = ScriptedSource::new(vec![0]);
        let outcome = resolve_spell(
            &mut battle,
            Slot(0),
            SpellId(1),
            TargetSelection::AllEnemies,
            &env,
            &mut rng,
            false,
        );
        assert!(outcome.fizzled);
        assert_eq!(battle.combatant(Slot(2)).hp, 50);
    }

    #[test]
    fn bless_is_idempotent_at_three_stacks() {
        let registry = registry();
        let env = registry.env();
        let mut battle = arena();
        for slot in [Slot(0), Slot(1)] {
            battle.combatant_mut(slot).status.set(StatusKind::Bless, 3);
        }
        let mut rng = ScriptedSource::new(vec![0]);
        let outcome = resolve_spell(
            &mut battle,
            Slot(0),
            SpellId(5),
            TargetSelection::AllAllies,
            &env,
            &mut rng,
            false,
        );
        for report in &outcome.reports {
            assert_eq!(report.amount, DisplayAmount::Miss);
        }
        assert_eq!(battle.combatant(Slot(0)).status.get(StatusKind::Bless), 3);
    }

    #[test]
    fn bless_raises_max_hp_with_each_stack() {
        let registry = registry();
        let env = registry.env();
        let mut battle = arena();
        let mut rng = ScriptedSource::new(vec![0]);
        resolve_spell(
            &mut battle,
            Slot(0),
            SpellId(5),
            TargetSelection::AllAllies,
            &env,
            &mut rng,
            false,
        );
        let mage = battle.combatant(Slot(0));
        assert_eq!(mage.status.get(StatusKind::Bless), 1);
        assert_eq!(mage.max_hp, 70);
        assert_eq!(mage.hp, 50);
    }

    #[test]
    fn drain_moves_hp_to_the_caster() {
        let registry = registry();
        let env = registry.env();
        let mut battle = arena();
        let mut rng = ScriptedSource::new(vec![0, 0]);
        let outcome = resolve_spell(
            &mut battle,
            Slot(0),
            SpellId(6),
            TargetSelection::One(Slot(2)),
            &env,
            &mut rng,
            false,
        );
        // 25 rolled, minus magdef 2 -> 23 drained.
        assert_eq!(outcome.report_for(Slot(2)).unwrap().amount, DisplayAmount::Amount(-23));
        assert_eq!(battle.combatant(Slot(2)).hp, 27);
        assert_eq!(battle.combatant(Slot(0)).hp, 60); // clamped at max
    }

    #[test]
    fn drain_reverses_against_the_undead() {
        let registry = registry();
        let env = registry.env();
        let mut battle = arena();
        battle.combatant_mut(Slot(2)).undead_level = 2;
        let mut rng = ScriptedSource::new(vec![0, 0]);
        resolve_spell(
            &mut battle,
            Slot(0),
            SpellId(6),
            TargetSelection::One(Slot(2)),
            &env,
            &mut rng,
            false,
        );
        assert_eq!(battle.combatant(Slot(2)).hp, 50); // healed, clamped at max
        assert_eq!(battle.combatant(Slot(0)).hp, 17); // the caster paid
    }

    #[test]
    fn absorb_moves_mp() {
        let registry = registry();
        let env = registry.env();
        let mut battle = arena();
        battle.combatant_mut(Slot(0)).mp = 10;
        let mut rng = ScriptedSource::new(vec![0, 0]);
        let outcome = resolve_spell(
            &mut battle,
            Slot(0),
            SpellId(9),
            TargetSelection::One(Slot(2)),
            &env,
            &mut rng,
            false,
        );
        assert_eq!(outcome.report_for(Slot(2)).unwrap().resource, super::super::ReportResource::Mp);
        // cost 3 leaves 7; rolled 10 - magdef 2 = 8 absorbed, capped by the
        // imp's 8 MP.
        assert_eq!(battle.combatant(Slot(2)).mp, 0);
        assert_eq!(battle.combatant(Slot(0)).mp, 15);
    }

    #[test]
    fn doom_never_kills_outright() {
        let registry = registry();
        let env = registry.env();
        let mut battle = arena();
        let mut rng = ScriptedSource::new(vec![0]);
        resolve_spell(
            &mut battle,
            Slot(0),
            SpellId(7),
            TargetSelection::One(Slot(2)),
            &env,
            &mut rng,
            false,
        );
        assert_eq!(battle.combatant(Slot(2)).hp, 13);
        assert!(battle.combatant(Slot(2)).is_alive());

        // Even at 1 HP the victim survives with nothing to take.
        battle.combatant_mut(Slot(3)).hp = 1;
        let mut rng = ScriptedSource::new(vec![0]);
        resolve_spell(
            &mut battle,
            Slot(0),
            SpellId(7),
            TargetSelection::One(Slot(3)),
            &env,
            &mut rng,
            false,
        );
        assert_eq!(battle.combatant(Slot(3)).hp, 1);
    }

    #[test]
    fn warp_escapes_unless_sealed() {
        let registry = registry();
        let env = registry.env();
        let mut battle = arena();
        let mut rng = ScriptedSource::new(vec![0]);
        let outcome = resolve_spell(
            &mut battle,
            Slot(0),
            SpellId(8),
            TargetSelection::AllAllies,
            &env,
            &mut rng,
            false,
        );
        assert!(outcome.escaped);

        let mut battle = arena();
        battle.escape_allowed = false;
        let mut rng = ScriptedSource::new(vec![0]);
        let outcome = resolve_spell(
            &mut battle,
            Slot(0),
            SpellId(8),
            TargetSelection::AllAllies,
            &env,
            &mut rng,
            false,
        );
        assert!(!outcome.escaped);
        assert!(outcome.fizzled);
    }

    #[test]
    fn revive_restores_a_dead_ally_only() {
        let registry = registry();
        let env = registry.env();
        let mut battle = arena();
        battle.combatant_mut(Slot(1)).kill();
        let outcome = resolve_spell(
            &mut battle,
            Slot(0),
            SpellId(10),
            TargetSelection::One(Slot(1)),
            &env,
            &mut ScriptedSource::new(vec![0]),
            true,
        );
        assert!(outcome.removed.contains(&(Slot(1), StatusKind::Dead)));
        let squire = battle.combatant(Slot(1));
        assert!(squire.is_alive());
        assert_eq!(squire.hp, 1);

        // Casting at the living reports ineffective.
        let again = resolve_spell(
            &mut battle,
            Slot(0),
            SpellId(10),
            TargetSelection::One(Slot(1)),
            &env,
            &mut ScriptedSource::new(vec![0]),
            true,
        );
        assert_eq!(again.reports[0].amount, DisplayAmount::Miss);
    }
}
