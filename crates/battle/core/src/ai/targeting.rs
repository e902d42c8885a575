//! Target selection helpers shared by the AI and the auto-pilot paths.

use crate::random::RandomSource;
use crate::state::{Battle, Side, Slot, StatusKind};

/// Eligibility mode for automatic target selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetFilter {
    /// Any living combatant on the side.
    Any,
    /// Living combatants under 75% HP; the worst-off is picked.
    NeedsCure,
    /// Living combatants missing the given status.
    Lacking(StatusKind),
}

/// Pick a target on `side`. Dead combatants are never candidates, so a
/// corpse can only be "targeted" through a stale decision, never selected
/// fresh while anyone on the side still stands.
pub fn select_target(
    battle: &Battle,
    side: Side,
    filter: TargetFilter,
    rng: &mut dyn RandomSource,
) -> Option<Slot> {
    let candidates: Vec<Slot> = battle
        .living_slots(side)
        .filter(|&slot| {
            let c = battle.combatant(slot);
            match filter {
                TargetFilter::Any => true,
                TargetFilter::NeedsCure => c.hp < c.max_hp * 75 / 100,
                TargetFilter::Lacking(status) => !c.status.has(status),
            }
        })
        .collect();
    if candidates.is_empty() {
        return None;
    }
    match filter {
        // Cure always goes to the worst-off candidate.
        TargetFilter::NeedsCure => candidates.into_iter().min_by_key(|&slot| {
            let c = battle.combatant(slot);
            // Scaled HP ratio; ties break toward the lower slot.
            (c.hp * 1000 / c.max_hp.max(1), slot.0)
        }),
        _ => {
            let pick = rng.range(0, candidates.len() as i32) as usize;
            Some(candidates[pick])
        }
    }
}

/// Count the conscious (alive and awake) combatants on a side; sweep-style
/// skills want at least two.
pub fn conscious_count(battle: &Battle, side: Side) -> usize {
    battle.living_slots(side).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedSource;
    use crate::state::{BaseStats, Combatant};

    fn battle() -> Battle {
        let hero = |name: &str, hp: i32| {
            let mut c = Combatant::named(name);
            c.stats = BaseStats {
                speed: 40,
                ..Default::default()
            };
            c.hp = hp;
            c.max_hp = 100;
            c
        };
        Battle::new(
            vec![hero("front", 100), hero("back", 30)],
            vec![hero("imp-a", 50), hero("imp-b", 90)],
        )
        .unwrap()
    }

    #[test]
    fn dead_combatants_are_never_selected_while_others_live() {
        let mut battle = battle();
        battle.combatant_mut(Slot(0)).kill();
        for roll in 0..8u32 {
            let mut rng = ScriptedSource::new(vec![roll]);
            let pick = select_target(&battle, Side::Heroes, TargetFilter::Any, &mut rng);
            assert_eq!(pick, Some(Slot(1)));
        }
    }

    #[test]
    fn needs_cure_selects_the_worst_off() {
        let battle = battle();
        let mut rng = ScriptedSource::new(vec![0]);
        let pick = select_target(&battle, Side::Heroes, TargetFilter::NeedsCure, &mut rng);
        assert_eq!(pick, Some(Slot(1)));

        // imp-a at 50/100 is the only enemy under the 75% line.
        let pick = select_target(&battle, Side::Enemies, TargetFilter::NeedsCure, &mut rng);
        assert_eq!(pick, Some(Slot(2)));
    }

    #[test]
    fn lacking_filter_skips_already_afflicted() {
        let mut battle = battle();
        battle
            .combatant_mut(Slot(2))
            .status
            .set(StatusKind::Sleep, 3);
        let mut rng = ScriptedSource::new(vec![0]);
        let pick = select_target(
            &battle,
            Side::Enemies,
            TargetFilter::Lacking(StatusKind::Sleep),
            &mut rng,
        );
        assert_eq!(pick, Some(Slot(3)));
    }

    #[test]
    fn empty_candidate_set_yields_none() {
        let mut battle = battle();
        battle.combatant_mut(Slot(2)).kill();
        battle.combatant_mut(Slot(3)).kill();
        let mut rng = ScriptedSource::new(vec![0]);
        assert_eq!(
            select_target(&battle, Side::Enemies, TargetFilter::Any, &mut rng),
            None
        );
    }
}
