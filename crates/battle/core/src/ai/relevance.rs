//! Uniform interpretation of spell relevance descriptors.

use crate::env::{Relevance, RelevanceScope};
use crate::state::{Battle, Side, Slot, StatusKind};

/// Would casting a spell with this relevance descriptor change anything
/// right now? Interpreted from the caster's point of view.
pub fn is_relevant(battle: &Battle, caster: Slot, relevance: Relevance) -> bool {
    let scope_side = |scope: RelevanceScope| -> Side {
        match scope {
            RelevanceScope::Allies => caster.side(),
            RelevanceScope::Foes => caster.side().opponent(),
        }
    };
    match relevance {
        Relevance::Always => true,
        Relevance::StatusOpen { status, cap, scope } => battle
            .living_slots(scope_side(scope))
            .any(|slot| battle.combatant(slot).status.get(status) < cap),
        Relevance::TimeTierOpen { tier, scope } => battle
            .living_slots(scope_side(scope))
            .any(|slot| battle.combatant(slot).status.get(StatusKind::Time) != tier),
        Relevance::CasterHpBelow {
            numerator,
            denominator,
        } => {
            let c = battle.combatant(caster);
            c.hp < c.max_hp * numerator / denominator
        }
        Relevance::TargetsHealthy {
            numerator,
            denominator,
        } => battle
            .living_slots(caster.side().opponent())
            .any(|slot| {
                let c = battle.combatant(slot);
                c.hp >= c.max_hp * numerator / denominator
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{BaseStats, Combatant};

    fn battle() -> Battle {
        let fighter = |name: &str| {
            let mut c = Combatant::named(name);
            c.stats = BaseStats {
                speed: 40,
                ..Default::default()
            };
            c.hp = 80;
            c.max_hp = 80;
            c
        };
        Battle::new(
            vec![fighter("hero-a"), fighter("hero-b")],
            vec![fighter("imp-a"), fighter("imp-b")],
        )
        .unwrap()
    }

    #[test]
    fn shield_is_irrelevant_once_everyone_is_shielded() {
        let mut battle = battle();
        let relevance = Relevance::StatusOpen {
            status: StatusKind::Shield,
            cap: 1,
            scope: RelevanceScope::Allies,
        };
        // Enemy casting on its own side.
        assert!(is_relevant(&battle, Slot(2), relevance));
        battle.combatant_mut(Slot(2)).status.set(StatusKind::Shield, 1);
        assert!(is_relevant(&battle, Slot(2), relevance));
        battle.combatant_mut(Slot(3)).status.set(StatusKind::Shield, 1);
        assert!(!is_relevant(&battle, Slot(2), relevance));
    }

    #[test]
    fn dead_allies_do_not_keep_a_buff_relevant() {
        let mut battle = battle();
        let relevance = Relevance::StatusOpen {
            status: StatusKind::Shield,
            cap: 1,
            scope: RelevanceScope::Allies,
        };
        battle.combatant_mut(Slot(2)).status.set(StatusKind::Shield, 1);
        battle.combatant_mut(Slot(3)).kill();
        assert!(!is_relevant(&battle, Slot(2), relevance));
    }

    #[test]
    fn drain_relevance_follows_the_caster_hp() {
        let mut battle = battle();
        let relevance = Relevance::CasterHpBelow {
            numerator: 1,
            denominator: 2,
        };
        assert!(!is_relevant(&battle, Slot(2), relevance));
        battle.combatant_mut(Slot(2)).hp = 30;
        assert!(is_relevant(&battle, Slot(2), relevance));
    }

    #[test]
    fn doom_is_pointless_against_a_battered_party() {
        let mut battle = battle();
        let relevance = Relevance::TargetsHealthy {
            numerator: 1,
            denominator: 3,
        };
        assert!(is_relevant(&battle, Slot(2), relevance));
        battle.combatant_mut(Slot(0)).hp = 10;
        battle.combatant_mut(Slot(1)).hp = 10;
        assert!(!is_relevant(&battle, Slot(2), relevance));
    }
}
