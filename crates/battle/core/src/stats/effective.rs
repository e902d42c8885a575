//! Status-adjusted stat derivation.
//!
//! Resolution never works off a combatant's stored stats directly. Each
//! resolution step derives a throwaway snapshot with every active status
//! effect applied, so temporary modifiers can never leak back into the
//! persistent block.

use crate::state::{BaseStats, Combatant, StatusKind, TimeTier};

/// Derive the effective stat block for one resolution step.
///
/// Applied in order: strength boost, malison penalty, bless bonus, time
/// tier, blindness, sleep/stop, petrification. All arithmetic is integer
/// and truncating. The stats a status can degrade (attack, hit, defense,
/// speed) are floored at 1, evade at 0; with no active effects the base
/// block comes back verbatim.
pub fn effective_stats(c: &Combatant) -> BaseStats {
    let mut s = c.stats;
    let sts = &c.status;

    let strength_stacks = sts.get(StatusKind::Strength);
    if strength_stacks > 0 {
        s.attack += s.strength * strength_stacks * 50 / 100;
    }

    match sts.get(StatusKind::Malison) {
        1 => {
            s.hit = s.hit * 75 / 100;
            s.evade = s.evade * 75 / 100;
        }
        v if v >= 2 => {
            s.hit = s.hit * 50 / 100;
            s.evade = s.evade * 50 / 100;
        }
        _ => {}
    }

    let bless_stacks = sts.get(StatusKind::Bless);
    if bless_stacks > 0 {
        s.hit += bless_stacks * 25;
        s.evade += bless_stacks * 10;
    }

    match sts.time_tier() {
        TimeTier::Normal => {}
        TimeTier::Slow => {
            s.speed = s.speed * 5 / 10;
            s.hit = s.hit * 75 / 100;
            s.evade = s.evade * 75 / 100;
        }
        TimeTier::Haste => {
            s.speed = s.speed * 15 / 10;
            s.hit = s.hit * 15 / 10;
            s.evade = s.evade * 15 / 10;
        }
        TimeTier::Hyper => {
            s.speed *= 2;
            s.hit *= 2;
            s.evade *= 2;
        }
    }

    if sts.has(StatusKind::Blind) {
        s.hit = (s.hit / 4).max(1);
        s.evade = (s.evade / 4).max(1);
    }

    if sts.has(StatusKind::Sleep) || sts.has(StatusKind::Stop) {
        s.evade = 0;
    }

    if sts.has(StatusKind::Stone) {
        s.defense *= 2;
        s.evade = 0;
    }

    s.attack = s.attack.max(1);
    s.hit = s.hit.max(1);
    s.defense = s.defense.max(1);
    s.speed = s.speed.max(1);
    s.evade = s.evade.max(0);
    s
}
