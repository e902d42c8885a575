//! Boundary errors surfaced by the engine.
//!
//! Resolution itself never fails: wasted or impossible actions become no-op
//! outcomes. Errors exist only at the edges, where the embedder hands in a
//! roster or a player action that cannot be accepted.

use crate::config::BattleConfig;
use crate::state::{MonsterId, Slot, SpellId};

/// Roster construction failures at battle start.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("a battle needs at least one hero")]
    NoHeroes,

    #[error("party of {0} exceeds the {max} hero slots", max = BattleConfig::MAX_PARTY)]
    TooManyHeroes(usize),

    #[error("a battle needs at least one enemy")]
    NoEnemies,

    #[error("{0} enemies exceed the {max} enemy slots", max = BattleConfig::MAX_ENEMIES)]
    TooManyEnemies(usize),

    #[error("encounter references unknown {0}")]
    UnknownMonster(MonsterId),
}

/// Why a submitted player action was not accepted. The engine stays in the
/// awaiting state, and the input collaborator may re-query and resubmit.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionRejected {
    #[error("no combatant is awaiting input")]
    NotAwaitingInput,

    #[error("{submitted} acted out of turn; {expected} is up")]
    WrongSlot { expected: Slot, submitted: Slot },

    #[error("{0} is not in the spell table")]
    UnknownSpell(SpellId),

    #[error("caster is silenced")]
    Silenced,

    #[error("not enough MP")]
    NotEnoughMp,

    #[error("target selection does not fit the action")]
    InvalidTarget,

    #[error("item cannot be used in battle")]
    ItemNotUsable,

    #[error("escape is not possible from this battle")]
    FleeForbidden,
}
