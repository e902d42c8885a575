//! Battle state: the combatant records, the aggregate that owns them, and
//! the status/stat building blocks.

mod battle;
mod combatant;
mod element;
mod ids;
mod party;
mod stats;
mod status;

pub use battle::{Battle, BattleOutcome};
pub use combatant::{Bounty, Combatant, OnHitImbue, SkillRef, WeaponPower};
pub use element::{Element, Resistances};
pub use ids::{ItemId, MonsterId, Side, SkillId, Slot, SpellId, TargetSelection};
pub use party::{HeroSeed, HeroWriteback};
pub use stats::{BaseStats, CasterStat, CoreStat, StatBoost};
pub use status::{StatusEffects, StatusKind, TimeTier, shell_absorb, shield_absorb};
