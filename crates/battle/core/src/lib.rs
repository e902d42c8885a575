//! Turn-timing and resolution engine for the battle mode.
//!
//! `battle-core` decides, for a roster of up to seven combatants, who acts
//! next, what an attack or spell roll produces, how status effects
//! accumulate and expire, and when the battle ends. Everything else
//! (rendering, menus, maps, audio, persistence, the data files themselves)
//! lives behind the oracle and event boundaries in [`env`] and [`events`].
//!
//! The engine is single-threaded and cooperatively driven: the outer game
//! loop calls [`BattleController::tick`] once per frame and re-enters with
//! [`BattleController::submit_action`] whenever a hero's menu resolves.
//! All randomness flows through one injected [`RandomSource`], so a seeded
//! battle replays identically.
pub mod ai;
pub mod config;
pub mod controller;
pub mod env;
pub mod error;
pub mod events;
pub mod random;
pub mod resolve;
pub mod schedule;
pub mod state;
pub mod stats;

pub use config::BattleConfig;
pub use controller::{
    BattleController, BattleResult, BattleSetup, PlayerAction, Rewards, TickFlow,
};
pub use env::{
    Affliction, BattleEnv, ContentRegistry, Enhancement, ItemDefinition, ItemOracle,
    MonsterOracle, MonsterTemplate, Relevance, RelevanceScope, SkillDefinition, SkillEffect,
    SkillOracle, SkillPrecondition, SpellDefinition, SpellEffect, SpellOracle, TargetKind,
};
pub use error::{ActionRejected, SetupError};
pub use events::BattleEvent;
pub use random::{Pcg32, RandomSource, ScriptedSource};
pub use resolve::{ActionOutcome, DisplayAmount, ReportResource, TargetReport};
pub use state::{
    BaseStats, Battle, BattleOutcome, Bounty, CasterStat, Combatant, CoreStat, Element, HeroSeed,
    HeroWriteback, ItemId, MonsterId, OnHitImbue, Resistances, Side, SkillId, SkillRef, Slot,
    SpellId, StatBoost, StatusEffects, StatusKind, TargetSelection, TimeTier, WeaponPower,
};
