//! Data-driven battle content and its loaders.
//!
//! This crate implements the data-loader collaborator the engine assumes:
//! RON tables for spells, monster templates, special skills, items, and
//! encounter groups, plus a TOML balance table. Loaders validate every
//! cross-reference before handing the engine a [`battle_core::ContentRegistry`],
//! so resolution code may treat the tables as pre-validated.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    EncounterGroup, EncounterLoader, ItemLoader, MonsterLoader, SkillLoader, SpellLoader,
    TablesLoader, load_registry,
};
