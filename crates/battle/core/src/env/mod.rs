//! Traits describing the read-only content tables.
//!
//! The data-loader collaborator supplies spell, skill, monster, and item
//! definitions; the engine sees them only through these oracle traits,
//! bundled in [`BattleEnv`] so resolution code is not coupled to any
//! concrete storage. Tables are treated as pre-validated: a dangling id hit
//! during resolution is a programming error and fails loudly.

mod items;
mod monsters;
mod registry;
mod skills;
mod spells;

pub use items::ItemDefinition;
pub use monsters::MonsterTemplate;
pub use registry::ContentRegistry;
pub use skills::{SkillDefinition, SkillEffect, SkillPrecondition};
pub use spells::{
    Affliction, Enhancement, Relevance, RelevanceScope, SpellDefinition, SpellEffect, TargetKind,
};

use crate::state::{ItemId, MonsterId, SkillId, SpellId};

/// Read-only access to the spell table.
pub trait SpellOracle {
    fn spell(&self, id: SpellId) -> Option<&SpellDefinition>;
}

/// Read-only access to the monster special-skill table.
pub trait SkillOracle {
    fn skill(&self, id: SkillId) -> Option<&SkillDefinition>;
}

/// Read-only access to the monster template table.
pub trait MonsterOracle {
    fn monster(&self, id: MonsterId) -> Option<&MonsterTemplate>;
}

/// Read-only access to the item table.
pub trait ItemOracle {
    fn item(&self, id: ItemId) -> Option<&ItemDefinition>;
}

/// Bundle of content oracles handed to the engine for one battle.
#[derive(Clone, Copy)]
pub struct BattleEnv<'a> {
    spells: &'a dyn SpellOracle,
    skills: &'a dyn SkillOracle,
    monsters: &'a dyn MonsterOracle,
    items: &'a dyn ItemOracle,
}

impl<'a> BattleEnv<'a> {
    pub fn new(
        spells: &'a dyn SpellOracle,
        skills: &'a dyn SkillOracle,
        monsters: &'a dyn MonsterOracle,
        items: &'a dyn ItemOracle,
    ) -> Self {
        Self {
            spells,
            skills,
            monsters,
            items,
        }
    }

    /// Look up a spell the content promised exists.
    ///
    /// # Panics
    ///
    /// Panics when the id is dangling; the loader validates references, so
    /// reaching this from live data is a bug.
    pub fn spell(&self, id: SpellId) -> &'a SpellDefinition {
        self.spells
            .spell(id)
            .unwrap_or_else(|| panic!("{id} not in the spell table"))
    }

    pub fn try_spell(&self, id: SpellId) -> Option<&'a SpellDefinition> {
        self.spells.spell(id)
    }

    pub fn skill(&self, id: SkillId) -> &'a SkillDefinition {
        self.skills
            .skill(id)
            .unwrap_or_else(|| panic!("skill #{} not in the skill table", id.0))
    }

    pub fn try_skill(&self, id: SkillId) -> Option<&'a SkillDefinition> {
        self.skills.skill(id)
    }

    pub fn monster(&self, id: MonsterId) -> Option<&'a MonsterTemplate> {
        self.monsters.monster(id)
    }

    pub fn item(&self, id: ItemId) -> Option<&'a ItemDefinition> {
        self.items.item(id)
    }
}
