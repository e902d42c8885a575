//! In-memory content registry.
//!
//! A plain map-backed implementation of all four oracles. The content
//! loaders fill one of these from data files; tests and small embedders
//! build one by hand.

use std::collections::HashMap;

use crate::env::{
    BattleEnv, ItemDefinition, ItemOracle, MonsterOracle, MonsterTemplate, SkillDefinition,
    SkillOracle, SpellDefinition, SpellOracle,
};
use crate::state::{ItemId, MonsterId, SkillId, SpellId};

/// Owned content tables implementing every oracle.
#[derive(Default, Debug)]
pub struct ContentRegistry {
    spells: HashMap<SpellId, SpellDefinition>,
    skills: HashMap<SkillId, SkillDefinition>,
    monsters: HashMap<MonsterId, MonsterTemplate>,
    items: HashMap<ItemId, ItemDefinition>,
}

impl ContentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_spell(&mut self, id: SpellId, def: SpellDefinition) -> &mut Self {
        self.spells.insert(id, def);
        self
    }

    pub fn add_skill(&mut self, id: SkillId, def: SkillDefinition) -> &mut Self {
        self.skills.insert(id, def);
        self
    }

    pub fn add_monster(&mut self, id: MonsterId, template: MonsterTemplate) -> &mut Self {
        self.monsters.insert(id, template);
        self
    }

    pub fn add_item(&mut self, id: ItemId, def: ItemDefinition) -> &mut Self {
        self.items.insert(id, def);
        self
    }

    pub fn spells(&self) -> impl Iterator<Item = (&SpellId, &SpellDefinition)> {
        self.spells.iter()
    }

    pub fn skills(&self) -> impl Iterator<Item = (&SkillId, &SkillDefinition)> {
        self.skills.iter()
    }

    pub fn monsters(&self) -> impl Iterator<Item = (&MonsterId, &MonsterTemplate)> {
        self.monsters.iter()
    }

    pub fn items(&self) -> impl Iterator<Item = (&ItemId, &ItemDefinition)> {
        self.items.iter()
    }

    /// Bundle this registry as the oracle environment for a battle.
    pub fn env(&self) -> BattleEnv<'_> {
        BattleEnv::new(self, self, self, self)
    }
}

impl SpellOracle for ContentRegistry {
    fn spell(&self, id: SpellId) -> Option<&SpellDefinition> {
        self.spells.get(&id)
    }
}

impl SkillOracle for ContentRegistry {
    fn skill(&self, id: SkillId) -> Option<&SkillDefinition> {
        self.skills.get(&id)
    }
}

impl MonsterOracle for ContentRegistry {
    fn monster(&self, id: MonsterId) -> Option<&MonsterTemplate> {
        self.monsters.get(&id)
    }
}

impl ItemOracle for ContentRegistry {
    fn item(&self, id: ItemId) -> Option<&ItemDefinition> {
        self.items.get(&id)
    }
}
