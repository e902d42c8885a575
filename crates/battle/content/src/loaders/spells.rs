//! Spell table loader.

use std::path::Path;

use battle_core::{
    CasterStat, Element, Relevance, SpellDefinition, SpellEffect, SpellId, TargetKind,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// One row of `spells.ron`. The relevance descriptor may be omitted, in
/// which case it is derived from the effect the way the AI expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpellRow {
    pub id: u16,
    pub name: String,
    #[serde(default)]
    pub power: i32,
    #[serde(default)]
    pub bonus: i32,
    #[serde(default)]
    pub hit_chance: i32,
    #[serde(default)]
    pub mp_cost: i32,
    #[serde(default)]
    pub stat: CasterStat,
    #[serde(default)]
    pub element: Option<Element>,
    pub target: TargetKind,
    pub effect: SpellEffect,
    #[serde(default)]
    pub relevance: Option<Relevance>,
    #[serde(default)]
    pub fx: u16,
}

impl SpellRow {
    fn into_definition(self) -> (SpellId, SpellDefinition) {
        let relevance = self
            .relevance
            .unwrap_or_else(|| SpellDefinition::default_relevance(&self.effect, self.target));
        (
            SpellId(self.id),
            SpellDefinition {
                name: self.name,
                power: self.power,
                bonus: self.bonus,
                hit_chance: self.hit_chance,
                mp_cost: self.mp_cost,
                stat: self.stat,
                element: self.element,
                target: self.target,
                effect: self.effect,
                relevance,
                fx: self.fx,
            },
        )
    }
}

/// Spell catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpellCatalog {
    pub spells: Vec<SpellRow>,
}

/// Loader for the spell catalog from RON files.
pub struct SpellLoader;

impl SpellLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<(SpellId, SpellDefinition)>> {
        let content = read_file(path)?;
        let catalog: SpellCatalog = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("failed to parse spell catalog RON: {e}"))?;
        Ok(catalog
            .spells
            .into_iter()
            .map(SpellRow::into_definition)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_rows_and_derives_relevance() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"(
    spells: [
        (
            id: 1,
            name: "scorch",
            power: 25,
            bonus: 50,
            mp_cost: 4,
            element: Some(Fire),
            target: EnemyOneAll,
            effect: Damage,
        ),
        (
            id: 2,
            name: "sleep",
            hit_chance: 75,
            mp_cost: 3,
            element: Some(Sleep),
            target: EnemyOne,
            effect: Afflict(Sleep),
        ),
    ],
)"#
        )
        .unwrap();

        let spells = SpellLoader::load(file.path()).unwrap();
        assert_eq!(spells.len(), 2);
        let (id, scorch) = &spells[0];
        assert_eq!(*id, SpellId(1));
        assert_eq!(scorch.element, Some(Element::Fire));
        assert_eq!(scorch.relevance, Relevance::Always);

        let (_, sleep) = &spells[1];
        assert!(matches!(sleep.relevance, Relevance::StatusOpen { .. }));
    }
}
