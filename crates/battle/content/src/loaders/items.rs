//! Item catalog loader.

use std::path::Path;

use battle_core::{ItemDefinition, ItemId, SpellId};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// One row of `items.ron`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRow {
    pub id: u16,
    pub name: String,
    #[serde(default)]
    pub spell: Option<u16>,
    #[serde(default)]
    pub usable_in_battle: bool,
}

/// Item catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCatalog {
    pub items: Vec<ItemRow>,
}

/// Loader for the item catalog from RON files.
pub struct ItemLoader;

impl ItemLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<(ItemId, ItemDefinition)>> {
        let content = read_file(path)?;
        let catalog: ItemCatalog = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("failed to parse item catalog RON: {e}"))?;
        Ok(catalog
            .items
            .into_iter()
            .map(|row| {
                (
                    ItemId(row.id),
                    ItemDefinition {
                        name: row.name,
                        spell: row.spell.map(SpellId),
                        usable_in_battle: row.usable_in_battle,
                    },
                )
            })
            .collect())
    }
}
