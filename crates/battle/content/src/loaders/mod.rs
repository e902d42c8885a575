//! Content loaders for reading battle data from files.
//!
//! RON for the catalogs, TOML for the balance table. Every loader returns
//! plain definition values; [`load_registry`] bundles a whole content
//! directory into a validated [`ContentRegistry`].

pub mod encounters;
pub mod items;
pub mod monsters;
pub mod skills;
pub mod spells;
pub mod tables;

pub use encounters::{EncounterGroup, EncounterLoader};
pub use items::ItemLoader;
pub use monsters::MonsterLoader;
pub use skills::SkillLoader;
pub use spells::SpellLoader;
pub use tables::TablesLoader;

use std::path::Path;

use anyhow::Context;
use battle_core::{BattleConfig, ContentRegistry};

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read file {}", path.display()))
}

/// Load a full content directory into a registry plus the balance config.
///
/// Expects `spells.ron`, `skills.ron`, `monsters.ron`, and `items.ron`;
/// `tables.toml` is optional and falls back to the built-in defaults.
/// Cross-references (monster skill lists, item and imbued spell ids) are
/// validated here so the engine never sees a dangling id.
pub fn load_registry(dir: &Path) -> LoadResult<(ContentRegistry, BattleConfig)> {
    let mut registry = ContentRegistry::new();

    for (id, def) in SpellLoader::load(&dir.join("spells.ron"))? {
        registry.add_spell(id, def);
    }
    for (id, def) in SkillLoader::load(&dir.join("skills.ron"))? {
        registry.add_skill(id, def);
    }
    for (id, def) in ItemLoader::load(&dir.join("items.ron"))? {
        registry.add_item(id, def);
    }
    for (id, template) in MonsterLoader::load(&dir.join("monsters.ron"))? {
        registry.add_monster(id, template);
    }

    validate(&registry)?;

    let tables_path = dir.join("tables.toml");
    let config = if tables_path.exists() {
        TablesLoader::load(&tables_path)?
    } else {
        BattleConfig::new()
    };

    Ok((registry, config))
}

fn validate(registry: &ContentRegistry) -> LoadResult<()> {
    use battle_core::SkillRef;

    let env = registry.env();
    for (id, def) in registry.spells() {
        if def.mp_cost < 0 || !(0..=100).contains(&def.hit_chance) {
            anyhow::bail!("spell #{} '{}' has out-of-range numbers", id.0, def.name);
        }
    }

    let mut missing = Vec::new();
    for (_, item) in registry.items() {
        if let Some(spell) = item.spell {
            if env.try_spell(spell).is_none() {
                missing.push(format!("item '{}' -> spell #{}", item.name, spell.0));
            }
        }
    }
    for (id, template) in registry.monsters() {
        for entry in template.skills.iter().flatten() {
            let dangling = match *entry {
                SkillRef::Spell(spell) => env.try_spell(spell).is_none(),
                SkillRef::Special(skill) => env.try_skill(skill).is_none(),
            };
            if dangling {
                missing.push(format!("monster #{} '{}' skill list", id.0, template.name));
            }
        }
        for item in template.imbued.iter().flatten() {
            if env.item(*item).is_none() {
                missing.push(format!("monster #{} imbued item #{}", id.0, item.0));
            }
        }
        if let Some(on_hit) = template.on_hit {
            if env.item(on_hit.item).is_none() {
                missing.push(format!("monster #{} on-hit item #{}", id.0, on_hit.item.0));
            }
        }
    }
    if !missing.is_empty() {
        anyhow::bail!("dangling content references: {}", missing.join(", "));
    }
    Ok(())
}
