//! Encounter group loader.
//!
//! Encounter rows name the monster lineup a battle spawns. Picking which
//! group an overworld step triggers stays outside the engine; this loader
//! only guarantees the lineups reference real monsters and fit the roster.

use std::path::Path;

use battle_core::config::BattleConfig;
use battle_core::MonsterId;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// One battle lineup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterGroup {
    pub id: u16,
    pub monsters: Vec<MonsterId>,
    #[serde(default = "default_true")]
    pub escape_allowed: bool,
}

fn default_true() -> bool {
    true
}

/// Encounter table structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterTable {
    pub encounters: Vec<EncounterGroup>,
}

/// Loader for encounter groups from RON files.
pub struct EncounterLoader;

impl EncounterLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<EncounterGroup>> {
        let content = read_file(path)?;
        let table: EncounterTable = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("failed to parse encounter table RON: {e}"))?;
        for group in &table.encounters {
            if group.monsters.is_empty() {
                anyhow::bail!("encounter #{} has an empty lineup", group.id);
            }
            if group.monsters.len() > BattleConfig::MAX_ENEMIES {
                anyhow::bail!(
                    "encounter #{} lineup of {} exceeds the {} enemy slots",
                    group.id,
                    group.monsters.len(),
                    BattleConfig::MAX_ENEMIES
                );
            }
        }
        Ok(table.encounters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_lineups_and_rejects_oversized_ones() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"(
    encounters: [
        (id: 1, monsters: [(7), (7), (3)]),
        (id: 2, monsters: [(12)], escape_allowed: false),
    ],
)"#
        )
        .unwrap();
        let encounters = EncounterLoader::load(file.path()).unwrap();
        assert_eq!(encounters[0].monsters.len(), 3);
        assert!(encounters[0].escape_allowed);
        assert!(!encounters[1].escape_allowed);

        let mut oversized = tempfile::NamedTempFile::new().unwrap();
        write!(
            oversized,
            r#"(
    encounters: [
        (id: 3, monsters: [(1), (1), (1), (1), (1), (1)]),
    ],
)"#
        )
        .unwrap();
        assert!(EncounterLoader::load(oversized.path()).is_err());
    }
}
