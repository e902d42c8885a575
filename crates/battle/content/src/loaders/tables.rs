//! Balance table loader.

use std::path::Path;

use battle_core::BattleConfig;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// `tables.toml` contents; every knob falls back to the engine default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceTable {
    pub flee_base: i32,
    pub surprise_die: i32,
    pub surprise_die_solo: i32,
}

impl Default for BalanceTable {
    fn default() -> Self {
        let config = BattleConfig::new();
        Self {
            flee_base: config.flee_base,
            surprise_die: config.surprise_die,
            surprise_die_solo: config.surprise_die_solo,
        }
    }
}

/// Loader for the TOML balance table.
pub struct TablesLoader;

impl TablesLoader {
    pub fn load(path: &Path) -> LoadResult<BattleConfig> {
        let content = read_file(path)?;
        let table: BalanceTable = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("failed to parse balance table TOML: {e}"))?;
        Ok(BattleConfig {
            flee_base: table.flee_base,
            surprise_die: table.surprise_die,
            surprise_die_solo: table.surprise_die_solo,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_tables_keep_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "flee_base = 55\n").unwrap();
        let config = TablesLoader::load(file.path()).unwrap();
        assert_eq!(config.flee_base, 55);
        assert_eq!(config.surprise_die, BattleConfig::DEFAULT_SURPRISE_DIE);
    }
}
