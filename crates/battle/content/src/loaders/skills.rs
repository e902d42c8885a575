//! Monster special-skill table loader.

use std::path::Path;

use battle_core::{SkillDefinition, SkillEffect, SkillId, SkillPrecondition};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// One row of `skills.ron`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillRow {
    pub id: u16,
    pub name: String,
    pub effect: SkillEffect,
    #[serde(default)]
    pub precondition: Option<SkillPrecondition>,
    #[serde(default)]
    pub fx: u16,
}

/// Skill catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillCatalog {
    pub skills: Vec<SkillRow>,
}

/// Loader for the special-skill catalog from RON files.
pub struct SkillLoader;

impl SkillLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<(SkillId, SkillDefinition)>> {
        let content = read_file(path)?;
        let catalog: SkillCatalog = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("failed to parse skill catalog RON: {e}"))?;
        Ok(catalog
            .skills
            .into_iter()
            .map(|row| {
                (
                    SkillId(row.id),
                    SkillDefinition {
                        name: row.name,
                        effect: row.effect,
                        precondition: row.precondition,
                        fx: row.fx,
                    },
                )
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::Element;
    use std::io::Write;

    #[test]
    fn loads_strike_and_blast_skills() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"(
    skills: [
        (
            id: 101,
            name: "venomous bite",
            effect: Strike(power: 30, inflicts: Some(Poison)),
        ),
        (
            id: 105,
            name: "sweep",
            effect: Blast(power: 40, element: Earth, split: true),
            precondition: Some(MultipleFoes),
        ),
    ],
)"#
        )
        .unwrap();

        let skills = SkillLoader::load(file.path()).unwrap();
        assert_eq!(skills.len(), 2);
        assert!(matches!(
            skills[0].1.effect,
            SkillEffect::Strike { power: 30, .. }
        ));
        assert!(matches!(
            skills[1].1.effect,
            SkillEffect::Blast {
                element: Element::Earth,
                split: true,
                ..
            }
        ));
        assert_eq!(skills[1].1.precondition, Some(SkillPrecondition::MultipleFoes));
    }
}
