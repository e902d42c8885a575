//! Monster template loader.
//!
//! A row carries everything a template needs: base stats, resistances, the
//! eight-slot skill list with its AI percentile thresholds, weapon charge,
//! and bounty.

use std::path::Path;

use battle_core::config::BattleConfig;
use battle_core::{
    BaseStats, Bounty, ItemId, MonsterId, MonsterTemplate, OnHitImbue, Resistances, SkillId,
    SkillRef, SpellId, StatBoost, WeaponPower,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Skill-list entry in a monster row: plain ids, resolved to [`SkillRef`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum SkillSlotSpec {
    Spell(u16),
    Special(u16),
}

impl SkillSlotSpec {
    fn into_ref(self) -> SkillRef {
        match self {
            SkillSlotSpec::Spell(id) => SkillRef::Spell(SpellId(id)),
            SkillSlotSpec::Special(id) => SkillRef::Special(SkillId(id)),
        }
    }
}

/// One row of `monsters.ron`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonsterRow {
    pub id: u16,
    pub name: String,
    #[serde(default)]
    pub level: i32,
    pub max_hp: i32,
    #[serde(default)]
    pub max_mp: i32,
    #[serde(default)]
    pub stats: BaseStats,
    #[serde(default)]
    pub resistances: Option<[i8; 16]>,
    #[serde(default)]
    pub weapon_power: Option<WeaponPower>,
    #[serde(default)]
    pub boost: StatBoost,
    #[serde(default = "default_true")]
    pub crit_able: bool,
    #[serde(default)]
    pub undead_level: u8,
    /// Up to eight `(skill, percentile threshold)` pairs.
    #[serde(default)]
    pub skills: Vec<(SkillSlotSpec, u8)>,
    #[serde(default)]
    pub imbued: Vec<u16>,
    #[serde(default)]
    pub on_hit: Option<(u16, i32)>,
    #[serde(default)]
    pub bounty: Bounty,
}

fn default_true() -> bool {
    true
}

impl MonsterRow {
    fn into_template(self) -> LoadResult<(MonsterId, MonsterTemplate)> {
        if self.skills.len() > BattleConfig::SKILL_SLOTS {
            anyhow::bail!(
                "monster '{}' lists {} skills, max {}",
                self.name,
                self.skills.len(),
                BattleConfig::SKILL_SLOTS
            );
        }
        if self.imbued.len() > 2 {
            anyhow::bail!("monster '{}' carries more than two imbued items", self.name);
        }

        let mut skills = [None; BattleConfig::SKILL_SLOTS];
        let mut ai_priority = [0u8; BattleConfig::SKILL_SLOTS];
        for (slot, (spec, threshold)) in self.skills.into_iter().enumerate() {
            skills[slot] = Some(spec.into_ref());
            ai_priority[slot] = threshold;
        }

        let mut imbued = [None; 2];
        for (slot, item) in self.imbued.into_iter().enumerate() {
            imbued[slot] = Some(ItemId(item));
        }

        Ok((
            MonsterId(self.id),
            MonsterTemplate {
                name: self.name,
                level: self.level,
                max_hp: self.max_hp,
                max_mp: self.max_mp,
                stats: self.stats,
                resistances: self
                    .resistances
                    .map(Resistances::new)
                    .unwrap_or_else(Resistances::neutral),
                weapon_power: self.weapon_power,
                boost: self.boost,
                crit_able: self.crit_able,
                undead_level: self.undead_level,
                skills,
                ai_priority,
                imbued,
                on_hit: self.on_hit.map(|(item, power)| OnHitImbue {
                    item: ItemId(item),
                    power,
                }),
                bounty: self.bounty,
            },
        ))
    }
}

/// Monster catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonsterCatalog {
    pub monsters: Vec<MonsterRow>,
}

/// Loader for monster templates from RON files.
pub struct MonsterLoader;

impl MonsterLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<(MonsterId, MonsterTemplate)>> {
        let content = read_file(path)?;
        let catalog: MonsterCatalog = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("failed to parse monster catalog RON: {e}"))?;
        catalog
            .monsters
            .into_iter()
            .map(MonsterRow::into_template)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_a_full_monster_row() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"(
    monsters: [
        (
            id: 7,
            name: "bog serpent",
            level: 4,
            max_hp: 80,
            max_mp: 12,
            stats: (attack: 28, hit: 70, defense: 10, evade: 6, speed: 35),
            weapon_power: Some(Ailment(Poison)),
            skills: [(Special(101), 35), (Spell(2), 60)],
            bounty: (xp: 40, gold: 22, drop_chance: 15, common: Some((4))),
        ),
    ],
)"#
        )
        .unwrap();

        let monsters = MonsterLoader::load(file.path()).unwrap();
        let (id, serpent) = &monsters[0];
        assert_eq!(*id, MonsterId(7));
        assert_eq!(serpent.stats.attack, 28);
        assert_eq!(serpent.skills[0], Some(SkillRef::Special(SkillId(101))));
        assert_eq!(serpent.ai_priority[1], 60);
        assert_eq!(serpent.bounty.common, Some(ItemId(4)));
        assert!(serpent.crit_able);
        let spawned = serpent.spawn();
        assert_eq!(spawned.hp, 80);
    }

    #[test]
    fn too_many_skills_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let skills: Vec<String> = (0..9).map(|i| format!("(Spell({i}), 10)")).collect();
        write!(
            file,
            r#"(
    monsters: [
        (id: 1, name: "overloaded", max_hp: 10, skills: [{}]),
    ],
)"#,
            skills.join(", ")
        )
        .unwrap();
        assert!(MonsterLoader::load(file.path()).is_err());
    }
}
