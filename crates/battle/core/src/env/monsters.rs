//! Monster templates.

use crate::config::BattleConfig;
use crate::state::{
    BaseStats, Bounty, Combatant, OnHitImbue, Resistances, SkillRef, StatBoost, WeaponPower,
};

/// Static description of one monster kind, keyed by monster id in the
/// monster table. Encounters spawn combatants by copying a template.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterTemplate {
    pub name: String,
    pub level: i32,
    pub max_hp: i32,
    pub max_mp: i32,
    pub stats: BaseStats,
    pub resistances: Resistances,
    pub weapon_power: Option<WeaponPower>,
    pub boost: StatBoost,
    pub crit_able: bool,
    pub undead_level: u8,
    /// Skill list and the AI percentile thresholds, slot for slot.
    pub skills: [Option<SkillRef>; BattleConfig::SKILL_SLOTS],
    pub ai_priority: [u8; BattleConfig::SKILL_SLOTS],
    pub imbued: [Option<crate::state::ItemId>; 2],
    pub on_hit: Option<OnHitImbue>,
    pub bounty: Bounty,
}

impl MonsterTemplate {
    /// Instantiate a fresh, full-health combatant from this template.
    pub fn spawn(&self) -> Combatant {
        let mut c = Combatant::named(self.name.clone());
        c.stats = self.stats;
        c.resistances = self.resistances;
        c.hp = self.max_hp;
        c.max_hp = self.max_hp;
        c.mp = self.max_mp;
        c.max_mp = self.max_mp;
        c.weapon_power = self.weapon_power;
        c.boost = self.boost;
        c.crit_able = self.crit_able;
        c.undead_level = self.undead_level;
        c.skills = self.skills;
        c.ai_priority = self.ai_priority;
        c.imbued = self.imbued;
        c.on_hit = self.on_hit;
        c.bounty = self.bounty;
        c
    }
}
