//! The per-combatant battle record.

use crate::config::BattleConfig;
use crate::state::element::{Element, Resistances};
use crate::state::ids::{ItemId, SkillId, SpellId};
use crate::state::stats::{BaseStats, StatBoost};
use crate::state::status::{StatusEffects, StatusKind};

/// Charge carried by a weapon: either an elemental channel for its damage or
/// a status ailment it can inflict on hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WeaponPower {
    Elemental(Element),
    Ailment(StatusKind),
}

/// Entry in a combatant's eight-slot skill list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillRef {
    Spell(SpellId),
    Special(SkillId),
}

/// Imbued on-hit proc: the item whose spell fires on a successful melee hit,
/// and the caster power substituted while it resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OnHitImbue {
    pub item: ItemId,
    pub power: i32,
}

/// Reward data carried by enemy combatants, zero for heroes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Bounty {
    pub xp: i32,
    pub gold: i32,
    /// Percent chance of dropping anything at all.
    pub drop_chance: i32,
    pub common: Option<ItemId>,
    pub rare: Option<ItemId>,
}

/// One participant of the current battle. Created at battle start from a
/// hero seed or monster template, discarded when the battle ends.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub name: String,
    pub stats: BaseStats,
    pub resistances: Resistances,

    pub hp: i32,
    pub max_hp: i32,
    pub mp: i32,
    pub max_mp: i32,
    pub status: StatusEffects,

    pub weapon_power: Option<WeaponPower>,
    pub boost: StatBoost,
    /// Whether this combatant can be critically hit.
    pub crit_able: bool,
    /// Hero-template flag doubling the critical bonus.
    pub keen_critical: bool,
    /// Undead level; a positive value inverts drain spells cast at this
    /// combatant.
    pub undead_level: u8,
    /// Percent multiplier on spell MP costs.
    pub mp_rate: i32,

    pub skills: [Option<SkillRef>; BattleConfig::SKILL_SLOTS],
    /// AI percentile thresholds, one per skill slot.
    pub ai_priority: [u8; BattleConfig::SKILL_SLOTS],
    /// Per-slot cooldowns ticked down each time this combatant acts.
    pub cooldowns: [u8; BattleConfig::SKILL_SLOTS],

    /// Passive imbued items, auto-cast at the caster at battle start and on
    /// each of this combatant's turns.
    pub imbued: [Option<ItemId>; 2],
    pub on_hit: Option<OnHitImbue>,

    pub bounty: Bounty,

    // ===== combat-only scratch =====
    pub gauge: i32,
    pub gauge_rate: i32,
    /// Cleared while incapacitated; gates gauge eligibility for the tick.
    pub ready: bool,
    /// Set by the Defend action, cleared when the combatant next acts.
    pub defend: bool,
    /// Last spell this combatant committed to, cleared after it resolves.
    pub last_spell: Option<SpellId>,
}

impl Combatant {
    /// Bare combatant with sane scratch defaults. Callers fill stats and
    /// dynamic pools; `gauge_rate` is derived once the roster is final.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stats: BaseStats::default(),
            resistances: Resistances::neutral(),
            hp: 0,
            max_hp: 0,
            mp: 0,
            max_mp: 0,
            status: StatusEffects::none(),
            weapon_power: None,
            boost: StatBoost::default(),
            crit_able: true,
            keen_critical: false,
            undead_level: 0,
            mp_rate: 100,
            skills: [None; BattleConfig::SKILL_SLOTS],
            ai_priority: [0; BattleConfig::SKILL_SLOTS],
            cooldowns: [0; BattleConfig::SKILL_SLOTS],
            imbued: [None; 2],
            on_hit: None,
            bounty: Bounty::default(),
            gauge: 0,
            gauge_rate: 0,
            ready: true,
            defend: false,
            last_spell: None,
        }
    }

    /// Gauge increment per update, before the time-tier multiplier.
    pub fn base_gauge_rate(&self) -> i32 {
        (self.stats.speed + 50) / 5
    }

    pub fn is_alive(&self) -> bool {
        !self.status.has(StatusKind::Dead)
    }

    /// Asleep, stopped, or petrified: alive but unable to take a turn.
    pub fn is_incapacitated(&self) -> bool {
        self.status.has(StatusKind::Sleep)
            || self.status.has(StatusKind::Stop)
            || self.status.has(StatusKind::Stone)
    }

    /// True when low enough for the desperation rules (critical-hit bonus,
    /// AI defending).
    pub fn at_critical_hp(&self) -> bool {
        if self.max_hp > 250 {
            self.hp <= 50
        } else {
            self.hp <= self.max_hp / 5
        }
    }

    /// Clamp-adjust HP. Never sets the dead status; lethal transitions go
    /// through [`Combatant::kill`] so the status wipe is not skipped.
    pub fn adjust_hp(&mut self, amount: i32) {
        self.hp = (self.hp + amount).clamp(0, self.max_hp);
    }

    pub fn adjust_mp(&mut self, amount: i32) {
        self.mp = (self.mp + amount).clamp(0, self.max_mp);
    }

    /// Put this combatant out of commission: every status counter is wiped,
    /// the dead flag set, HP zeroed.
    pub fn kill(&mut self) {
        self.status.clear_all();
        self.status.set(StatusKind::Dead, 1);
        self.hp = 0;
        self.gauge = 0;
        self.ready = false;
    }

    /// A damaging hit interrupts sleep.
    pub fn wake(&mut self) {
        self.status.clear(StatusKind::Sleep);
    }
}
