//! Spell definitions.
//!
//! A definition carries a typed [`SpellEffect`] fixed at content-load time,
//! so resolution dispatches on a variant rather than re-inspecting numeric
//! id ranges, plus a [`Relevance`] descriptor the enemy AI interprets
//! uniformly.

use crate::state::{CasterStat, Element, StatusKind};

/// Declared targeting breadth of a spell or skill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetKind {
    /// Menu/overworld only; a combat cast is a no-op.
    None,
    AllyOne,
    /// Caster picks one ally or the whole party.
    AllyOneAll,
    AllyAll,
    EnemyOne,
    /// Caster picks one foe or every foe; group casts split the power.
    EnemyOneAll,
    /// Always every foe, full power on each.
    EnemyAll,
}

impl TargetKind {
    pub fn is_ally_scoped(self) -> bool {
        matches!(
            self,
            TargetKind::AllyOne | TargetKind::AllyOneAll | TargetKind::AllyAll
        )
    }
}

/// Beneficial status effects a spell can grant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Enhancement {
    /// One-shot perfect aim; the next attack ignores evade.
    Trueshot,
    /// Intangibility for three wraps of the round counter.
    Ether,
    Regen,
    /// Strength stack, up to two.
    Strength,
    /// Shell tier 1.
    Shell,
    /// Shell tier 2.
    Wall,
    /// Shield tier 1.
    Shield,
    /// Shield tier 2.
    GreaterShield,
    /// Shield and shell both to tier 2.
    DivineGuard,
    /// Bless stack, up to three; each raises max HP.
    Bless,
    /// Haste tier; cancels slow first.
    Haste,
}

/// Harmful status effects a spell can inflict.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Affliction {
    Blind,
    Charm,
    Petrify,
    /// Paralysis.
    Hold,
    Silence,
    Sleep,
    /// Malison stack 1.
    Nausea,
    /// Malison stack 2.
    Malison,
    /// Slow tier; cancels haste first.
    Slow,
}

impl Affliction {
    pub fn status(self) -> StatusKind {
        match self {
            Affliction::Blind => StatusKind::Blind,
            Affliction::Charm => StatusKind::Charm,
            Affliction::Petrify => StatusKind::Stone,
            Affliction::Hold => StatusKind::Stop,
            Affliction::Silence => StatusKind::Mute,
            Affliction::Sleep => StatusKind::Sleep,
            Affliction::Nausea | Affliction::Malison => StatusKind::Malison,
            Affliction::Slow => StatusKind::Time,
        }
    }
}

/// What a spell does when it resolves.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpellEffect {
    /// Offensive power roll against magic defense and elemental resistance.
    Damage,
    /// Restorative power roll, split across the chosen allies.
    Heal,
    /// Remove the listed ailments from living targets.
    Cleanse { ailments: Vec<StatusKind> },
    /// Bring a dead ally back at 1 HP, or at full HP.
    Revive { full: bool },
    Enhance(Enhancement),
    Afflict(Affliction),
    /// Strip shell, haste, shield, bless, and strength from the target.
    Dispel,
    /// Transfer MP from the target to the caster.
    Absorb,
    /// Transfer HP from the target to the caster; inverted against undead.
    Drain,
    /// Three quarters of the target's current HP, never lethal.
    Doom,
    /// The target's full current HP, resisted by the save.
    Death,
    /// Reveal enemy HP bars for the rest of the battle.
    Vision,
    /// Escape the battle where escape is possible.
    Warp,
    /// Arm the encounter-suppression counter carried in the battle result.
    Repulse,
}

/// Scope of an AI relevance check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RelevanceScope {
    Allies,
    Foes,
}

/// Data-driven answer to "is casting this right now useful at all?".
///
/// Interpreted by the enemy decision policy before a percentile-selected
/// spell is committed, so enemies do not shield an already-shielded party
/// or doom a party that is nearly dead anyway.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Relevance {
    Always,
    /// Someone in scope is alive and below `cap` on the given counter.
    StatusOpen {
        status: StatusKind,
        cap: i32,
        scope: RelevanceScope,
    },
    /// Someone in scope is alive and not at the given time tier.
    TimeTierOpen { tier: i32, scope: RelevanceScope },
    /// The caster itself is below the given HP fraction.
    CasterHpBelow { numerator: i32, denominator: i32 },
    /// Some foe still holds at least the given HP fraction.
    TargetsHealthy { numerator: i32, denominator: i32 },
}

/// Static definition of one spell, as supplied by the data loader.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellDefinition {
    pub name: String,
    /// Base power before the caster bonus.
    pub power: i32,
    /// Percent of the caster's power stat added to the base power.
    pub bonus: i32,
    /// Percent chance used by the status save.
    pub hit_chance: i32,
    pub mp_cost: i32,
    /// Which mental stat pair powers the cast.
    pub stat: CasterStat,
    /// Elemental channel, when the spell has one; gates resistance throws.
    pub element: Option<Element>,
    pub target: TargetKind,
    pub effect: SpellEffect,
    pub relevance: Relevance,
    /// Presentation hint: animation id for the renderer.
    pub fx: u16,
}

impl SpellDefinition {
    /// A spell with no power, no bonus, and no hit chance relies entirely
    /// on the caster's scale stat; a failed flat save nullifies the cast.
    pub fn is_pure(&self) -> bool {
        self.power == 0 && self.bonus == 0 && self.hit_chance == 0
    }

    /// Default relevance derived from the effect, used by loaders when the
    /// content row does not override it.
    pub fn default_relevance(effect: &SpellEffect, target: TargetKind) -> Relevance {
        let scope = if target.is_ally_scoped() {
            RelevanceScope::Allies
        } else {
            RelevanceScope::Foes
        };
        match effect {
            SpellEffect::Enhance(e) => {
                let (status, cap) = match e {
                    Enhancement::Trueshot => (StatusKind::Trueshot, 1),
                    Enhancement::Ether => (StatusKind::Ether, 1),
                    Enhancement::Regen => (StatusKind::Regen, 1),
                    Enhancement::Strength => (StatusKind::Strength, 2),
                    Enhancement::Shell | Enhancement::Wall => (StatusKind::Resist, 1),
                    Enhancement::Shield | Enhancement::GreaterShield | Enhancement::DivineGuard => {
                        (StatusKind::Shield, 1)
                    }
                    Enhancement::Bless => (StatusKind::Bless, 3),
                    Enhancement::Haste => {
                        return Relevance::TimeTierOpen { tier: 2, scope };
                    }
                };
                Relevance::StatusOpen { status, cap, scope }
            }
            SpellEffect::Afflict(a) => match a {
                Affliction::Slow => Relevance::TimeTierOpen { tier: 1, scope },
                other => Relevance::StatusOpen {
                    status: other.status(),
                    cap: 1,
                    scope,
                },
            },
            SpellEffect::Absorb => Relevance::CasterHpBelow {
                numerator: 1,
                denominator: 2,
            },
            SpellEffect::Drain => Relevance::CasterHpBelow {
                numerator: 1,
                denominator: 1,
            },
            SpellEffect::Doom => Relevance::TargetsHealthy {
                numerator: 1,
                denominator: 3,
            },
            _ => Relevance::Always,
        }
    }
}
