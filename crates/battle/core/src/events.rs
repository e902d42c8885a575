//! Presentation notifications.
//!
//! The engine never draws; it records everything the renderer needs as
//! [`BattleEvent`] values, in the order things happened. The embedder
//! drains the queue after each entry-point call and is free to animate at
//! its own pace, as long as it presents an event before applying the next
//! user input.

use crate::resolve::{DisplayAmount, ReportResource};
use crate::state::{BattleOutcome, ItemId, Side, SkillId, Slot, SpellId, StatusKind};

/// One notification for the presentation collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleEvent {
    /// Battle opened; `surprised` names the side caught off guard, if any.
    BattleStarted { surprised: Option<Side> },
    /// A combatant reached the gauge threshold and will act.
    TurnReady(Slot),
    /// A combatant announced an action; `name` is the display string
    /// (spell, skill, or item name) and `fx` the animation hint.
    ActionAnnounced { slot: Slot, name: String, fx: u16 },
    /// Melee swing from `attacker` against `defender`.
    AttackLanded {
        attacker: Slot,
        defender: Slot,
        critical: bool,
    },
    /// A number (or miss marker) to float over a combatant.
    AmountShown {
        slot: Slot,
        amount: DisplayAmount,
        resource: ReportResource,
    },
    StatusApplied { slot: Slot, status: StatusKind },
    StatusRemoved { slot: Slot, status: StatusKind },
    Died(Slot),
    /// Periodic poison damage.
    PoisonTick { slot: Slot, amount: i32 },
    /// Periodic regeneration.
    RegenTick { slot: Slot, amount: i32 },
    /// The combatant lost its turn to the malison stumble.
    Stumbled(Slot),
    /// The combatant is confused and did nothing this turn.
    Dithered(Slot),
    Defended(Slot),
    FleeAttempted { slot: Slot, success: bool },
    /// Enemy HP bars are revealed from now on.
    VisionRevealed,
    /// The encounter-suppression effect was armed.
    RepulseArmed,
    /// Item used in battle.
    ItemUsed { slot: Slot, item: ItemId },
    /// A monster special skill fired.
    SkillUsed { slot: Slot, skill: SkillId },
    /// A spell cast was committed.
    SpellCast { slot: Slot, spell: SpellId },
    BattleEnded { outcome: BattleOutcome },
    /// Victory spoils, emitted exactly once after a heroes' win.
    RewardsGranted {
        xp_per_hero: i32,
        gold: i32,
        drops: Vec<ItemId>,
    },
}
