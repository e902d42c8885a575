//! Resolution outcomes handed back to the controller.

use crate::state::{Slot, StatusKind};

/// Per-target amount as the presentation layer should show it. Damage is
/// negative, healing positive; the sentinels cover the no-number cases so
/// callers never reserve magic integer values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DisplayAmount {
    /// The action failed against this target; show a miss marker.
    Miss,
    /// The action landed but has no number to show (most status effects).
    NoDisplay,
    Amount(i32),
}

impl DisplayAmount {
    pub fn is_miss(self) -> bool {
        matches!(self, DisplayAmount::Miss)
    }
}

/// Which resource a report's amount applies to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReportResource {
    #[default]
    Hp,
    Mp,
}

/// One target's share of an action outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetReport {
    pub slot: Slot,
    pub amount: DisplayAmount,
    pub resource: ReportResource,
    /// Whether this target died as a result of the action.
    pub died: bool,
}

impl TargetReport {
    pub fn hp(slot: Slot, amount: DisplayAmount) -> Self {
        Self {
            slot,
            amount,
            resource: ReportResource::Hp,
            died: false,
        }
    }

    pub fn mp(slot: Slot, amount: DisplayAmount) -> Self {
        Self {
            slot,
            amount,
            resource: ReportResource::Mp,
            died: false,
        }
    }
}

/// Transient result of one resolved action. Never an error: misses, saves,
/// and wasted actions are all expressed here.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionOutcome {
    pub reports: Vec<TargetReport>,
    pub critical: bool,
    /// Statuses newly applied, in application order.
    pub applied: Vec<(Slot, StatusKind)>,
    /// Statuses removed (cleansed, dispelled, or cancelled).
    pub removed: Vec<(Slot, StatusKind)>,
    /// The battle ends as escaped (warp or a successful run).
    pub escaped: bool,
    /// Enemy HP bars are revealed from now on.
    pub vision: bool,
    /// The encounter-suppression counter should be armed.
    pub repulse: bool,
    /// The whole cast was nullified (failed flat save, no MP, no targets).
    pub fizzled: bool,
}

impl ActionOutcome {
    pub fn fizzle() -> Self {
        Self {
            fizzled: true,
            ..Self::default()
        }
    }

    pub fn any_died(&self) -> bool {
        self.reports.iter().any(|r| r.died)
    }

    pub fn report_for(&self, slot: Slot) -> Option<&TargetReport> {
        self.reports.iter().find(|r| r.slot == slot)
    }

    /// Fold a nested outcome (an imbued proc) into this one.
    pub fn absorb(&mut self, other: ActionOutcome) {
        self.reports.extend(other.reports);
        self.applied.extend(other.applied);
        self.removed.extend(other.removed);
        self.escaped |= other.escaped;
        self.vision |= other.vision;
        self.repulse |= other.repulse;
    }
}
