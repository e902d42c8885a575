//! Monster special-skill definitions.

use crate::state::{Element, StatusKind};

/// Situational gate an AI-selected skill must pass before it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillPrecondition {
    /// Needs at least two conscious opponents (sweep-style attacks).
    MultipleFoes,
}

/// What a special skill does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillEffect {
    /// Melee resolution with `power` substituted for the user's attack
    /// stat; `inflicts` procs like a status-charged weapon.
    Strike {
        power: i32,
        inflicts: Option<StatusKind>,
    },
    /// Elemental burst against every living foe. `split` divides the rolled
    /// power across them; breath weapons keep it whole.
    Blast {
        power: i32,
        element: Element,
        split: bool,
    },
}

/// Static definition of one monster skill.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillDefinition {
    pub name: String,
    pub effect: SkillEffect,
    pub precondition: Option<SkillPrecondition>,
    /// Presentation hint: animation id for the renderer.
    pub fx: u16,
}
