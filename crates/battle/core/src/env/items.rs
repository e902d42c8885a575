//! Item definitions, limited to what combat needs.

use crate::state::SpellId;

/// Static definition of one item. Combat treats item use as an MP-free
/// spell invocation; everything else about items (shops, equipping) lives
/// outside this engine.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDefinition {
    pub name: String,
    /// The spell this item invokes when used or when imbued gear triggers.
    pub spell: Option<SpellId>,
    pub usable_in_battle: bool,
}
