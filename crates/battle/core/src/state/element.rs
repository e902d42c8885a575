//! Elements and per-combatant resistance values.

use strum::EnumCount;

/// Elemental and special attack channels. Every combatant carries one
/// resistance value per element; spells and weapon charges name the element
/// they travel through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumCount, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Element {
    Earth,
    Black,
    Fire,
    Thunder,
    Air,
    White,
    Water,
    Ice,
    Poison,
    Blind,
    Charm,
    Paralyze,
    Petrify,
    Silence,
    Sleep,
    Time,
}

impl Element {
    /// Elements that still bite a petrified target at full strength.
    /// Everything else is dampened to a tenth against stone.
    pub fn pierces_stone(self) -> bool {
        matches!(
            self,
            Element::Black | Element::White | Element::Earth | Element::Water
        )
    }
}

/// Resistance vector, one signed value per element.
///
/// Negative values are weaknesses, 1..=10 scale damage down linearly, and
/// values above 10 invert incoming damage into healing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Resistances([i8; Element::COUNT]);

impl Resistances {
    pub const fn neutral() -> Self {
        Self([0; Element::COUNT])
    }

    pub fn new(values: [i8; Element::COUNT]) -> Self {
        Self(values)
    }

    #[inline]
    pub fn get(&self, element: Element) -> i8 {
        self.0[element as usize]
    }

    #[inline]
    pub fn set(&mut self, element: Element, value: i8) {
        self.0[element as usize] = value;
    }
}
