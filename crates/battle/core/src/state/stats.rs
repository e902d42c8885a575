//! Base stat block and the stat selectors used by spells and weapons.

/// Base stats of a combatant, as seeded from the persistent party record or
/// a monster template. Resolution never mutates these; temporary effects go
/// through [`crate::stats::effective_stats`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BaseStats {
    pub strength: i32,
    pub agility: i32,
    pub vitality: i32,
    pub intellect: i32,
    pub sagacity: i32,
    pub speed: i32,
    /// Scales the power of intellect-keyed spells cast by this combatant.
    pub aura: i32,
    /// Scales the power of sagacity-keyed spells cast by this combatant.
    pub spirit: i32,
    pub attack: i32,
    pub hit: i32,
    pub defense: i32,
    pub evade: i32,
    pub magic_defense: i32,
}

impl BaseStats {
    pub fn core_stat(&self, stat: CoreStat) -> i32 {
        match stat {
            CoreStat::Strength => self.strength,
            CoreStat::Agility => self.agility,
            CoreStat::Vitality => self.vitality,
            CoreStat::Intellect => self.intellect,
            CoreStat::Sagacity => self.sagacity,
        }
    }
}

/// The five core stats a weapon bonus may key off.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum CoreStat {
    #[default]
    Strength,
    Agility,
    Vitality,
    Intellect,
    Sagacity,
}

/// Which mental stat pair powers a spell: intellect/aura or sagacity/spirit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum CasterStat {
    #[default]
    Intellect,
    Sagacity,
}

impl CasterStat {
    /// The stat that feeds the spell power formula.
    pub fn power_of(self, stats: &BaseStats) -> i32 {
        match self {
            CasterStat::Intellect => stats.intellect,
            CasterStat::Sagacity => stats.sagacity,
        }
    }

    /// The percentage stat that scales the rolled power.
    pub fn scale_of(self, stats: &BaseStats) -> i32 {
        match self {
            CasterStat::Intellect => stats.aura,
            CasterStat::Sagacity => stats.spirit,
        }
    }
}

/// Weapon-carried attack bonus: a fraction of one core stat added to attack
/// before the damage roll.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatBoost {
    pub stat: CoreStat,
    pub percent: i32,
}

impl StatBoost {
    pub fn applied_to(&self, stats: &BaseStats) -> i32 {
        stats.core_stat(self.stat) * self.percent / 100
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caster_stat_selects_matching_pair() {
        let stats = BaseStats {
            intellect: 30,
            sagacity: 40,
            aura: 80,
            spirit: 90,
            ..Default::default()
        };
        assert_eq!(CasterStat::Intellect.power_of(&stats), 30);
        assert_eq!(CasterStat::Intellect.scale_of(&stats), 80);
        assert_eq!(CasterStat::Sagacity.power_of(&stats), 40);
        assert_eq!(CasterStat::Sagacity.scale_of(&stats), 90);
    }

    #[test]
    fn stat_boost_truncates() {
        let stats = BaseStats {
            strength: 33,
            ..Default::default()
        };
        let boost = StatBoost {
            stat: CoreStat::Strength,
            percent: 50,
        };
        assert_eq!(boost.applied_to(&stats), 16);
    }
}
