//! The battle aggregate.
//!
//! One `Battle` value owns every combatant for the duration of one fight;
//! no combatant state lives outside it. All other components receive it by
//! reference and address combatants by [`Slot`].

use crate::config::BattleConfig;
use crate::error::SetupError;
use crate::state::combatant::Combatant;
use crate::state::ids::{Side, Slot};

/// Terminal result of a battle. Once set it never changes and no further
/// action resolution occurs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleOutcome {
    HeroesWin,
    EnemiesWin,
    Escaped,
}

/// Aggregate state of one battle.
#[derive(Clone, Debug, PartialEq)]
pub struct Battle {
    slots: [Option<Combatant>; BattleConfig::MAX_COMBATANTS],
    num_heroes: usize,
    num_enemies: usize,

    /// Wrapping round-phase counter advanced by the scheduler; poison and
    /// regen anchors compare against it.
    pub round_phase: i32,

    /// Render-only flag set by the vision spell: enemy HP bars stay
    /// revealed for the remainder of the battle.
    pub vision: bool,

    /// Whether the run/warp escape route is available in this encounter.
    pub escape_allowed: bool,

    outcome: Option<BattleOutcome>,
}

impl Battle {
    /// Assemble a roster. Heroes fill the low slots, enemies start at
    /// [`Slot::FIRST_ENEMY`]; gauge rates are derived here.
    pub fn new(heroes: Vec<Combatant>, enemies: Vec<Combatant>) -> Result<Self, SetupError> {
        if heroes.is_empty() {
            return Err(SetupError::NoHeroes);
        }
        if heroes.len() > BattleConfig::MAX_PARTY {
            return Err(SetupError::TooManyHeroes(heroes.len()));
        }
        if enemies.is_empty() {
            return Err(SetupError::NoEnemies);
        }
        if enemies.len() > BattleConfig::MAX_ENEMIES {
            return Err(SetupError::TooManyEnemies(enemies.len()));
        }

        let mut slots: [Option<Combatant>; BattleConfig::MAX_COMBATANTS] = Default::default();
        let num_heroes = heroes.len();
        let num_enemies = enemies.len();
        for (i, mut hero) in heroes.into_iter().enumerate() {
            hero.gauge_rate = hero.base_gauge_rate();
            slots[i] = Some(hero);
        }
        for (i, mut enemy) in enemies.into_iter().enumerate() {
            enemy.gauge_rate = enemy.base_gauge_rate();
            slots[BattleConfig::MAX_PARTY + i] = Some(enemy);
        }

        Ok(Self {
            slots,
            num_heroes,
            num_enemies,
            round_phase: 0,
            vision: false,
            escape_allowed: true,
            outcome: None,
        })
    }

    pub fn num_heroes(&self) -> usize {
        self.num_heroes
    }

    pub fn num_enemies(&self) -> usize {
        self.num_enemies
    }

    /// Borrow the combatant in `slot`. Addressing an empty or out-of-range
    /// slot is a programming error and panics with context.
    pub fn combatant(&self, slot: Slot) -> &Combatant {
        self.get(slot)
            .unwrap_or_else(|| panic!("no combatant in {slot}"))
    }

    pub fn combatant_mut(&mut self, slot: Slot) -> &mut Combatant {
        self.get_mut(slot)
            .unwrap_or_else(|| panic!("no combatant in {slot}"))
    }

    pub fn get(&self, slot: Slot) -> Option<&Combatant> {
        self.slots.get(slot.0).and_then(|c| c.as_ref())
    }

    pub fn get_mut(&mut self, slot: Slot) -> Option<&mut Combatant> {
        self.slots.get_mut(slot.0).and_then(|c| c.as_mut())
    }

    /// All occupied slots, ascending. Ascending order is the tie-break for
    /// everything in the engine: heroes before enemies, low index first.
    pub fn occupied_slots(&self) -> impl Iterator<Item = Slot> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_some())
            .map(|(i, _)| Slot(i))
    }

    pub fn side_slots(&self, side: Side) -> impl Iterator<Item = Slot> + '_ {
        self.occupied_slots().filter(move |s| s.side() == side)
    }

    pub fn living_slots(&self, side: Side) -> impl Iterator<Item = Slot> + '_ {
        self.side_slots(side)
            .filter(move |&s| self.combatant(s).is_alive())
    }

    pub fn count_living(&self, side: Side) -> usize {
        self.living_slots(side).count()
    }

    pub fn side_defeated(&self, side: Side) -> bool {
        self.count_living(side) == 0
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Record the terminal outcome. The first call wins; later calls are
    /// ignored so victory processing cannot run twice.
    pub fn end(&mut self, outcome: BattleOutcome) -> bool {
        if self.outcome.is_none() {
            self.outcome = Some(outcome);
            true
        } else {
            false
        }
    }
}
