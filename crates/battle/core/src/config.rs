/// Battle tuning constants and runtime-adjustable parameters.
///
/// The compile-time constants size the roster and drive the gauge cadence;
/// the struct fields are the knobs an embedder may want to rebalance without
/// recompiling (they are loaded from the balance table by `battle-content`).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleConfig {
    /// Base flee chance in percent before the speed differential is added.
    pub flee_base: i32,

    /// Upper bound (exclusive) of the surprise die rolled for each side in a
    /// random encounter. A roll of 1 on exactly one side grants it a full
    /// opening gauge.
    pub surprise_die: i32,

    /// Surprise die used instead when the party is a single hero, who is
    /// harder to ambush and better at ambushing.
    pub surprise_die_solo: i32,
}

impl BattleConfig {
    // ===== compile-time constants used as type parameters =====
    /// Hero slots. Heroes always occupy the low slot indices.
    pub const MAX_PARTY: usize = 2;
    /// Enemy slots, starting at `MAX_PARTY`.
    pub const MAX_ENEMIES: usize = 5;
    /// Total roster size.
    pub const MAX_COMBATANTS: usize = Self::MAX_PARTY + Self::MAX_ENEMIES;
    /// Skill/spell slots per combatant, shared with the AI priority table.
    pub const SKILL_SLOTS: usize = 8;

    /// Gauge threshold at which a combatant becomes action-eligible, and the
    /// modulus of the round-phase counter.
    pub const ROUND_MAX: i32 = 400;
    /// Round-phase increment per gauge update.
    pub const BATTLE_INC: i32 = 20;
    /// Raw frames per gauge update.
    pub const GAUGE_FRAMES: u32 = 10;

    /// Minimum span of the damage variance roll.
    pub const DMG_RND_MIN: i32 = 5;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_FLEE_BASE: i32 = 40;
    pub const DEFAULT_SURPRISE_DIE: i32 = 11;
    pub const DEFAULT_SURPRISE_DIE_SOLO: i32 = 21;

    pub fn new() -> Self {
        Self {
            flee_base: Self::DEFAULT_FLEE_BASE,
            surprise_die: Self::DEFAULT_SURPRISE_DIE,
            surprise_die_solo: Self::DEFAULT_SURPRISE_DIE_SOLO,
        }
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}
