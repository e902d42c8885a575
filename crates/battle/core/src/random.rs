//! Session random number source.
//!
//! Every probabilistic decision in the engine (hit rolls, damage variance,
//! status saves, AI draws) consumes a single injected [`RandomSource`] in a
//! deterministic call order. Given the same seed and the same inputs, a
//! battle replays identically, which the regression tests rely on.

/// Uniform integer stream consumed by every probability check.
///
/// Implementations must be deterministic: the same seed must produce the
/// same sequence. The session owns one instance and re-seeds it once per
/// game session, not per battle.
pub trait RandomSource {
    /// Produce the next raw 32-bit value and advance the stream.
    fn next_u32(&mut self) -> u32;

    /// Uniform value in `[lo, hi)`, matching the half-open range convention
    /// used by every formula in the engine. Degenerate ranges collapse to
    /// `lo`.
    fn range(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo + 1 {
            return lo;
        }
        let span = (hi - lo) as u32;
        lo + (self.next_u32() % span) as i32
    }

    /// Roll in `[0, 100)` against a percent chance; true when it lands.
    fn percent(&mut self, chance: i32) -> bool {
        self.range(0, 100) < chance
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// PCG-XSH-RR: 64-bit LCG state permuted down to 32-bit output. Small,
/// fast, and statistically solid, which is all a battle engine needs.
///
/// # References
///
/// - PCG paper: <https://www.pcg-random.org/>
#[derive(Clone, Debug)]
pub struct Pcg32 {
    state: u64,
}

impl Pcg32 {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    /// Create a generator from a session seed.
    pub fn new(seed: u64) -> Self {
        // One warm-up step so trivial seeds (0, 1) diverge immediately.
        let mut rng = Self { state: seed };
        rng.step();
        rng
    }

    #[inline]
    fn step(&mut self) {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
    }

    /// XSH-RR output permutation: xorshift high bits, then a random rotate
    /// selected by the top bits of the state.
    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RandomSource for Pcg32 {
    fn next_u32(&mut self) -> u32 {
        self.step();
        Self::output(self.state)
    }
}

/// Scripted source replaying a fixed list of raw values, cycling when
/// exhausted. Test fixture for pinning individual rolls.
#[derive(Clone, Debug, Default)]
pub struct ScriptedSource {
    values: Vec<u32>,
    cursor: usize,
}

impl ScriptedSource {
    pub fn new(values: Vec<u32>) -> Self {
        Self { values, cursor: 0 }
    }
}

impl RandomSource for ScriptedSource {
    fn next_u32(&mut self) -> u32 {
        if self.values.is_empty() {
            return 0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v
    }
}
