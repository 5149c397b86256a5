//! Deterministic per-taxi and simulation-level RNG wrappers.
//!
//! # Determinism strategy
//!
//! Each taxi gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (taxi_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive ids uniformly across the seed space.  Taxis
//! never share RNG state, so the order in which the stepper visits them
//! does not change any individual taxi's random draws.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::TaxiId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── TaxiRng ───────────────────────────────────────────────────────────────────

/// Per-taxi deterministic RNG, owned by the taxi it drives.
pub struct TaxiRng(SmallRng);

impl TaxiRng {
    /// Seed deterministically from the run's global seed and a taxi id.
    pub fn new(global_seed: u64, taxi: TaxiId) -> Self {
        let seed = global_seed ^ (taxi.0 as u64).wrapping_mul(MIXING_CONSTANT);
        TaxiRng(SmallRng::seed_from_u64(seed))
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// Choose a random element from a slice.
    /// Returns `None` if the slice is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }
}

impl std::fmt::Debug for TaxiRng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TaxiRng(..)")
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Simulation-level RNG for global operations such as initial fleet
/// placement.  Used only on the building thread.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }
}
