//! Deterministic per-worker and simulation-level RNG wrappers.
//!
//! # Determinism strategy
//!
//! Every worker thread owns an independent `SmallRng` seeded by:
//!
//!   seed = run_seed XOR ((worker_index + 1) * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive worker indices uniformly across the seed space.
//!
//! - Workers never share RNG state (no contention, no ordering dependency).
//! - With a single worker a run is fully reproducible from its seed.
//! - All RNG calls are local to the owning thread; no synchronisation needed.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::WorkerId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Number of fair coin flips up to and including the first heads.
///
/// Each `u64` draw supplies 64 flips at once: the number of trailing zero bits
/// is the number of tails before the first heads.  An all-zero draw means 64
/// tails in a row and the count carries over to the next draw, so the support
/// is unbounded.
fn flips_until_heads<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    let mut flips = 1u32;
    loop {
        let bits: u64 = rng.r#gen();
        if bits != 0 {
            return flips.saturating_add(bits.trailing_zeros());
        }
        flips = flips.saturating_add(64);
    }
}

// ── WorkerRng ─────────────────────────────────────────────────────────────────

/// Per-worker deterministic RNG.
///
/// Created on the worker's own thread at the start of a run and dropped when
/// the worker finishes.  All protocol randomness (pair selection, Adaptive
/// coin flips, GRV resamples) for that worker flows through it.
pub struct WorkerRng(SmallRng);

impl WorkerRng {
    /// Seed deterministically from the run seed and a worker index.
    pub fn new(run_seed: u64, worker: WorkerId) -> Self {
        let seed = run_seed ^ (worker.0 as u64 + 1).wrapping_mul(MIXING_CONSTANT);
        WorkerRng(SmallRng::seed_from_u64(seed))
    }

    /// Sample a uniformly distributed value of any `Standard`-distributed type.
    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
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

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Geometric random variable: fair coin flips until the first heads (≥ 1).
    ///
    /// `P(s ≥ k) = 2^-(k-1)`, so the maximum over `N` samples sits near
    /// `log2(N)`.
    #[inline]
    pub fn geometric(&mut self) -> u32 {
        flips_until_heads(&mut self.0)
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Simulation-level RNG for single-threaded setup: shuffling the population,
/// drawing each agent's initial estimate, and deriving per-run seeds.
///
/// If you need parallel randomness, derive a seed from this one and hand it to
/// [`WorkerRng::new`].
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `SimRng` with a different seed offset, for
    /// splitting independent streams off the root seed.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }

    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    /// Shuffle a mutable slice in-place (Fisher-Yates).
    #[inline]
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.0);
    }

    /// Geometric random variable; see [`WorkerRng::geometric`].
    #[inline]
    pub fn geometric(&mut self) -> u32 {
        flips_until_heads(&mut self.0)
    }
}
