//! Run configuration.
//!
//! `SimConfig` gathers every knob a simulation run needs.  It is plain data:
//! applications build it from CLI flags or deserialize it from JSON (with the
//! `serde` feature), then hand it to `pp-sim`'s `SimBuilder`, which calls
//! [`SimConfig::validate`] before anything is allocated.

use crate::{PpError, PpResult, Strategy, WorkerId};

/// Default resample period multiplier for the GRV phase clock.
pub const DEFAULT_TAU: u32 = 64;

/// Tolerance used when comparing floating-point proportions.
const PROPORTION_EPSILON: f64 = 1e-9;

// ── Proportions ───────────────────────────────────────────────────────────────

/// Strategy mixture of a freshly created population.
///
/// `AlwaysCooperate` and `AlwaysDefect` counts are `floor(size * share)`;
/// every remaining agent is `Adaptive`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Proportions {
    pub always_cooperate: f64,
    pub always_defect:    f64,
}

impl Proportions {
    pub fn new(always_cooperate: f64, always_defect: f64) -> Self {
        Self { always_cooperate, always_defect }
    }

    /// Every agent is `Adaptive`.
    pub fn all_adaptive() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Implied share of `Adaptive` agents.
    #[inline]
    pub fn adaptive(&self) -> f64 {
        1.0 - self.always_cooperate - self.always_defect
    }

    /// Requested share of `strategy`.
    pub fn share(&self, strategy: Strategy) -> f64 {
        match strategy {
            Strategy::AlwaysCooperate => self.always_cooperate,
            Strategy::AlwaysDefect    => self.always_defect,
            Strategy::Adaptive        => self.adaptive(),
        }
    }

    /// Agent count per strategy, in [`Strategy::ALL`] order.
    pub fn counts(&self, size: usize) -> [usize; 3] {
        let cooperate = ((size as f64 * self.always_cooperate) as usize).min(size);
        let defect = ((size as f64 * self.always_defect) as usize).min(size - cooperate);
        [cooperate, defect, size - cooperate - defect]
    }

    /// Number of strategies with a non-zero requested share.
    pub fn required_buckets(&self) -> usize {
        Strategy::ALL
            .iter()
            .filter(|&&s| self.share(s) > PROPORTION_EPSILON)
            .count()
    }

    fn validate(&self) -> PpResult<()> {
        for (name, p) in [
            ("always_cooperate", self.always_cooperate),
            ("always_defect", self.always_defect),
        ] {
            if !p.is_finite() || p < 0.0 {
                return Err(PpError::Config(format!("{name} proportion must be ≥ 0, got {p}")));
            }
        }
        if self.adaptive() < -PROPORTION_EPSILON {
            return Err(PpError::Config(format!(
                "proportions sum to {} (> 1)",
                self.always_cooperate + self.always_defect
            )));
        }
        Ok(())
    }
}

impl Default for Proportions {
    /// 30 % AlwaysCooperate, 30 % AlwaysDefect, 40 % Adaptive.
    fn default() -> Self {
        Self::new(0.3, 0.3)
    }
}

// ── GameParams ────────────────────────────────────────────────────────────────

/// Donation-game payoffs: a donor pays `cost` so the recipient gains `benefit`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameParams {
    pub benefit: i64,
    pub cost:    i64,
}

impl Default for GameParams {
    fn default() -> Self {
        Self { benefit: 5, cost: 2 }
    }
}

// ── Regime / ResampleRule ─────────────────────────────────────────────────────

/// How concurrent workers share the population.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Regime {
    /// One global lock around pair selection and the whole interaction.
    /// At most one interaction runs at a time.
    Exclusive,
    /// No global lock.  Every agent field is updated with atomic
    /// read-modify-write operations, so interactions on disjoint pairs run in
    /// parallel.
    #[default]
    Atomic,
}

impl Regime {
    pub fn as_str(self) -> &'static str {
        match self {
            Regime::Exclusive => "exclusive",
            Regime::Atomic    => "atomic",
        }
    }
}

impl std::fmt::Display for Regime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happens to an agent's estimate when its phase countdown expires.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ResampleRule {
    /// `estimate = max(estimate, sample)`.  The local estimate never
    /// decreases, so the global estimate can only grow over a run.
    #[default]
    Accumulate,
    /// `estimate = sample`.  Lets a stale high estimate fall away once every
    /// holder has resampled without meeting a higher peer.
    Replace,
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Number of agents.  Fixed for the whole run.
    pub population_size: usize,

    /// Strategy mixture at creation.
    pub proportions: Proportions,

    /// Upper bound of the Adaptive generosity level (`k` in k-IGT dynamics).
    pub max_generosity: u32,

    /// Donation-game benefit and cost.
    pub game: GameParams,

    /// Phase clock multiplier: an agent's countdown resets to
    /// `tau * local_max_estimate` after every resample.
    pub tau: u32,

    /// Interaction budget shared by all workers.  Self-pairs count.
    pub total_interactions: u64,

    /// Number of concurrent worker threads.
    pub worker_count: usize,

    /// Take a statistics sample every N completed rounds per worker.
    /// 0 disables sampling.
    pub sampling_interval: u64,

    /// Master RNG seed.  With one worker the same seed always produces
    /// identical results.
    pub seed: u64,

    /// Shared-population concurrency regime.
    pub regime: Regime,

    /// Estimate update rule on countdown expiry.
    pub resample: ResampleRule,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            population_size:    500,
            proportions:        Proportions::default(),
            max_generosity:     5,
            game:               GameParams::default(),
            tau:                DEFAULT_TAU,
            total_interactions: 10_000,
            worker_count:       1,
            sampling_interval:  100,
            seed:               42,
            regime:             Regime::default(),
            resample:           ResampleRule::default(),
        }
    }
}

impl SimConfig {
    /// Reject misconfiguration before any simulation state is created.
    pub fn validate(&self) -> PpResult<()> {
        self.proportions.validate()?;

        let size = self.population_size;
        let buckets = self.proportions.required_buckets();
        if size == 0 || size < buckets {
            return Err(PpError::PopulationTooSmall { size, buckets });
        }
        let counts = self.proportions.counts(size);
        for (strategy, count) in Strategy::ALL.into_iter().zip(counts) {
            if count == 0 && self.proportions.share(strategy) > PROPORTION_EPSILON {
                return Err(PpError::EmptyStrategy { strategy, size });
            }
        }

        if self.max_generosity == 0 {
            return Err(PpError::Config("max_generosity must be ≥ 1".into()));
        }
        if self.game.cost <= 0 || self.game.benefit <= self.game.cost {
            return Err(PpError::Config(format!(
                "donation game needs benefit > cost > 0, got benefit={} cost={}",
                self.game.benefit, self.game.cost
            )));
        }
        if self.tau == 0 {
            return Err(PpError::Config("tau must be ≥ 1".into()));
        }
        if self.worker_count == 0 {
            return Err(PpError::Config("worker_count must be ≥ 1".into()));
        }
        if u32::try_from(self.worker_count).is_err() {
            return Err(PpError::Config(format!("worker_count {} is too large", self.worker_count)));
        }
        if u32::try_from(size).is_err() {
            return Err(PpError::Config(format!("population_size {size} exceeds u32::MAX")));
        }
        Ok(())
    }

    /// Rounds assigned to `worker`.
    ///
    /// The budget is split evenly; the first `total % workers` workers take one
    /// extra round so the whole budget is spent.
    pub fn worker_budget(&self, worker: WorkerId) -> u64 {
        let workers = self.worker_count.max(1) as u64;
        let base = self.total_interactions / workers;
        let extra = (worker.0 as u64) < self.total_interactions % workers;
        base + extra as u64
    }
}
