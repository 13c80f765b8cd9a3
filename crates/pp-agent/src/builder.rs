//! Fluent builder for constructing a population [`AgentStore`].
//!
//! # Usage
//!
//! ```rust
//! use pp_agent::PopulationBuilder;
//! use pp_core::Proportions;
//!
//! let store = PopulationBuilder::new(500, /*seed=*/ 42)
//!     .proportions(Proportions::new(0.3, 0.3))
//!     .max_generosity(5)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(store.count, 500);
//! assert_eq!(store.strategy_counts(), [150, 150, 200]);
//! ```

use pp_core::{PpResult, Proportions, SimConfig, SimRng, Strategy};
use tracing::debug;

use crate::{AgentState, AgentStore};

/// Stream offset of the population-setup RNG under the master seed.
pub const POPULATION_STREAM: u64 = 0;

/// Starting generosity of an Adaptive agent: the middle level, rounded up.
#[inline]
pub fn initial_generosity(max_generosity: u32) -> u32 {
    max_generosity.max(1).div_ceil(2)
}

/// Fluent builder for [`AgentStore`].
///
/// Strategies are laid out in [`Strategy::ALL`] order by the configured
/// proportions, then shuffled once with the seeded setup RNG.  Each agent
/// starts with score 0, the middle generosity level, one fresh geometric
/// sample as its local estimate, and a phase countdown of `tau * estimate`.
pub struct PopulationBuilder {
    config: SimConfig,
}

impl PopulationBuilder {
    /// Create a builder for `size` agents using `seed` as the master seed.
    /// Other settings start at their [`SimConfig::default`] values.
    pub fn new(size: usize, seed: u64) -> Self {
        Self {
            config: SimConfig {
                population_size: size,
                seed,
                ..SimConfig::default()
            },
        }
    }

    /// Take size, seed, proportions, max generosity, and tau from `config`.
    pub fn from_config(config: &SimConfig) -> Self {
        Self { config: config.clone() }
    }

    pub fn proportions(mut self, proportions: Proportions) -> Self {
        self.config.proportions = proportions;
        self
    }

    pub fn max_generosity(mut self, max_generosity: u32) -> Self {
        self.config.max_generosity = max_generosity;
        self
    }

    pub fn tau(mut self, tau: u32) -> Self {
        self.config.tau = tau;
        self
    }

    /// Validate the configuration and allocate the arena.
    pub fn build(self) -> PpResult<AgentStore> {
        let cfg = &self.config;
        cfg.validate()?;

        let counts = cfg.proportions.counts(cfg.population_size);
        let mut strategies: Vec<Strategy> = Strategy::ALL
            .into_iter()
            .zip(counts)
            .flat_map(|(s, n)| std::iter::repeat_n(s, n))
            .collect();

        let mut rng = SimRng::new(cfg.seed).child(POPULATION_STREAM);
        rng.shuffle(&mut strategies);

        let generosity = initial_generosity(cfg.max_generosity);
        let tau = cfg.tau as i64;
        let states = strategies.into_iter().map(|strategy| {
            let estimate = rng.geometric();
            AgentState {
                strategy,
                score: 0,
                generosity,
                local_max_estimate: estimate,
                phase_countdown: tau * estimate as i64,
            }
        });
        let store = AgentStore::from_states(cfg.max_generosity, states);

        debug!(
            agents = store.count,
            always_cooperate = counts[0],
            always_defect = counts[1],
            adaptive = counts[2],
            initial_max_estimate = store.global_max_estimate(),
            "population created"
        );
        Ok(store)
    }
}

/// Create a population of `size` agents with the given strategy mixture.
///
/// Shorthand for [`PopulationBuilder`] with every knob spelled out.
pub fn create_population(
    size:           usize,
    proportions:    Proportions,
    max_generosity: u32,
    tau:            u32,
    seed:           u64,
) -> PpResult<AgentStore> {
    PopulationBuilder::new(size, seed)
        .proportions(proportions)
        .max_generosity(max_generosity)
        .tau(tau)
        .build()
}

