//! Fluent builder for constructing a [`Sim`].

use parking_lot::Mutex;
use pp_agent::{AgentStore, PopulationBuilder};
use pp_core::{SimConfig, SimRng};
use pp_protocol::{DonationProtocol, Protocol};

use crate::{Sim, SimError, SimResult};

/// Stream offset of the per-run seed generator under the master seed.
pub const RUN_STREAM: u64 = 1;

/// Fluent builder for [`Sim<P>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: population, budget, workers, regime, seed, …
/// - `P: Protocol`: the interaction rule
///
/// # Optional inputs (have defaults)
///
/// | Method             | Default                                       |
/// |--------------------|-----------------------------------------------|
/// | `.population(s)`   | `PopulationBuilder::from_config(&config)`     |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::from_config(config).build()?;
/// let report = sim.run(&mut NoopObserver)?;
/// println!("{}", report.final_stats);
/// ```
pub struct SimBuilder<P: Protocol> {
    config:     SimConfig,
    protocol:   P,
    population: Option<AgentStore>,
}

impl<P: Protocol> SimBuilder<P> {
    pub fn new(config: SimConfig, protocol: P) -> Self {
        Self { config, protocol, population: None }
    }

    /// Run on an existing population instead of building one from the config.
    ///
    /// Its agent count must equal `config.population_size`.
    pub fn population(mut self, population: AgentStore) -> Self {
        self.population = Some(population);
        self
    }

    /// Validate the configuration, create the population if none was given,
    /// and return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<P>> {
        self.config.validate()?;

        let population = match self.population {
            Some(p) => {
                if p.count != self.config.population_size {
                    return Err(SimError::AgentCountMismatch {
                        expected: self.config.population_size,
                        got:      p.count,
                        what:     "supplied population",
                    });
                }
                p
            }
            None => PopulationBuilder::from_config(&self.config).build()?,
        };

        Ok(Sim {
            seeder:   SimRng::new(self.config.seed).child(RUN_STREAM),
            config:   self.config,
            population,
            protocol: self.protocol,
            lock:     Mutex::new(()),
        })
    }
}

impl SimBuilder<DonationProtocol> {
    /// Builder using the donation protocol parameterised from `config`.
    pub fn from_config(config: SimConfig) -> Self {
        let protocol = DonationProtocol::from_config(&config);
        Self::new(config, protocol)
    }
}
