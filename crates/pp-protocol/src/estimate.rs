//! Self-stabilizing population-size estimation.
//!
//! # Algorithm
//!
//! Every agent holds an exponent `g` (its belief that the population is about
//! `2^g`) and a phase countdown.  Each time an agent `x` meets a partner `y`:
//!
//! 1. **Merge** — `x.g = max(x.g, y.g)`.  Gossip spreads the largest sample
//!    to everyone.
//! 2. **Tick** — `x.countdown -= 1`.
//! 3. **Resample** — when the countdown reaches zero, draw a fresh geometric
//!    sample `s` and fold it in according to the [`ResampleRule`], then add
//!    `tau * x.g` to the countdown.
//!
//! Because `P(s ≥ k) = 2^-(k-1)`, the maximum of one sample per agent lands
//! near `log2(N)`.  Phase length grows with the estimate, so large
//! populations resample less often.
//!
//! Under [`ResampleRule::Accumulate`] the global maximum only ever grows, and
//! every additional round of samples nudges it up by about `log2` of the
//! number of rounds.  [`ResampleRule::Replace`] lets an agent drop back to its
//! fresh sample, which is what allows an estimate to track a shrinking
//! population.

use pp_agent::AgentStore;
use pp_core::{AgentId, ResampleRule, SimConfig, WorkerRng};
use tracing::trace;

/// What one estimation step did to an agent.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EstimateUpdate {
    /// The agent's estimate after the step.
    pub estimate:  u32,
    /// The last fresh sample drawn this step, if the countdown expired.
    pub resampled: Option<u32>,
    /// Phases restarted this step.  `1` on expiry; more only when concurrent
    /// ticks overran the new phase before it was added.
    pub phases:    u32,
}

/// Parameters of the GRV phase clock.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SizeEstimation {
    /// Countdown reset multiplier.
    pub tau:  u32,
    pub rule: ResampleRule,
}

impl SizeEstimation {
    pub fn new(tau: u32, rule: ResampleRule) -> Self {
        Self { tau, rule }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.tau, config.resample)
    }

    /// Countdown length for an agent whose estimate is `estimate`.
    #[inline]
    pub fn phase_length(&self, estimate: u32) -> i64 {
        self.tau as i64 * estimate as i64
    }

    /// Run merge, tick, and (on expiry) resample for `agent` meeting
    /// `partner`.
    ///
    /// Only the tick that lands the countdown on exactly `0` expires the
    /// phase, so concurrent workers never resample the same phase twice.
    pub fn step(
        &self,
        store:   &AgentStore,
        agent:   AgentId,
        partner: AgentId,
        rng:     &mut WorkerRng,
    ) -> EstimateUpdate {
        let merged = store.merge_estimate(agent, store.local_max_estimate(partner));
        let mut update = EstimateUpdate { estimate: merged, resampled: None, phases: 0 };

        if store.tick_countdown(agent) != 0 {
            return update;
        }

        loop {
            let sample = rng.geometric();
            let (estimate, countdown) = self.resample(store, agent, sample);
            update.estimate = estimate;
            update.resampled = Some(sample);
            update.phases += 1;
            trace!(agent = agent.0, sample, estimate, countdown, "phase expired");
            if countdown > 0 {
                return update;
            }
        }
    }

    /// Fold `sample` into the agent's estimate and add a new phase to its
    /// countdown.  Returns the new estimate and countdown.
    pub fn resample(&self, store: &AgentStore, agent: AgentId, sample: u32) -> (u32, i64) {
        let estimate = match self.rule {
            ResampleRule::Accumulate => store.merge_estimate(agent, sample),
            ResampleRule::Replace    => store.replace_estimate(agent, sample),
        };
        let countdown = store.restart_phase(agent, self.phase_length(estimate));
        (estimate, countdown)
    }
}
