//! Read-only aggregate statistics over the population.

use std::fmt;

use pp_core::Strategy;

use crate::AgentStore;

/// `2^exponent`, saturating at `u64::MAX`.
#[inline]
pub fn size_from_exponent(exponent: u32) -> u64 {
    1u64.checked_shl(exponent).unwrap_or(u64::MAX)
}

/// One snapshot of the population's aggregate state.
///
/// Taken mid-run it is a best-effort view: agents are read one at a time
/// while other workers keep interacting.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Statistics {
    /// Expected share of cooperating moves, in percent:
    /// `(#AlwaysCooperate + Σ_adaptive generosity / max) / N * 100`.
    pub cooperation_percentage: f64,

    /// `2^g` where `g` is the largest local estimate held by any agent.
    pub estimated_population_size: u64,
}

impl Statistics {
    /// Compute a snapshot from the current store contents.
    pub fn collect(store: &AgentStore) -> Self {
        Self {
            cooperation_percentage:    store.cooperation_percentage(),
            estimated_population_size: size_from_exponent(store.global_max_estimate()),
        }
    }

    /// `100 - cooperation_percentage`.
    #[inline]
    pub fn defection_percentage(&self) -> f64 {
        100.0 - self.cooperation_percentage
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "C: {:.2}%, D: {:.2}% | Est. Population: {}",
            self.cooperation_percentage,
            self.defection_percentage(),
            self.estimated_population_size,
        )
    }
}

impl AgentStore {
    /// Expected cooperation percentage; 0 for an empty store.
    pub fn cooperation_percentage(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let max = self.max_generosity as f64;
        let expected: f64 = self
            .agent_ids()
            .map(|a| match self.strategy(a) {
                Strategy::AlwaysCooperate => 1.0,
                Strategy::AlwaysDefect    => 0.0,
                Strategy::Adaptive        => self.generosity(a) as f64 / max,
            })
            .sum();
        expected / self.count as f64 * 100.0
    }

    /// Largest `local_max_estimate` across all agents (0 for an empty store).
    pub fn global_max_estimate(&self) -> u32 {
        self.agent_ids()
            .map(|a| self.local_max_estimate(a))
            .max()
            .unwrap_or(0)
    }
}
