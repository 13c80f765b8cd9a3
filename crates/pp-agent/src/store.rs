//! Core agent storage: the atomic Structure-of-Arrays population arena.
//!
//! # Sharing model
//!
//! Workers never hold `&mut AgentStore`.  They share one `&AgentStore` and
//! address agents by [`AgentId`]; every mutable field is an atomic, and the
//! only way to change one is through the update methods below, each of which
//! is a single read-modify-write:
//!
//! | Field                | Update                                   |
//! |----------------------|------------------------------------------|
//! | `score`              | `fetch_add`                              |
//! | `generosity`         | CAS loop, clamped to `[1, max]`          |
//! | `local_max_estimate` | `fetch_max` (or `store` for replacement) |
//! | `phase_countdown`    | `fetch_sub` / `fetch_add`                |
//!
//! All operations use `Relaxed` ordering.  The fields are independent
//! counters, and the worker join at the end of a run publishes every write to
//! the thread that reads final statistics.

use std::sync::atomic::{AtomicI64, AtomicU32, Ordering};

use pp_core::{AgentId, Strategy};

const ORD: Ordering = Ordering::Relaxed;

// ── AgentState ────────────────────────────────────────────────────────────────

/// A plain-data copy of one agent, read field by field.
///
/// Reading a live agent while workers run yields a best-effort value: fields
/// may come from different moments.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentState {
    pub strategy:           Strategy,
    pub score:              i64,
    pub generosity:         u32,
    pub local_max_estimate: u32,
    pub phase_countdown:    i64,
}

// ── AgentStore ────────────────────────────────────────────────────────────────

/// Structure-of-Arrays storage for the whole population.
///
/// Every `Vec` has exactly `count` elements; the `AgentId` value is the index
/// into all of them.  The arena is never resized or re-ordered after
/// construction.
pub struct AgentStore {
    /// Number of agents.  Equals the length of every SoA `Vec`.
    pub count: usize,

    /// Upper bound of every Adaptive agent's generosity.
    pub max_generosity: u32,

    /// Immutable strategy per agent.
    pub strategy: Vec<Strategy>,

    score:              Vec<AtomicI64>,
    generosity:         Vec<AtomicU32>,
    local_max_estimate: Vec<AtomicU32>,
    phase_countdown:    Vec<AtomicI64>,
}

impl AgentStore {
    /// Build a store from explicit per-agent states.
    ///
    /// `max_generosity` is raised to at least 1; each generosity is clamped to
    /// `[1, max_generosity]` and each estimate raised to at least 1 so the
    /// store starts inside its invariants.
    pub fn from_states<I>(max_generosity: u32, states: I) -> Self
    where
        I: IntoIterator<Item = AgentState>,
    {
        let max_generosity = max_generosity.max(1);
        let states: Vec<AgentState> = states.into_iter().collect();
        Self {
            count: states.len(),
            max_generosity,
            strategy: states.iter().map(|s| s.strategy).collect(),
            score: states.iter().map(|s| AtomicI64::new(s.score)).collect(),
            generosity: states
                .iter()
                .map(|s| AtomicU32::new(s.generosity.clamp(1, max_generosity)))
                .collect(),
            local_max_estimate: states
                .iter()
                .map(|s| AtomicU32::new(s.local_max_estimate.max(1)))
                .collect(),
            phase_countdown: states.iter().map(|s| AtomicI64::new(s.phase_countdown)).collect(),
        }
    }

    /// `true` if there are no agents.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterator over all `AgentId`s in ascending index order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.count as u32).map(AgentId)
    }

    // ── Reads ─────────────────────────────────────────────────────────────

    #[inline]
    pub fn strategy(&self, agent: AgentId) -> Strategy {
        self.strategy[agent.index()]
    }

    #[inline]
    pub fn score(&self, agent: AgentId) -> i64 {
        self.score[agent.index()].load(ORD)
    }

    #[inline]
    pub fn generosity(&self, agent: AgentId) -> u32 {
        self.generosity[agent.index()].load(ORD)
    }

    #[inline]
    pub fn local_max_estimate(&self, agent: AgentId) -> u32 {
        self.local_max_estimate[agent.index()].load(ORD)
    }

    #[inline]
    pub fn phase_countdown(&self, agent: AgentId) -> i64 {
        self.phase_countdown[agent.index()].load(ORD)
    }

    pub fn state(&self, agent: AgentId) -> AgentState {
        AgentState {
            strategy:           self.strategy(agent),
            score:              self.score(agent),
            generosity:         self.generosity(agent),
            local_max_estimate: self.local_max_estimate(agent),
            phase_countdown:    self.phase_countdown(agent),
        }
    }

    /// Copy every agent's state, in `AgentId` order.
    pub fn states(&self) -> Vec<AgentState> {
        self.agent_ids().map(|a| self.state(a)).collect()
    }

    /// Agent count per strategy, in [`Strategy::ALL`] order.
    pub fn strategy_counts(&self) -> [usize; 3] {
        let mut counts = [0usize; 3];
        for s in &self.strategy {
            let slot = match s {
                Strategy::AlwaysCooperate => 0,
                Strategy::AlwaysDefect    => 1,
                Strategy::Adaptive        => 2,
            };
            counts[slot] += 1;
        }
        counts
    }

    // ── Updates ───────────────────────────────────────────────────────────

    /// Add `delta` to the agent's score; returns the new score.
    #[inline]
    pub fn add_score(&self, agent: AgentId, delta: i64) -> i64 {
        self.score[agent.index()].fetch_add(delta, ORD).wrapping_add(delta)
    }

    /// Move generosity one level up (`raise = true`) or down, clamped to
    /// `[1, max_generosity]`.  Returns the new level.
    pub fn step_generosity(&self, agent: AgentId, raise: bool) -> u32 {
        let max = self.max_generosity;
        let next = |g: u32| {
            if raise {
                g.saturating_add(1).min(max)
            } else {
                g.saturating_sub(1).max(1)
            }
        };
        let prev = self.generosity[agent.index()]
            .fetch_update(ORD, ORD, |g| Some(next(g)))
            .unwrap_or_else(|g| g);
        next(prev)
    }

    /// `estimate = max(estimate, candidate)`; returns the merged value.
    #[inline]
    pub fn merge_estimate(&self, agent: AgentId, candidate: u32) -> u32 {
        self.local_max_estimate[agent.index()]
            .fetch_max(candidate, ORD)
            .max(candidate)
    }

    /// Overwrite the estimate (raised to at least 1).
    #[inline]
    pub fn replace_estimate(&self, agent: AgentId, value: u32) -> u32 {
        let value = value.max(1);
        self.local_max_estimate[agent.index()].store(value, ORD);
        value
    }

    /// Decrement the phase countdown; returns the new value.
    ///
    /// Exactly one caller per phase sees the countdown land on `0`; that
    /// caller owns the expiry and must call
    /// [`restart_phase`][Self::restart_phase].  Concurrent ticks arriving
    /// before the restart drive the value below zero and are kept.
    #[inline]
    pub fn tick_countdown(&self, agent: AgentId) -> i64 {
        self.phase_countdown[agent.index()].fetch_sub(1, ORD) - 1
    }

    /// Add a new phase of `length` ticks on top of the current countdown;
    /// returns the new value.  A result `<= 0` means the ticks that arrived
    /// since the expiry already used up the new phase as well.
    #[inline]
    pub fn restart_phase(&self, agent: AgentId, length: i64) -> i64 {
        self.phase_countdown[agent.index()].fetch_add(length, ORD) + length
    }
}
