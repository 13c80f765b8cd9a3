//! The `Protocol` trait — the interaction rule applied to every sampled pair.

use pp_agent::AgentStore;
use pp_core::{AgentId, SimConfig, WorkerRng};

use crate::{DonationGame, SizeEstimation, adapt, decide};

/// What happened in one pairwise interaction.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct InteractionOutcome {
    pub a_cooperated: bool,
    pub b_cooperated: bool,
    pub a_payoff:     i64,
    pub b_payoff:     i64,
    /// Phases restarted across both agents (normally 0–2).
    pub resamples:    u32,
}

impl InteractionOutcome {
    /// Number of cooperative moves this round (0–2).
    #[inline]
    pub fn cooperations(&self) -> u8 {
        self.a_cooperated as u8 + self.b_cooperated as u8
    }
}

/// Pluggable interaction rule.
///
/// The scheduler calls [`interact`][Self::interact] from many worker threads
/// at once with a shared `&AgentStore`, so implementations must be
/// `Send + Sync` and must mutate agents only through the store's atomic
/// update methods.  `a != b` is guaranteed by the caller.
///
/// # Example
///
/// ```rust,ignore
/// struct ScoreOnly;
///
/// impl Protocol for ScoreOnly {
///     fn interact(&self, a: AgentId, b: AgentId, store: &AgentStore, _rng: &mut WorkerRng)
///         -> InteractionOutcome
///     {
///         store.add_score(a, 1);
///         store.add_score(b, 1);
///         InteractionOutcome { a_payoff: 1, b_payoff: 1, ..Default::default() }
///     }
/// }
/// ```
pub trait Protocol: Send + Sync + 'static {
    fn interact(
        &self,
        a:     AgentId,
        b:     AgentId,
        store: &AgentStore,
        rng:   &mut WorkerRng,
    ) -> InteractionOutcome;
}

/// Donation game with generosity adaptation and piggybacked size estimation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DonationProtocol {
    pub game:       DonationGame,
    pub estimation: SizeEstimation,
}

impl DonationProtocol {
    pub fn new(game: DonationGame, estimation: SizeEstimation) -> Self {
        Self { game, estimation }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.game.into(), SizeEstimation::from_config(config))
    }
}

impl Protocol for DonationProtocol {
    fn interact(
        &self,
        a:     AgentId,
        b:     AgentId,
        store: &AgentStore,
        rng:   &mut WorkerRng,
    ) -> InteractionOutcome {
        let max = store.max_generosity;
        let (strategy_a, strategy_b) = (store.strategy(a), store.strategy(b));

        // ── Play ──────────────────────────────────────────────────────────
        let a_cooperated = decide(strategy_a, store.generosity(a), max, rng);
        let b_cooperated = decide(strategy_b, store.generosity(b), max, rng);
        let (a_payoff, b_payoff) = self.game.payoffs(a_cooperated, b_cooperated);
        store.add_score(a, a_payoff);
        store.add_score(b, b_payoff);

        // ── Adapt ─────────────────────────────────────────────────────────
        adapt(store, a, strategy_b);
        adapt(store, b, strategy_a);

        // ── Estimate ──────────────────────────────────────────────────────
        let phases_a = self.estimation.step(store, a, b, rng).phases;
        let phases_b = self.estimation.step(store, b, a, rng).phases;

        InteractionOutcome {
            a_cooperated,
            b_cooperated,
            a_payoff,
            b_payoff,
            resamples: phases_a + phases_b,
        }
    }
}
