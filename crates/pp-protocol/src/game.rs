//! The one-shot donation game and Adaptive generosity dynamics.

use pp_agent::AgentStore;
use pp_core::{AgentId, GameParams, Strategy, WorkerRng};

/// Donation-game payoff table.
///
/// A cooperator pays `cost` so its partner gains `benefit`; a defector pays
/// nothing and gives nothing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DonationGame {
    pub benefit: i64,
    pub cost:    i64,
}

impl DonationGame {
    pub fn new(benefit: i64, cost: i64) -> Self {
        Self { benefit, cost }
    }

    /// Payoffs `(a, b)` for the two decisions.
    ///
    /// | a \ b     | cooperate          | defect        |
    /// |-----------|--------------------|---------------|
    /// | cooperate | `(b - c, b - c)`   | `(-c, b)`     |
    /// | defect    | `(b, -c)`          | `(0, 0)`      |
    pub fn payoffs(&self, a_cooperates: bool, b_cooperates: bool) -> (i64, i64) {
        let mutual = self.benefit - self.cost;
        match (a_cooperates, b_cooperates) {
            (true, true)   => (mutual, mutual),
            (true, false)  => (-self.cost, self.benefit),
            (false, true)  => (self.benefit, -self.cost),
            (false, false) => (0, 0),
        }
    }
}

impl From<GameParams> for DonationGame {
    fn from(p: GameParams) -> Self {
        Self::new(p.benefit, p.cost)
    }
}

/// Whether an agent cooperates this round.
///
/// Adaptive agents flip a coin weighted `generosity / max_generosity` on the
/// calling worker's RNG; the fixed strategies never touch the RNG.
pub fn decide(
    strategy:       Strategy,
    generosity:     u32,
    max_generosity: u32,
    rng:            &mut WorkerRng,
) -> bool {
    match strategy {
        Strategy::AlwaysCooperate => true,
        Strategy::AlwaysDefect    => false,
        Strategy::Adaptive        => {
            rng.gen_bool(generosity as f64 / max_generosity.max(1) as f64)
        }
    }
}

/// Adjust `agent`'s generosity in reaction to its partner's strategy class.
///
/// Only Adaptive agents adapt.  Meeting a cooperator or another Adaptive agent
/// raises generosity by one; meeting a defector lowers it by one.  The
/// partner's actual move this round is irrelevant.  Returns the new level, or
/// `None` for non-adaptive agents.
pub fn adapt(store: &AgentStore, agent: AgentId, partner: Strategy) -> Option<u32> {
    if !store.strategy(agent).is_adaptive() {
        return None;
    }
    let raise = match partner {
        Strategy::AlwaysCooperate | Strategy::Adaptive => true,
        Strategy::AlwaysDefect                         => false,
    };
    Some(store.step_generosity(agent, raise))
}
