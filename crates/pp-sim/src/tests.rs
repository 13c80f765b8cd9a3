//! Integration tests for pp-sim.

use pp_agent::{AgentState, AgentStore, PopulationBuilder, Statistics};
use pp_core::{AgentId, PpError, Proportions, Regime, SimConfig, WorkerRng};
use pp_protocol::{InteractionOutcome, Protocol};

use crate::{NoopObserver, RunReport, Sample, SimBuilder, SimError, SimObserver};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn test_config(total_interactions: u64) -> SimConfig {
    SimConfig {
        population_size: 500,
        total_interactions,
        worker_count: 1,
        sampling_interval: 0,
        seed: 42,
        ..SimConfig::default()
    }
}

fn run(config: SimConfig) -> (Vec<AgentState>, RunReport) {
    let mut sim = SimBuilder::from_config(config).build().unwrap();
    let report = sim.run(&mut NoopObserver).unwrap();
    (sim.population.states(), report)
}

/// Records every callback in order.
#[derive(Default)]
struct Recorder {
    started: Option<Statistics>,
    samples: Vec<Sample>,
    ended:   bool,
}

impl SimObserver for Recorder {
    fn on_run_start(&mut self, _config: &SimConfig, initial: &Statistics) {
        self.started = Some(*initial);
    }
    fn on_sample(&mut self, sample: &Sample) {
        assert!(!self.ended, "sample after run end");
        self.samples.push(*sample);
    }
    fn on_run_end(&mut self, _report: &RunReport) {
        self.ended = true;
    }
}

/// Panics on the first interaction.
struct Exploding;

impl Protocol for Exploding {
    fn interact(&self, _: AgentId, _: AgentId, _: &AgentStore, _: &mut WorkerRng) -> InteractionOutcome {
        panic!("boom");
    }
}

// ── SimBuilder validation ─────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn builds_population_from_config() {
        let sim = SimBuilder::from_config(test_config(10)).build().unwrap();
        assert_eq!(sim.population.count, 500);
        assert_eq!(sim.population.strategy_counts(), [150, 150, 200]);
    }

    #[test]
    fn zero_workers_rejected() {
        let cfg = SimConfig { worker_count: 0, ..test_config(10) };
        let err = SimBuilder::from_config(cfg).build().err().unwrap();
        assert!(matches!(err, SimError::Config(PpError::Config(_))));
    }

    #[test]
    fn too_small_population_rejected() {
        let cfg = SimConfig { population_size: 2, ..test_config(10) };
        let err = SimBuilder::from_config(cfg).build().err().unwrap();
        assert!(matches!(
            err,
            SimError::Config(PpError::PopulationTooSmall { size: 2, buckets: 3 })
        ));
    }

    #[test]
    fn supplied_population_size_must_match() {
        let store = PopulationBuilder::new(100, 1).build().unwrap();
        let result = SimBuilder::from_config(test_config(10)).population(store).build();
        assert!(matches!(
            result,
            Err(SimError::AgentCountMismatch { expected: 500, got: 100, .. })
        ));
    }

    #[test]
    fn supplied_population_is_used() {
        let store = PopulationBuilder::new(500, 7).build().unwrap();
        let before = store.states();
        let sim = SimBuilder::from_config(test_config(10)).population(store).build().unwrap();
        assert_eq!(sim.population.states(), before);
    }
}

// ── Basic run ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use super::*;

    #[test]
    fn spends_whole_budget() {
        let cfg = SimConfig { worker_count: 3, ..test_config(1_001) };
        let (_, report) = run(cfg);
        assert_eq!(report.rounds, 1_001);
        assert_eq!(report.worker_count, 3);
        assert!(report.skipped <= report.rounds);
        assert_eq!(report.interactions(), report.rounds - report.skipped);
    }

    #[test]
    fn zero_budget_leaves_population_untouched() {
        let mut sim = SimBuilder::from_config(test_config(0)).build().unwrap();
        let before = sim.population.states();
        let report = sim.run(&mut NoopObserver).unwrap();
        assert_eq!(sim.population.states(), before);
        assert_eq!(report.final_stats, report.initial_stats);
        assert_eq!(report.rounds, 0);
        assert!(report.samples.is_empty());
    }

    #[test]
    fn same_seed_single_worker_is_reproducible() {
        let (a, ra) = run(test_config(5_000));
        let (b, rb) = run(test_config(5_000));
        assert_eq!(a, b);
        assert_eq!(ra.final_stats, rb.final_stats);
        assert_eq!(ra.cooperations, rb.cooperations);
    }

    #[test]
    fn different_seeds_diverge() {
        let (a, _) = run(test_config(5_000));
        let (b, _) = run(SimConfig { seed: 43, ..test_config(5_000) });
        assert_ne!(a, b);
    }

    #[test]
    fn single_agent_only_skips() {
        let cfg = SimConfig {
            population_size: 1,
            proportions: Proportions::all_adaptive(),
            ..test_config(50)
        };
        let (states, report) = run(cfg);
        assert_eq!(report.skipped, 50);
        assert_eq!(report.interactions(), 0);
        assert_eq!(states[0].score, 0);
    }

    #[test]
    fn run_simulation_matches_builder() {
        let cfg = test_config(2_000);
        let store = PopulationBuilder::from_config(&cfg).build().unwrap();
        let report = crate::run_simulation(cfg.clone(), store).unwrap();
        let (_, expected) = run(cfg);
        assert_eq!(report.final_stats, expected.final_stats);
    }
}

// ── Sampling and observer ─────────────────────────────────────────────────────

#[cfg(test)]
mod sampling_tests {
    use super::*;

    #[test]
    fn samples_every_interval_including_round_zero() {
        let cfg = SimConfig { sampling_interval: 10, ..test_config(100) };
        let (_, report) = run(cfg);
        let rounds: Vec<u64> = report.samples.iter().map(|s| s.round).collect();
        assert_eq!(rounds, vec![0, 10, 20, 30, 40, 50, 60, 70, 80, 90]);
    }

    #[test]
    fn samples_per_worker_budget() {
        // 101 rounds over 2 workers: 51 + 50.
        let cfg = SimConfig { sampling_interval: 10, worker_count: 2, ..test_config(101) };
        let (_, report) = run(cfg);
        let count = |w: u32| report.samples.iter().filter(|s| s.worker.0 == w).count();
        assert_eq!(count(0), 6);
        assert_eq!(count(1), 5);
        assert!(report.samples.windows(2).all(|p| (p[0].round, p[0].worker) <= (p[1].round, p[1].worker)));
    }

    #[test]
    fn zero_interval_disables_sampling() {
        let (_, report) = run(test_config(1_000));
        assert!(report.samples.is_empty());
    }

    #[test]
    fn observer_sees_whole_run() {
        let cfg = SimConfig { sampling_interval: 100, ..test_config(1_000) };
        let mut sim = SimBuilder::from_config(cfg).build().unwrap();
        let mut rec = Recorder::default();
        let report = sim.run(&mut rec).unwrap();
        assert_eq!(rec.started, Some(report.initial_stats));
        assert_eq!(rec.samples, report.samples);
        assert_eq!(rec.samples.len(), 10);
        assert!(rec.ended);
    }
}

// ── Concurrency regimes ───────────────────────────────────────────────────────

#[cfg(test)]
mod regime_tests {
    use super::*;

    fn check_invariants(regime: Regime) {
        let cfg = SimConfig { worker_count: 4, regime, ..test_config(40_000) };
        let initial = PopulationBuilder::from_config(&cfg).build().unwrap().states();
        let (states, report) = run(cfg.clone());

        assert_eq!(report.rounds, 40_000);
        for (before, after) in initial.iter().zip(&states) {
            assert_eq!(before.strategy, after.strategy);
            assert!((1..=cfg.max_generosity).contains(&after.generosity));
            assert!(after.local_max_estimate >= before.local_max_estimate);
        }
        // Every cooperative move moves `b - c` into the population total.
        let total: i64 = states.iter().map(|s| s.score).sum();
        let per_move = cfg.game.benefit - cfg.game.cost;
        assert_eq!(total, report.cooperations as i64 * per_move);
    }

    #[test]
    fn atomic_regime_keeps_invariants() {
        check_invariants(Regime::Atomic);
    }

    #[test]
    fn exclusive_regime_keeps_invariants() {
        check_invariants(Regime::Exclusive);
    }

    #[test]
    fn regimes_agree_with_one_worker() {
        let (a, _) = run(SimConfig { regime: Regime::Atomic, ..test_config(3_000) });
        let (b, _) = run(SimConfig { regime: Regime::Exclusive, ..test_config(3_000) });
        assert_eq!(a, b);
    }

    #[test]
    fn more_workers_than_rounds() {
        let cfg = SimConfig { worker_count: 8, ..test_config(3) };
        let (_, report) = run(cfg);
        assert_eq!(report.rounds, 3);
    }

    #[test]
    fn panicking_worker_aborts_run() {
        let cfg = SimConfig { worker_count: 2, ..test_config(100) };
        let mut sim = SimBuilder::new(cfg, Exploding).build().unwrap();
        let err = sim.run(&mut NoopObserver).err().unwrap();
        match err {
            SimError::WorkerAborted { reason, .. } => assert_eq!(reason, "boom"),
            other => panic!("unexpected error: {other}"),
        }
    }
}

// ── Emergent behaviour ────────────────────────────────────────────────────────

#[cfg(test)]
mod dynamics_tests {
    use super::*;

    #[test]
    fn cooperation_rises_in_reference_scenario() {
        let (_, report) = run(test_config(10_000));
        assert!((report.initial_stats.cooperation_percentage - 54.0).abs() < 1e-9);
        assert!(
            report.final_stats.cooperation_percentage > 60.0,
            "final {}",
            report.final_stats
        );
    }

    #[test]
    fn estimate_concentrates_near_population_size() {
        // The maximum of ~2N geometric samples has a heavy upper tail, so
        // single runs overshoot often; the median over many seeds does not.
        let n: usize = 512;
        let log2_n = n.trailing_zeros();
        let mut exponents: Vec<u32> = (0..101)
            .map(|seed| {
                let cfg = SimConfig {
                    population_size: n,
                    proportions: Proportions::all_adaptive(),
                    seed,
                    ..test_config(100_000)
                };
                let mut sim = SimBuilder::from_config(cfg).build().unwrap();
                sim.run(&mut NoopObserver).unwrap();
                sim.population.global_max_estimate()
            })
            .collect();
        exponents.sort_unstable();
        assert!(exponents[0] >= log2_n - 2, "min exponent {}, all {exponents:?}", exponents[0]);
        let median = exponents[exponents.len() / 2];
        assert!(median <= log2_n + 2, "median exponent {median}, all {exponents:?}");
    }
}
