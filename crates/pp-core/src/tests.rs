//! Unit tests for pp-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, WorkerId};

    #[test]
    fn index_roundtrip() {
        let id = AgentId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(AgentId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(AgentId(0) < AgentId(1));
        assert!(WorkerId(3) > WorkerId(2));
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "AgentId(7)");
        assert_eq!(WorkerId(0).to_string(), "WorkerId(0)");
    }
}

#[cfg(test)]
mod strategy {
    use crate::Strategy;

    #[test]
    fn only_adaptive_is_adaptive() {
        assert!(Strategy::Adaptive.is_adaptive());
        assert!(!Strategy::AlwaysCooperate.is_adaptive());
        assert!(!Strategy::AlwaysDefect.is_adaptive());
    }

    #[test]
    fn display() {
        assert_eq!(Strategy::AlwaysCooperate.to_string(), "AC");
        assert_eq!(Strategy::AlwaysDefect.to_string(), "AD");
        assert_eq!(Strategy::Adaptive.to_string(), "GTFT");
    }
}

#[cfg(test)]
mod config {
    use crate::{PpError, Proportions, SimConfig, Strategy, WorkerId};

    #[test]
    fn default_is_valid() {
        SimConfig::default().validate().unwrap();
    }

    #[test]
    fn reference_counts() {
        // 500 agents at 30/30/40.
        assert_eq!(Proportions::default().counts(500), [150, 150, 200]);
    }

    #[test]
    fn all_adaptive_needs_one_bucket() {
        let p = Proportions::all_adaptive();
        assert_eq!(p.required_buckets(), 1);
        assert_eq!(p.counts(7), [0, 0, 7]);
    }

    #[test]
    fn population_smaller_than_buckets_rejected() {
        let cfg = SimConfig { population_size: 2, ..SimConfig::default() };
        assert!(matches!(
            cfg.validate(),
            Err(PpError::PopulationTooSmall { size: 2, buckets: 3 })
        ));
    }

    #[test]
    fn empty_population_rejected() {
        let cfg = SimConfig {
            population_size: 0,
            proportions:     Proportions::all_adaptive(),
            ..SimConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(PpError::PopulationTooSmall { size: 0, .. })));
    }

    #[test]
    fn strategy_rounding_to_zero_rejected() {
        // 3 agents at 30/30/40 → 0 AC, 0 AD, 3 Adaptive.
        let cfg = SimConfig { population_size: 3, ..SimConfig::default() };
        assert!(matches!(
            cfg.validate(),
            Err(PpError::EmptyStrategy { strategy: Strategy::AlwaysCooperate, size: 3 })
        ));
    }

    #[test]
    fn proportions_over_one_rejected() {
        let cfg = SimConfig {
            proportions: Proportions::new(0.7, 0.5),
            ..SimConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(PpError::Config(_))));
    }

    #[test]
    fn negative_proportion_rejected() {
        let cfg = SimConfig {
            proportions: Proportions::new(-0.1, 0.5),
            ..SimConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn zero_workers_rejected() {
        let cfg = SimConfig { worker_count: 0, ..SimConfig::default() };
        assert!(matches!(cfg.validate(), Err(PpError::Config(_))));
    }

    #[test]
    fn game_params_checked() {
        let mut cfg = SimConfig::default();
        cfg.game.benefit = 2;
        cfg.game.cost = 2;
        assert!(cfg.validate().is_err());
        cfg.game.benefit = 5;
        cfg.game.cost = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn zero_max_generosity_and_tau_rejected() {
        let cfg = SimConfig { max_generosity: 0, ..SimConfig::default() };
        assert!(cfg.validate().is_err());
        let cfg = SimConfig { tau: 0, ..SimConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn worker_budget_spends_everything() {
        let cfg = SimConfig {
            total_interactions: 10,
            worker_count:       4,
            ..SimConfig::default()
        };
        let budgets: Vec<u64> = (0..4).map(|w| cfg.worker_budget(WorkerId(w))).collect();
        assert_eq!(budgets, vec![3, 3, 2, 2]);
        assert_eq!(budgets.iter().sum::<u64>(), 10);
    }

    #[test]
    fn worker_budget_zero_total() {
        let cfg = SimConfig {
            total_interactions: 0,
            worker_count:       3,
            ..SimConfig::default()
        };
        assert!((0..3).all(|w| cfg.worker_budget(WorkerId(w)) == 0));
    }
}

#[cfg(test)]
mod rng {
    use crate::{SimRng, WorkerId, WorkerRng};

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = WorkerRng::new(12345, WorkerId(0));
        let mut r2 = WorkerRng::new(12345, WorkerId(0));
        for _ in 0..100 {
            let a: u64 = r1.random();
            let b: u64 = r2.random();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn different_workers_differ() {
        let mut r0 = WorkerRng::new(1, WorkerId(0));
        let mut r1 = WorkerRng::new(1, WorkerId(1));
        let a: u64 = r0.random();
        let b: u64 = r1.random();
        assert_ne!(a, b, "seeds for adjacent workers should diverge");
    }

    #[test]
    fn worker_stream_differs_from_setup_stream() {
        let mut setup = SimRng::new(9);
        let mut worker = WorkerRng::new(9, WorkerId(0));
        let a: u64 = setup.random();
        let b: u64 = worker.random();
        assert_ne!(a, b);
    }

    #[test]
    fn child_streams_differ() {
        let mut a = SimRng::new(4).child(0);
        let mut b = SimRng::new(4).child(1);
        let x: u64 = a.random();
        let y: u64 = b.random();
        assert_ne!(x, y);
    }

    #[test]
    fn gen_bool_extremes() {
        let mut rng = WorkerRng::new(0, WorkerId(0));
        assert!(!rng.gen_bool(0.0));
        assert!(rng.gen_bool(1.0));
    }

    #[test]
    fn geometric_is_at_least_one() {
        let mut rng = WorkerRng::new(3, WorkerId(0));
        assert!((0..10_000).all(|_| rng.geometric() >= 1));
    }

    #[test]
    fn geometric_mean_near_two() {
        let mut rng = SimRng::new(77);
        let n = 100_000;
        let sum: u64 = (0..n).map(|_| rng.geometric() as u64).sum();
        let mean = sum as f64 / n as f64;
        assert!((mean - 2.0).abs() < 0.05, "mean {mean}");
    }

    #[test]
    fn geometric_half_are_one() {
        let mut rng = SimRng::new(5);
        let n = 100_000;
        let ones = (0..n).filter(|_| rng.geometric() == 1).count();
        let frac = ones as f64 / n as f64;
        assert!((frac - 0.5).abs() < 0.01, "P(s = 1) ≈ {frac}");
    }
}
