//! The `Sim` struct and its worker pool.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use pp_agent::{AgentStore, Statistics};
use pp_core::{AgentId, Regime, SimConfig, SimRng, WorkerId, WorkerRng};
use pp_protocol::{InteractionOutcome, Protocol};
use rayon::ThreadPoolBuilder;
use tracing::{debug, info};

use crate::{Sample, SimError, SimObserver, SimResult};

// ── Reports ───────────────────────────────────────────────────────────────────

/// Everything a finished run produced.
#[derive(Clone, Debug, PartialEq)]
pub struct RunReport {
    pub worker_count:  usize,
    /// Population statistics before the first round.
    pub initial_stats: Statistics,
    /// Population statistics after every worker was joined.
    pub final_stats:   Statistics,
    /// All samples, ordered by `(round, worker)`.
    pub samples:       Vec<Sample>,
    /// Wall-clock time from pool start to the last join.
    pub elapsed:       Duration,
    /// Rounds executed, skipped self-pairs included.
    pub rounds:        u64,
    /// Rounds that drew the same agent twice.
    pub skipped:       u64,
    /// Cooperative moves made.
    pub cooperations:  u64,
    /// Phase expirations (GRV resamples).
    pub resamples:     u64,
}

impl RunReport {
    /// Rounds that actually ran the protocol.
    #[inline]
    pub fn interactions(&self) -> u64 {
        self.rounds - self.skipped
    }
}

/// One worker's counters, merged into the report after the join.
struct WorkerTally {
    rounds:       u64,
    skipped:      u64,
    cooperations: u64,
    resamples:    u64,
    samples:      Vec<Sample>,
}

impl WorkerTally {
    fn record(&mut self, outcome: Option<InteractionOutcome>) {
        self.rounds += 1;
        match outcome {
            None    => self.skipped += 1,
            Some(o) => {
                self.cooperations += o.cooperations() as u64;
                self.resamples += o.resamples as u64;
            }
        }
    }
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim<P>` owns the population and drives `config.worker_count` workers over
/// it.  Each worker spends its share of `config.total_interactions` rounds:
///
/// 1. **Select**: draw two agent indices uniformly from `[0, N)`.
/// 2. **Skip** when both draws are the same agent.  The round still counts.
/// 3. **Interact**: [`Protocol::interact`] on the shared store.
/// 4. **Sample**: when `round % sampling_interval == 0`, snapshot
///    [`Statistics`].
///
/// Under [`Regime::Exclusive`] steps 1–3 run under one global lock; under
/// [`Regime::Atomic`] workers run freely and rely on the store's atomic
/// updates.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<P: Protocol> {
    pub config:     SimConfig,

    /// The agent arena, shared by reference with every worker.
    pub population: AgentStore,

    pub protocol:   P,

    /// Draws one run seed per call to [`run`][Self::run].
    pub(crate) seeder: SimRng,

    /// Held for a whole round under [`Regime::Exclusive`].
    pub(crate) lock:   Mutex<()>,
}

impl<P: Protocol> Sim<P> {
    /// Spend the whole interaction budget and return the run report.
    ///
    /// Blocks until every worker has been joined.  Samples reach the observer
    /// only after that point.  If any worker panicked, the run is reported as
    /// [`SimError::WorkerAborted`] and no report is produced.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<RunReport> {
        let run_seed: u64 = self.seeder.random();
        let workers = self.config.worker_count;
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("pp-worker-{i}"))
            .build()?;

        let initial_stats = Statistics::collect(&self.population);
        observer.on_run_start(&self.config, &initial_stats);
        info!(
            agents = self.population.count,
            interactions = self.config.total_interactions,
            workers,
            regime = %self.config.regime,
            "run started"
        );

        let this = &*self;
        let started = Instant::now();
        let results = pool.broadcast(|ctx| {
            let worker = WorkerId(ctx.index() as u32);
            panic::catch_unwind(AssertUnwindSafe(|| this.run_worker(worker, run_seed)))
                .map_err(|payload| SimError::WorkerAborted {
                    worker,
                    reason: panic_message(payload.as_ref()),
                })
        });
        let elapsed = started.elapsed();

        let mut report = RunReport {
            worker_count: workers,
            initial_stats,
            final_stats: Statistics::collect(&self.population),
            samples: Vec::new(),
            elapsed,
            rounds: 0,
            skipped: 0,
            cooperations: 0,
            resamples: 0,
        };
        for result in results {
            let tally = result?;
            report.rounds += tally.rounds;
            report.skipped += tally.skipped;
            report.cooperations += tally.cooperations;
            report.resamples += tally.resamples;
            report.samples.extend(tally.samples);
        }
        report.samples.sort_by_key(|s| (s.round, s.worker));

        info!(
            elapsed_ms = elapsed.as_millis() as u64,
            rounds = report.rounds,
            skipped = report.skipped,
            resamples = report.resamples,
            "run finished: {}",
            report.final_stats
        );
        for sample in &report.samples {
            observer.on_sample(sample);
        }
        observer.on_run_end(&report);
        Ok(report)
    }

    /// One worker's loop.  Runs on its own pool thread.
    fn run_worker(&self, worker: WorkerId, run_seed: u64) -> WorkerTally {
        let budget = self.config.worker_budget(worker);
        let interval = self.config.sampling_interval;
        let mut rng = WorkerRng::new(run_seed, worker);
        let mut tally = WorkerTally {
            rounds:       0,
            skipped:      0,
            cooperations: 0,
            resamples:    0,
            samples:      Vec::new(),
        };
        debug!(worker = worker.0, budget, "worker started");

        for round in 0..budget {
            let outcome = match self.config.regime {
                Regime::Exclusive => {
                    let _guard = self.lock.lock();
                    self.round(&mut rng)
                }
                Regime::Atomic => self.round(&mut rng),
            };
            tally.record(outcome);

            if interval > 0 && round % interval == 0 {
                tally.samples.push(Sample {
                    worker,
                    round,
                    stats: Statistics::collect(&self.population),
                });
            }
        }

        debug!(
            worker = worker.0,
            rounds = tally.rounds,
            skipped = tally.skipped,
            "worker finished"
        );
        tally
    }

    /// Select a pair and interact.  `None` for a self-pair.
    fn round(&self, rng: &mut WorkerRng) -> Option<InteractionOutcome> {
        let n = self.population.count as u32;
        let a = AgentId(rng.gen_range(0..n));
        let b = AgentId(rng.gen_range(0..n));
        if a == b {
            return None;
        }
        Some(self.protocol.interact(a, b, &self.population, rng))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_owned()
    }
}

// ── Convenience entry point ───────────────────────────────────────────────────

/// Run the donation protocol over `population` with the knobs in `config`.
///
/// Shorthand for `SimBuilder::from_config(config).population(population)`
/// followed by one [`Sim::run`] without an observer.
pub fn run_simulation(config: SimConfig, population: AgentStore) -> SimResult<RunReport> {
    crate::SimBuilder::from_config(config)
        .population(population)
        .build()?
        .run(&mut crate::NoopObserver)
}
