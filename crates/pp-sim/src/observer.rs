//! Simulation observer trait for progress reporting and data collection.

use pp_agent::Statistics;
use pp_core::{SimConfig, WorkerId};

use crate::RunReport;

/// One statistics snapshot taken by a worker.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sample {
    pub worker: WorkerId,
    /// Zero-based round index within the worker's own budget.
    pub round:  u64,
    pub stats:  Statistics,
}

/// Callbacks invoked by [`Sim::run`][crate::Sim::run].
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// Workers collect their samples locally; `on_sample` is called on the
/// caller's thread after every worker has been joined, in `(round, worker)`
/// order.  Observers therefore never need to be `Sync`.
///
/// # Example: console log
///
/// ```rust,ignore
/// struct ConsoleLog;
///
/// impl SimObserver for ConsoleLog {
///     fn on_sample(&mut self, sample: &Sample) {
///         println!("{}", sample.stats);
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called before the worker pool starts, with the population's initial
    /// statistics.
    fn on_run_start(&mut self, _config: &SimConfig, _initial: &Statistics) {}

    /// Called once per collected sample.
    fn on_sample(&mut self, _sample: &Sample) {}

    /// Called once after all workers finished successfully.
    fn on_run_end(&mut self, _report: &RunReport) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
