//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use pp_agent::Statistics;
use pp_core::SimConfig;
use pp_sim::{RunReport, Sample, SimObserver};

use crate::row::{RunSummaryRow, SampleRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// Settings of the run in progress, captured at `on_run_start`.
#[derive(Clone, Copy)]
struct RunContext {
    worker_count:       u32,
    population_size:    u64,
    total_interactions: u64,
    regime:             &'static str,
}

/// A [`SimObserver`] that writes samples and run summaries to any
/// [`OutputWriter`] backend.
///
/// One observer can be reused across several runs; each run gets the next
/// run index.  Errors from the writer are stored internally because
/// `SimObserver` methods have no return value.  After the last run, call
/// [`finish`][Self::finish] and check [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    run:        u32,
    current:    Option<RunContext>,
    pending:    Vec<SampleRow>,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            run:        0,
            current:    None,
            pending:    Vec::new(),
            last_error: None,
        }
    }

    /// Number of runs completed so far.
    pub fn runs(&self) -> u32 {
        self.run
    }

    /// Take the stored write error (if any).
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Close the writer.  Returns the first error seen during any run, or
    /// the error from closing.
    pub fn finish(&mut self) -> OutputResult<()> {
        let result = self.writer.finish();
        self.store_err(result);
        match self.take_error() {
            Some(e) => Err(e),
            None    => Ok(()),
        }
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_run_start(&mut self, config: &SimConfig, _initial: &Statistics) {
        self.current = Some(RunContext {
            worker_count:       config.worker_count as u32,
            population_size:    config.population_size as u64,
            total_interactions: config.total_interactions,
            regime:             config.regime.as_str(),
        });
        self.pending.clear();
    }

    fn on_sample(&mut self, sample: &Sample) {
        let worker_count = self.current.map_or(0, |c| c.worker_count);
        self.pending.push(SampleRow {
            run:                       self.run,
            worker_count,
            worker:                    sample.worker.0,
            round:                     sample.round,
            cooperation_percentage:    sample.stats.cooperation_percentage,
            defection_percentage:      sample.stats.defection_percentage(),
            estimated_population_size: sample.stats.estimated_population_size,
        });
    }

    fn on_run_end(&mut self, report: &RunReport) {
        if !self.pending.is_empty() {
            let result = self.writer.write_samples(&self.pending);
            self.store_err(result);
            self.pending.clear();
        }

        let ctx = self.current.take().unwrap_or(RunContext {
            worker_count:       report.worker_count as u32,
            population_size:    0,
            total_interactions: report.rounds,
            regime:             "",
        });
        let row = RunSummaryRow {
            run:                       self.run,
            worker_count:              ctx.worker_count,
            population_size:           ctx.population_size,
            total_interactions:        ctx.total_interactions,
            regime:                    ctx.regime,
            elapsed_ms:                report.elapsed.as_secs_f64() * 1e3,
            skipped:                   report.skipped,
            cooperations:              report.cooperations,
            resamples:                 report.resamples,
            initial_cooperation:       report.initial_stats.cooperation_percentage,
            final_cooperation:         report.final_stats.cooperation_percentage,
            estimated_population_size: report.final_stats.estimated_population_size,
        };
        let result = self.writer.write_run_summary(&row);
        self.store_err(result);

        let result = self.writer.flush();
        self.store_err(result);
        self.run += 1;
    }
}
