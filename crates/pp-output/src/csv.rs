//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `samples.csv`
//! - `run_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::{OutputResult, RunSummaryRow, SampleRow};
use crate::writer::OutputWriter;

pub const SAMPLE_HEADERS: [&str; 7] = [
    "run",
    "worker_count",
    "worker",
    "round",
    "cooperation_pct",
    "defection_pct",
    "est_population",
];

pub const SUMMARY_HEADERS: [&str; 12] = [
    "run",
    "worker_count",
    "population_size",
    "total_interactions",
    "regime",
    "elapsed_ms",
    "skipped",
    "cooperations",
    "resamples",
    "initial_cooperation_pct",
    "final_cooperation_pct",
    "est_population",
];

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    samples:   Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create the two CSV files in `dir` and write the header rows.
    ///
    /// `dir` is created if it does not exist.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut samples = Writer::from_path(dir.join("samples.csv"))?;
        samples.write_record(SAMPLE_HEADERS)?;

        let mut summaries = Writer::from_path(dir.join("run_summaries.csv"))?;
        summaries.write_record(SUMMARY_HEADERS)?;

        Ok(Self {
            samples,
            summaries,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_samples(&mut self, rows: &[SampleRow]) -> OutputResult<()> {
        for row in rows {
            self.samples.write_record(&[
                row.run.to_string(),
                row.worker_count.to_string(),
                row.worker.to_string(),
                row.round.to_string(),
                format!("{:.4}", row.cooperation_percentage),
                format!("{:.4}", row.defection_percentage),
                row.estimated_population_size.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_run_summary(&mut self, row: &RunSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.run.to_string(),
            row.worker_count.to_string(),
            row.population_size.to_string(),
            row.total_interactions.to_string(),
            row.regime.to_owned(),
            format!("{:.3}", row.elapsed_ms),
            row.skipped.to_string(),
            row.cooperations.to_string(),
            row.resamples.to_string(),
            format!("{:.4}", row.initial_cooperation),
            format!("{:.4}", row.final_cooperation),
            row.estimated_population_size.to_string(),
        ])?;
        Ok(())
    }

    fn flush(&mut self) -> OutputResult<()> {
        self.samples.flush()?;
        self.summaries.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.flush()
    }
}
