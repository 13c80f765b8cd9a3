//! Plain data row types written by output backends.

/// One statistics sample taken by one worker during one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleRow {
    /// Zero-based index of the run within this output directory.
    pub run:                       u32,
    pub worker_count:              u32,
    pub worker:                    u32,
    pub round:                     u64,
    pub cooperation_percentage:    f64,
    pub defection_percentage:      f64,
    pub estimated_population_size: u64,
}

/// Totals for one finished run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummaryRow {
    pub run:                       u32,
    pub worker_count:              u32,
    pub population_size:           u64,
    pub total_interactions:        u64,
    /// `"exclusive"` or `"atomic"`.
    pub regime:                    &'static str,
    pub elapsed_ms:                f64,
    pub skipped:                   u64,
    pub cooperations:              u64,
    pub resamples:                 u64,
    pub initial_cooperation:       f64,
    pub final_cooperation:         f64,
    pub estimated_population_size: u64,
}
