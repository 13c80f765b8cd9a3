//! `pp-output` — simulation output writers for the rust_pp framework.
//!
//! | Backend | Files created                        |
//! |---------|--------------------------------------|
//! | CSV     | `samples.csv`, `run_summaries.csv`   |
//!
//! Backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `pp_sim::SimObserver`.  One
//! observer can span many runs (a thread-count sweep, say); every row carries
//! the run index and the worker count.
//!
//! # Usage
//!
//! ```rust,ignore
//! use pp_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer);
//! sim.run(&mut obs)?;
//! obs.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{RunSummaryRow, SampleRow};
pub use writer::OutputWriter;
