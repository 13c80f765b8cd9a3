//! `pp-sim` — worker-pool scheduler for the rust_pp framework.
//!
//! # Run loop
//!
//! ```text
//! run():
//!   build a rayon pool with exactly config.worker_count threads
//!   broadcast one worker per thread; worker w:
//!     for round in 0..budget(w):
//!       ① select  — two uniform indices a, b in [0, N)
//!       ② skip    — a == b (the round still counts)
//!       ③ interact — Protocol::interact(a, b, &store, rng_w)
//!       ④ sample  — every sampling_interval rounds (round 0 included)
//!   join all workers, merge tallies, deliver samples to the observer
//! ```
//!
//! # Concurrency regimes
//!
//! | Regime      | Effect                                                    |
//! |-------------|-----------------------------------------------------------|
//! | `Exclusive` | One global `parking_lot::Mutex` held around steps ①–③.    |
//! | `Atomic`    | No lock; every agent field is an atomic RMW.  (default)   |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use pp_core::SimConfig;
//! use pp_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::from_config(SimConfig::default()).build()?;
//! let report = sim.run(&mut NoopObserver)?;
//! println!("{}", report.final_stats);
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, Sample, SimObserver};
pub use sim::{RunReport, Sim, run_simulation};
