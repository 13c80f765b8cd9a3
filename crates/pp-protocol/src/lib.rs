//! `pp-protocol` — the pairwise interaction protocol.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                     |
//! |----------------|--------------------------------------------------------------|
//! | [`game`]       | `DonationGame` payoffs, `decide`, `adapt`                    |
//! | [`estimate`]   | `SizeEstimation` — GRV phase clock, merge, resample          |
//! | [`protocol`]   | `Protocol` trait, `DonationProtocol`, `InteractionOutcome`   |
//!
//! # One interaction
//!
//! ```text
//! interact(a, b):
//!   ① decide   — each agent cooperates or defects (Adaptive: weighted coin)
//!   ② payoff   — donation-game table, added to both scores
//!   ③ adapt    — Adaptive agents move generosity ±1 by the partner's class
//!   ④ estimate — a merges b's estimate, ticks, maybe resamples; then b vs a
//! ```
//!
//! There are no error states: every input is validated when the population
//! and the run are built.

pub mod estimate;
pub mod game;
pub mod protocol;


pub use estimate::{EstimateUpdate, SizeEstimation};
pub use game::{DonationGame, adapt, decide};
pub use protocol::{DonationProtocol, InteractionOutcome, Protocol};
