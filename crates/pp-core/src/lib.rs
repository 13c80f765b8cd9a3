//! `pp-core` — foundational types for the `rust_pp` population-protocol
//! simulator.
//!
//! This crate is a dependency of every other `pp-*` crate.  It has no `pp-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `WorkerId`                                      |
//! | [`strategy`]    | `Strategy` (`AlwaysCooperate` / `AlwaysDefect` / `Adaptive`) |
//! | [`config`]      | `SimConfig`, `Proportions`, `GameParams`, `Regime`, `ResampleRule` |
//! | [`rng`]         | `WorkerRng` (per-worker), `SimRng` (setup)                 |
//! | [`error`]       | `PpError`, `PpResult`                                      |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod ids;
pub mod rng;
pub mod strategy;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{DEFAULT_TAU, GameParams, Proportions, Regime, ResampleRule, SimConfig};
pub use error::{PpError, PpResult};
pub use ids::{AgentId, WorkerId};
pub use rng::{SimRng, WorkerRng};
pub use strategy::Strategy;
