//! `pp-agent` — the population arena for the `rust_pp` simulator.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                        |
//! |-------------|-----------------------------------------------------------------|
//! | [`store`]   | `AgentStore` (atomic SoA arrays), `AgentState` (plain copy)     |
//! | [`builder`] | `PopulationBuilder`, `create_population`                        |
//! | [`stats`]   | `Statistics` snapshot, cooperation % and global size estimate   |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                 |
//! |---------|--------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on all public types. |

pub mod builder;
pub mod stats;
pub mod store;


pub use builder::{PopulationBuilder, create_population, initial_generosity};
pub use stats::{Statistics, size_from_exponent};
pub use store::{AgentState, AgentStore};
