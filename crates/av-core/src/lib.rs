//! `av-core` — foundational types for the avsim road-agent framework.
//!
//! This crate is a dependency of every other `av-*` crate.  It intentionally
//! has no `av-*` dependencies and minimal external ones (only `glam`, `rand`
//! and `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                            |
//! |-------------|-----------------------------------------------------|
//! | [`ids`]     | `NodeId`, `EdgeId`                                  |
//! | [`pose`]    | `Pose`, local-frame steering math                   |
//! | [`time`]    | `Tick`, `TickClock`, `MonotonicClock`, `ManualClock`, `SimConfig` |
//! | [`rng`]     | `AgentRng` (per-agent), `SimRng` (global)           |
//! | [`error`]   | `AvError`, `AvResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod error;
pub mod ids;
pub mod pose;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{AvError, AvResult};
pub use ids::{EdgeId, NodeId};
pub use pose::Pose;
pub use rng::{AgentRng, SimRng};
pub use time::{ManualClock, MonotonicClock, SimConfig, Tick, TickClock};
