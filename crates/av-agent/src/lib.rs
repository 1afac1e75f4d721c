//! `av-agent` — agent state and storage.
//!
//! # Crate layout
//!
//! | Module    | Contents                                      |
//! |-----------|-----------------------------------------------|
//! | [`agent`] | `Agent`, `SpawnRequest`                       |
//! | [`arena`] | `AgentId` (generational key), `AgentArena`    |
//!
//! # Why generational keys
//!
//! Agents despawn mid-simulation while still referenced from the scheduler
//! queue.  A generational slotmap key turns that stale reference into a
//! failed lookup instead of silently aliasing whatever agent reused the
//! slot — the scheduler drops such ids without counting them.

pub mod agent;
pub mod arena;

#[cfg(test)]
mod tests;

pub use agent::{Agent, SpawnRequest};
pub use arena::{AgentArena, AgentId};
