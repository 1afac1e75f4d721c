//! `av-sched` — cooperative round-robin scheduling under a compute budget.
//!
//! # Why this exists
//!
//! Updating every agent every frame costs O(N) regardless of how much frame
//! time is actually available.  The scheduler bounds the damage from both
//! directions: a wall-clock budget caps the worst-case stall, and a
//! one-rotation limit guarantees no agent is updated twice before every
//! other live agent was updated once.  Agents not reached in a tick simply
//! wait — a soft real-time degrade, not an error.
//!
//! The whole system runs on one driving loop: visits are synchronous, never
//! block, and the only suspension point is the tick boundary itself.

pub mod scheduler;

#[cfg(test)]
mod tests;

pub use scheduler::{AgentScheduler, TickReport, Visit};
