//! `av-control` — the per-agent driving state machine.
//!
//! # Crate layout
//!
//! | Module         | Contents                                              |
//! |----------------|-------------------------------------------------------|
//! | [`controller`] | `DriveController`, `DriveState`, `ControlContext`, `StepResult` |
//! | [`probe`]      | `ObstacleKind`, `ProbeHit`, `ProbeField`, `ProbeSlot`, ray construction |
//! | [`output`]     | `ControlOutput` (steering / throttle / brake)         |
//! | [`tuning`]     | `DriveTuning` — every threshold and gain in one place |
//!
//! # Evaluation order
//!
//! One controller step evaluates, in order: steering toward the route head,
//! the traffic-control check, the five proximity probes, the per-state
//! target-speed policy, bang-bang throttle/brake, and waypoint advance.
//! The step is a pure function of (prior state, inputs): identical inputs
//! always produce identical outputs, which keeps replays and tests exact.

pub mod controller;
pub mod output;
pub mod probe;
pub mod tuning;


pub use controller::{ControlContext, DriveController, DriveState, RouteProgress, StepResult};
pub use output::ControlOutput;
pub use probe::{
    cast_probes, probe_rays, NullField, ObstacleKind, ProbeField, ProbeHit, ProbeRay,
    ProbeReadings, ProbeSlot,
};
pub use tuning::DriveTuning;
