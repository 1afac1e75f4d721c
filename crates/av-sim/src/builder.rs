//! Fluent builder for constructing a [`Sim`].

use av_control::{DriveTuning, ProbeField};
use av_core::SimConfig;
use av_graph::{RoadGraph, Router};

use crate::dynamics::VehicleDynamics;
use crate::sim::Sim;
use crate::{SimError, SimResult};

/// Fluent builder for [`Sim<R, F, D>`].
///
/// # Required inputs
///
/// - [`SimConfig`] — seed, tick budget, integration step, route node cap
/// - [`RoadGraph`] — from [`av_graph::RoadGraphBuilder`] or the CSV loader
/// - `R: Router` — the routing algorithm
/// - `F: ProbeField` — the static scene (use [`av_control::NullField`] for
///   an empty map)
/// - `D: VehicleDynamics` — the movement collaborator
///
/// # Optional inputs (have defaults)
///
/// | Method             | Default                |
/// |--------------------|------------------------|
/// | `.tuning(t)`       | `DriveTuning::default` |
/// | `.agent_radius(r)` | `1.5`                  |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, graph, BranchBoundRouter, NullField,
///                               KinematicDynamics::default())
///     .agent_radius(2.0)
///     .build()?;
/// ```
pub struct SimBuilder<R: Router, F: ProbeField, D: VehicleDynamics> {
    config: SimConfig,
    graph: RoadGraph,
    router: R,
    statics: F,
    dynamics: D,
    tuning: DriveTuning,
    agent_radius: f32,
}

impl<R: Router, F: ProbeField, D: VehicleDynamics> SimBuilder<R, F, D> {
    /// Create a builder with all required inputs.
    pub fn new(config: SimConfig, graph: RoadGraph, router: R, statics: F, dynamics: D) -> Self {
        Self {
            config,
            graph,
            router,
            statics,
            dynamics,
            tuning: DriveTuning::default(),
            agent_radius: 1.5,
        }
    }

    /// Replace the shared driving calibration.
    pub fn tuning(mut self, tuning: DriveTuning) -> Self {
        self.tuning = tuning;
        self
    }

    /// Body radius used for agent-vs-agent probe hits.
    pub fn agent_radius(mut self, radius: f32) -> Self {
        self.agent_radius = radius;
        self
    }

    /// Validate the configuration and produce a ready [`Sim`].
    pub fn build(self) -> SimResult<Sim<R, F, D>> {
        if !(self.config.step_secs > 0.0) {
            return Err(SimError::Config(format!(
                "step_secs must be positive, got {}",
                self.config.step_secs
            )));
        }
        if !(self.agent_radius > 0.0) || !self.agent_radius.is_finite() {
            return Err(SimError::Config(format!(
                "agent_radius must be positive and finite, got {}",
                self.agent_radius
            )));
        }

        Ok(Sim::assemble(
            self.config,
            self.tuning,
            self.graph,
            self.router,
            self.statics,
            self.dynamics,
            self.agent_radius,
        ))
    }
}
