//! Simulation observer trait for progress reporting and diagnostics.

use av_agent::AgentId;
use av_control::{ControlOutput, DriveState};
use av_core::{NodeId, Tick};
use av_sched::TickReport;

/// Callbacks invoked by [`Sim::tick`][crate::Sim::tick] at key points in the
/// pipeline.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — deferred-work monitor
///
/// ```rust,ignore
/// struct PressureGauge { worst: usize }
///
/// impl SimObserver for PressureGauge {
///     fn on_tick_end(&mut self, _tick: Tick, report: &TickReport) {
///         self.worst = self.worst.max(report.deferred);
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before traffic commands apply.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick with the scheduler's report.
    fn on_tick_end(&mut self, _tick: Tick, _report: &TickReport) {}

    /// Called after each live agent's update with its state and the control
    /// intent emitted to the dynamics collaborator.
    fn on_agent_update(&mut self, _id: AgentId, _state: DriveState, _output: &ControlOutput) {}

    /// Diagnostic event: a replan found no route from `from` to `target`.
    /// The agent is already holding in the stopped state; nothing is broken.
    fn on_route_failed(&mut self, _id: AgentId, _from: NodeId, _target: NodeId) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `tick`
/// but don't want callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
