//! The driving state machine.

use glam::Vec3;

use av_core::{NodeId, Pose};
use av_graph::{RoadGraph, Route};

use crate::output::ControlOutput;
use crate::probe::{cast_probes, ObstacleKind, ProbeField, ProbeReadings, ProbeSlot};
use crate::tuning::DriveTuning;

// ── DriveState ────────────────────────────────────────────────────────────────

/// The agent's driving mode.  No terminal state: an agent cycles among these
/// for its whole lifetime.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DriveState {
    /// Cruising toward the next route node.
    Drive,
    /// Waiting on traffic control or another vehicle, braking ramp engaged.
    Queue,
    /// Swerving around a detected obstacle.
    AvoidCollision,
    /// No valid route — hold position until one arrives.
    Stopping,
    /// Wedged against something at low speed; reverse out.
    BackingFromStuck,
}

impl std::fmt::Display for DriveState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DriveState::Drive            => "drive",
            DriveState::Queue            => "queue",
            DriveState::AvoidCollision   => "avoid-collision",
            DriveState::Stopping         => "stopping",
            DriveState::BackingFromStuck => "backing-from-stuck",
        };
        f.write_str(s)
    }
}

// ── Step inputs and outputs ───────────────────────────────────────────────────

/// Read-only inputs for one controller step.
///
/// Everything the state machine consults lives here; the step mutates only
/// the controller's own state and the agent's route (head pops).  Graph
/// access is read-only for the whole tick — traffic-control writes land
/// between ticks.
pub struct ControlContext<'a> {
    pub pose: Pose,
    pub velocity: Vec3,
    /// Signed forward speed; negative while reversing.
    pub speed: f32,
    pub aggressive: bool,
    /// Vehicle-specific cap on the Drive/Avoid target speed.
    pub cruise_speed: f32,
    pub graph: &'a RoadGraph,
    pub tuning: &'a DriveTuning,
    pub field: &'a dyn ProbeField,
}

/// Route bookkeeping outcome of one step.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RouteProgress {
    /// Still driving toward the current head.
    None,
    /// A waypoint was reached and popped; more remain.
    Reached(NodeId),
    /// The final waypoint was reached — the route is exhausted and the
    /// driver needs a fresh one (avoid `last` to discourage backtracking).
    Exhausted { last: NodeId },
}

/// Everything one step produced.
#[derive(Copy, Clone, Debug)]
pub struct StepResult {
    pub output: ControlOutput,
    pub state: DriveState,
    /// The speed the bang-bang throttle/brake pair was regulating toward.
    pub target_speed: f32,
    pub progress: RouteProgress,
}

// ── DriveController ───────────────────────────────────────────────────────────

/// Per-agent driving state machine.
///
/// Holds only the current [`DriveState`]; calibration is shared via
/// [`DriveTuning`] and everything else arrives through [`ControlContext`].
/// `step` is a pure function of (state, context, route): identical inputs
/// produce identical outputs and successor state.
#[derive(Debug, Clone)]
pub struct DriveController {
    pub state: DriveState,
}

impl DriveController {
    /// New controllers start in `Stopping` — harmless until a route arrives.
    pub fn new() -> Self {
        Self { state: DriveState::Stopping }
    }

    /// Evaluate one tick: sensors → state transition → control output →
    /// waypoint advance.
    pub fn step(&mut self, ctx: &ControlContext<'_>, route: &mut Route) -> StepResult {
        let t = ctx.tuning;

        // An empty route forces Stopping; the driver replans outside.
        let Some(head) = route.head() else {
            self.state = DriveState::Stopping;
            return StepResult {
                output: ControlOutput::HOLD,
                state: self.state,
                target_speed: 0.0,
                progress: RouteProgress::None,
            };
        };

        let head_pos = ctx.graph.position(head);
        let limit = ctx.graph.speed_limit(head);
        let arrival_tol = if ctx.aggressive {
            t.aggressive_arrival_tolerance
        } else {
            t.arrival_tolerance
        };

        // ── 1. Steering toward the head node ─────────────────────────────
        let mut steer = ctx.pose.steer_fraction_to(head_pos);

        // Aggressive drivers stop aiming once their one-second extrapolation
        // already falls inside the arrival radius — the simulated
        // imprecision that makes them cut corners.
        if ctx.aggressive {
            let projected = ctx.pose.position + ctx.velocity * t.cut_lookahead_secs;
            if projected.distance(head_pos) < arrival_tol {
                steer = 0.0;
            }
        }

        // ── 2. Traffic control ───────────────────────────────────────────
        self.state = if !ctx.graph.is_passable(head) && !ctx.aggressive {
            DriveState::Queue
        } else {
            DriveState::Drive
        };

        // ── 3. Proximity probes ──────────────────────────────────────────
        let readings = cast_probes(ctx.field, &ctx.pose, ctx.speed, steer, t);
        for (_slot, hit) in readings.iter() {
            match hit.kind {
                ObstacleKind::Static => {
                    self.state = if ctx.speed < t.low_speed_threshold {
                        DriveState::BackingFromStuck
                    } else {
                        DriveState::AvoidCollision
                    };
                }
                ObstacleKind::DynamicAgent => {
                    self.state = if ctx.aggressive {
                        DriveState::AvoidCollision
                    } else {
                        DriveState::Queue
                    };
                }
                ObstacleKind::Ignorable => {}
            }
        }

        // ── 4. Per-state target speed ────────────────────────────────────
        let dist_to_head = ctx.pose.distance_to(head_pos);
        let aggressive_factor = if ctx.aggressive { t.aggressive_speed_factor } else { 1.0 };

        let target_speed = match self.state {
            DriveState::Drive => (limit * (1.0 - steer.abs()) * aggressive_factor)
                .max(t.min_drive_speed)
                .min(ctx.cruise_speed),

            // Braking ramp proportional to the remaining gap.
            DriveState::Queue => {
                if dist_to_head < t.stop_threshold {
                    0.0
                } else {
                    limit.min(dist_to_head)
                }
            }

            DriveState::AvoidCollision => {
                steer = avoidance_steer(&readings, &ctx.pose, t);
                (limit * (1.0 - steer.abs()) * aggressive_factor)
                    .max(t.min_drive_speed)
                    .min(t.avoid_speed_cap)
                    .min(ctx.cruise_speed)
            }

            DriveState::Stopping => {
                steer = 0.0;
                0.0
            }

            DriveState::BackingFromStuck => t.reverse_speed,
        };

        // ── 5. Bang-bang throttle / brake ────────────────────────────────
        let braking = ctx.speed > target_speed + t.brake_hysteresis
            || target_speed < t.min_moving_target;
        let mut throttle = if ctx.speed < target_speed { 1.0 } else { 0.0 };

        // Reverse gear: the regulated magnitude stays, the signs flip.
        if self.state == DriveState::BackingFromStuck {
            throttle = -throttle;
            steer = -steer;
        }

        let output = ControlOutput { steering: steer, throttle, braking }.clamped();

        // ── 6. Waypoint advance ──────────────────────────────────────────
        let progress = if dist_to_head < arrival_tol {
            match route.advance() {
                Some(reached) if route.is_empty() => RouteProgress::Exhausted { last: reached },
                Some(reached) => RouteProgress::Reached(reached),
                None => RouteProgress::None,
            }
        } else {
            RouteProgress::None
        };

        StepResult {
            output,
            state: self.state,
            target_speed,
            progress,
        }
    }
}

impl Default for DriveController {
    fn default() -> Self {
        Self::new()
    }
}

// ── Avoidance vector ──────────────────────────────────────────────────────────

/// Weighted corrective steering while in `AvoidCollision`.
///
/// Each triggered side or angled probe contributes a signed weight (large
/// for the direct side probes, small for the angled ones; the sign steers
/// away from the obstacle's side).  When only the center probe fired, the
/// sign comes from the surface normal's lateral component.  The total is
/// divided by half the closest hit distance, so nearer obstacles steer
/// harder, then clamped into the steering range.
fn avoidance_steer(readings: &ProbeReadings, pose: &Pose, t: &DriveTuning) -> f32 {
    let mut total_weight = 0.0_f32;
    let mut closest = f32::INFINITY;
    let mut side_triggered = false;

    for (slot, hit) in readings.iter() {
        if hit.kind == ObstacleKind::Ignorable {
            continue;
        }
        closest = closest.min(hit.distance);
        let weight = match slot {
            // Obstacle on the right: steer left (negative), and vice versa.
            ProbeSlot::SideRight   => -t.side_probe_weight,
            ProbeSlot::SideLeft    => t.side_probe_weight,
            ProbeSlot::AngledRight => -t.angled_probe_weight,
            ProbeSlot::AngledLeft  => t.angled_probe_weight,
            ProbeSlot::Center      => 0.0,
        };
        if slot != ProbeSlot::Center {
            side_triggered = true;
            total_weight += weight;
        }
    }

    if !side_triggered {
        if let Some(hit) = readings.get(ProbeSlot::Center) {
            if hit.kind != ObstacleKind::Ignorable {
                // Steer along the side the surface faces.
                let lateral = pose.right().dot(hit.normal);
                total_weight = t.side_probe_weight * lateral.signum();
            }
        }
    }

    if total_weight == 0.0 || !closest.is_finite() {
        return 0.0;
    }

    // Half-distance divisor sharpens the response as the gap closes.
    let divisor = (closest * 0.5).max(f32::EPSILON);
    (total_weight / divisor).clamp(-1.0, 1.0)
}
