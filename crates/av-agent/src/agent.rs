//! The per-agent simulation record.

use glam::Vec3;

use av_control::{ControlOutput, DriveController};
use av_core::{AgentRng, NodeId, Pose};
use av_graph::Route;

/// Parameters for creating one agent.
#[derive(Debug, Clone, Copy)]
pub struct SpawnRequest {
    /// Road node the agent starts on.
    pub start: NodeId,
    /// Pinned destination.  `None` means the agent wanders: every replan
    /// draws a random target.
    pub target: Option<NodeId>,
    /// Node the initial route must not pass through.
    pub avoid: Option<NodeId>,
    /// Aggressive drivers ignore traffic control, cut corners, and swerve
    /// instead of queueing behind other agents.
    pub aggressive: bool,
    /// Vehicle-specific target cruise speed (caps the drive policy).
    pub cruise_speed: f32,
}

impl SpawnRequest {
    /// A wandering, law-abiding agent at `start` with a stock cruise speed.
    pub fn at(start: NodeId) -> Self {
        Self {
            start,
            target: None,
            avoid: None,
            aggressive: false,
            cruise_speed: 40.0,
        }
    }

    pub fn toward(mut self, target: NodeId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn avoiding(mut self, node: NodeId) -> Self {
        self.avoid = Some(node);
        self
    }

    pub fn aggressive(mut self) -> Self {
        self.aggressive = true;
        self
    }

    pub fn cruise(mut self, speed: f32) -> Self {
        self.cruise_speed = speed;
        self
    }
}

/// One simulated vehicle agent.
///
/// Mutated every scheduled tick by the driver loop; removable at any time
/// through the arena (the scheduler tolerates the stale id).
pub struct Agent {
    pub pose: Pose,
    pub velocity: Vec3,
    /// Signed forward speed; negative while reversing.
    pub speed: f32,

    /// Last node reached (the spawn node until the first waypoint pops).
    pub node: NodeId,
    /// Active route; replaced wholesale on exhaustion or failure.
    pub route: Route,
    pub controller: DriveController,

    pub aggressive: bool,
    pub cruise_speed: f32,
    /// Pinned destination for replans, if any.
    pub target: Option<NodeId>,

    /// Mirror of the last emitted brake flag, for cheap external reads.
    pub braking: bool,
    /// Last control intent emitted to the dynamics collaborator.
    pub last_output: ControlOutput,

    /// Private decision stream, seeded at spawn.
    pub rng: AgentRng,
}

impl Agent {
    /// Assemble an agent at rest on its spawn node.
    ///
    /// The caller supplies the node's pose and a freshly routed `route`
    /// (possibly empty — the controller starts in `Stopping` and holds until
    /// a route exists).
    pub fn new(request: &SpawnRequest, pose: Pose, route: Route, rng: AgentRng) -> Self {
        Self {
            pose,
            velocity: Vec3::ZERO,
            speed: 0.0,
            node: request.start,
            route,
            controller: DriveController::new(),
            aggressive: request.aggressive,
            cruise_speed: request.cruise_speed,
            target: request.target,
            braking: false,
            last_output: ControlOutput::default(),
            rng,
        }
    }
}
