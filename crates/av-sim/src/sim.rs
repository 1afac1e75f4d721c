//! The `Sim` struct and its tick loop.

use av_agent::{Agent, AgentArena, AgentId, SpawnRequest};
use av_control::{ControlContext, DriveTuning, ProbeField, RouteProgress};
use av_core::{AgentRng, NodeId, Pose, SimConfig, Tick, TickClock};
use av_graph::{RoadGraph, Route, RouteQuery, Router};
use av_sched::{AgentScheduler, TickReport, Visit};

use crate::dynamics::VehicleDynamics;
use crate::observer::SimObserver;
use crate::proximity::{AgentBodies, CompositeField};
use crate::traffic::TrafficCommand;
use crate::{SimError, SimResult};

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim<R, F, D>` owns all simulation state and drives the per-tick
/// pipeline: queued traffic-control writes, the agent-body proximity
/// snapshot, and the scheduler's budgeted rotation in which every visited
/// agent runs one controller step, one dynamics integration, and its
/// waypoint/replan bookkeeping.
///
/// The three collaborators are compile-time pluggable:
///
/// - `R`: the routing algorithm (e.g. [`av_graph::BranchBoundRouter`]).
/// - `F`: the static scene probes are cast against (e.g.
///   [`av_control::NullField`] for an empty map).
/// - `D`: the vehicle-dynamics consumer of control outputs (e.g.
///   [`KinematicDynamics`][crate::KinematicDynamics]).
///
/// Create via [`SimBuilder`][crate::SimBuilder].  There is deliberately no
/// hidden global instance: whoever drives the loop owns the `Sim` and hands
/// it a clock.
pub struct Sim<R: Router, F: ProbeField, D: VehicleDynamics> {
    /// Global configuration (seed, tick budget, integration step, …).
    pub config: SimConfig,

    /// Shared driving calibration.
    pub tuning: DriveTuning,

    /// The road graph.  Read-only during a tick; traffic writes are queued
    /// through [`push_traffic`][Self::push_traffic].
    pub graph: RoadGraph,

    pub router: R,
    pub statics: F,
    pub dynamics: D,

    /// The live population.
    pub agents: AgentArena,

    /// FIFO rotation with the per-tick compute budget.
    pub scheduler: AgentScheduler,

    /// Completed tick count.
    pub tick: Tick,

    /// Body radius used for agent-vs-agent probe hits.
    pub agent_radius: f32,

    pending_traffic: Vec<TrafficCommand>,
}

impl<R: Router, F: ProbeField, D: VehicleDynamics> Sim<R, F, D> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn assemble(
        config: SimConfig,
        tuning: DriveTuning,
        graph: RoadGraph,
        router: R,
        statics: F,
        dynamics: D,
        agent_radius: f32,
    ) -> Self {
        let scheduler = AgentScheduler::new(config.tick_budget);
        Self {
            config,
            tuning,
            graph,
            router,
            statics,
            dynamics,
            agents: AgentArena::new(),
            scheduler,
            tick: Tick::ZERO,
            agent_radius,
            pending_traffic: Vec::new(),
        }
    }

    // ── Spawn interface ───────────────────────────────────────────────────

    /// Create an agent at rest on its start node and enter it into the
    /// rotation.
    ///
    /// The initial route is computed immediately (toward the pinned target,
    /// or a randomly drawn one).  If routing finds nothing the agent still
    /// spawns — it holds in the stopped state and retries on its ticks.
    pub fn spawn(&mut self, request: SpawnRequest) -> SimResult<AgentId> {
        if !self.graph.contains(request.start) {
            return Err(SimError::UnknownNode(request.start));
        }
        if let Some(target) = request.target {
            if !self.graph.contains(target) {
                return Err(SimError::UnknownNode(target));
            }
        }

        let mut rng = AgentRng::new(self.config.seed, self.agents.total_spawned());
        let route = match choose_target(&mut rng, &self.graph, request.start, request.target) {
            None => Route::empty(),
            Some(target) => {
                let query = RouteQuery {
                    avoid: request.avoid,
                    max_nodes: self.config.route_node_cap,
                };
                match self.router.find_route(&self.graph, request.start, target, &query) {
                    Ok(route) if !route.is_empty() => route,
                    Ok(_) => {
                        log::warn!("spawn at {}: no route to {target}", request.start);
                        Route::empty()
                    }
                    Err(err) => {
                        log::warn!("spawn at {}: routing failed: {err}", request.start);
                        Route::empty()
                    }
                }
            }
        };

        let pose = Pose::new(
            self.graph.position(request.start),
            self.graph.heading(request.start),
        );
        let id = self.agents.insert(Agent::new(&request, pose, route, rng));
        self.scheduler.enqueue(id);
        log::debug!("spawned agent at {}", request.start);
        Ok(id)
    }

    /// Remove an agent immediately.
    ///
    /// The scheduler is *not* touched: its queue entry goes stale and is
    /// dropped (uncounted) the next time it reaches the head — removal is
    /// safe even mid-rotation.
    pub fn despawn(&mut self, id: AgentId) -> bool {
        let removed = self.agents.remove(id).is_some();
        if removed {
            log::debug!("despawned agent");
        }
        removed
    }

    #[inline]
    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id)
    }

    // ── Traffic-control interface ─────────────────────────────────────────

    /// Queue a traffic-control write.  Signal collaborators may call this at
    /// any time; the write lands at the top of the next tick, before any
    /// controller reads the graph.
    pub fn push_traffic(&mut self, command: TrafficCommand) {
        self.pending_traffic.push(command);
    }

    // ── Tick loop ─────────────────────────────────────────────────────────

    /// Run one simulation tick under the configured compute budget.
    pub fn tick<C, O>(&mut self, clock: &mut C, observer: &mut O) -> TickReport
    where
        C: TickClock,
        O: SimObserver,
    {
        let now = self.tick;
        observer.on_tick_start(now);

        // ── ① Traffic writes land before any read this tick ──────────────
        for command in self.pending_traffic.drain(..) {
            apply_traffic(&mut self.graph, command);
        }

        // ── ② Snapshot agent bodies for probe casts ──────────────────────
        //
        // The snapshot copies positions, so the rotation below can mutate
        // agents while every probe sees tick-start state — results do not
        // depend on visit order.
        let bodies = AgentBodies::snapshot(&self.agents, self.agent_radius);

        // ── ③ Budgeted rotation ──────────────────────────────────────────
        //
        // Explicit field borrows so the closure's captures are disjoint
        // from the scheduler.
        let Sim {
            scheduler,
            agents,
            graph,
            router,
            statics,
            dynamics,
            tuning,
            config,
            ..
        } = self;
        let step_secs = config.step_secs;
        let node_cap = config.route_node_cap;

        let report = scheduler.run_tick(clock, |id| {
            let Some(agent) = agents.get_mut(id) else {
                // Despawned while queued: drop the stale reference.
                return Visit::Gone;
            };
            update_agent(
                id, agent, graph, router, &*statics, &bodies, dynamics, tuning, step_secs,
                node_cap, observer,
            );
            Visit::Updated
        });

        observer.on_tick_end(now, &report);
        self.tick.advance();
        report
    }

    /// Run exactly `n` ticks.  Useful for tests and incremental stepping.
    pub fn run_ticks<C, O>(&mut self, n: u64, clock: &mut C, observer: &mut O)
    where
        C: TickClock,
        O: SimObserver,
    {
        for _ in 0..n {
            self.tick(clock, observer);
        }
    }
}

// ── Per-agent update ──────────────────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
fn update_agent<R: Router, D: VehicleDynamics, O: SimObserver>(
    id: AgentId,
    agent: &mut Agent,
    graph: &RoadGraph,
    router: &R,
    statics: &dyn ProbeField,
    bodies: &AgentBodies,
    dynamics: &D,
    tuning: &DriveTuning,
    step_secs: f32,
    node_cap: Option<usize>,
    observer: &mut O,
) {
    // A missing route means spawn-time routing failed or the last replan
    // came up empty; keep retrying from the agent's own decision stream.
    if agent.route.is_empty() {
        replan(id, agent, graph, router, node_cap, None, observer);
    }

    let field = CompositeField { statics, bodies, exclude: id };
    let ctx = ControlContext {
        pose: agent.pose,
        velocity: agent.velocity,
        speed: agent.speed,
        aggressive: agent.aggressive,
        cruise_speed: agent.cruise_speed,
        graph,
        tuning,
        field: &field,
    };
    let result = agent.controller.step(&ctx, &mut agent.route);

    agent.last_output = result.output;
    agent.braking = result.output.braking;
    dynamics.integrate(agent, &result.output, step_secs);

    match result.progress {
        RouteProgress::Reached(node) => agent.node = node,
        RouteProgress::Exhausted { last } => {
            let came_from = agent.node;
            agent.node = last;
            // Avoid the node we just came from so the fresh route doesn't
            // immediately double back.
            replan(id, agent, graph, router, node_cap, Some(came_from), observer);
        }
        RouteProgress::None => {}
    }

    observer.on_agent_update(id, result.state, &result.output);
}

/// Compute a fresh route for `agent` from its current node.
///
/// Leaves an empty route (stopped state) when no target is wanted or no
/// path exists; route failure is a diagnostic, never fatal.
fn replan<R: Router, O: SimObserver>(
    id: AgentId,
    agent: &mut Agent,
    graph: &RoadGraph,
    router: &R,
    node_cap: Option<usize>,
    avoid: Option<NodeId>,
    observer: &mut O,
) {
    let Some(target) = choose_target(&mut agent.rng, graph, agent.node, agent.target) else {
        // Pinned target already reached, or nowhere to go.
        agent.route = Route::empty();
        return;
    };

    let query = RouteQuery { avoid, max_nodes: node_cap };
    match router.find_route(graph, agent.node, target, &query) {
        Ok(route) if !route.is_empty() => agent.route = route,
        Ok(_) => {
            agent.route = Route::empty();
            log::warn!("no route from {} to {target}", agent.node);
            observer.on_route_failed(id, agent.node, target);
        }
        Err(err) => {
            agent.route = Route::empty();
            log::warn!("routing failed from {}: {err}", agent.node);
            observer.on_route_failed(id, agent.node, target);
        }
    }
}

/// Pick the agent's next destination: the pinned target while it is
/// somewhere else, or a random node drawn from the agent's stream.
fn choose_target(
    rng: &mut AgentRng,
    graph: &RoadGraph,
    current: NodeId,
    pinned: Option<NodeId>,
) -> Option<NodeId> {
    if let Some(target) = pinned {
        return (target != current).then_some(target);
    }
    let n = graph.node_count() as u32;
    if n < 2 {
        return None;
    }
    // A few redraws dodge the current node; on a pathological draw the
    // agent just idles one tick and tries again.
    for _ in 0..8 {
        let candidate = NodeId(rng.gen_range(0..n));
        if candidate != current {
            return Some(candidate);
        }
    }
    None
}

fn apply_traffic(graph: &mut RoadGraph, command: TrafficCommand) {
    match command {
        TrafficCommand::SetPassable { node, passable } => {
            if graph.contains(node) {
                graph.set_passable(node, passable);
            } else {
                log::warn!("traffic command for unknown node {node}");
            }
        }
        TrafficCommand::SetSpeedLimit { node, limit } => {
            if graph.contains(node) {
                graph.set_speed_limit(node, limit);
            } else {
                log::warn!("traffic command for unknown node {node}");
            }
        }
    }
}
