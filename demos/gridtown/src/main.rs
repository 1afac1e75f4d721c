//! gridtown — headless avsim demo.
//!
//! Drives a mixed population of vehicle agents around a synthetic 8×6 grid
//! town under two-phase signal control.  One in ten drivers is aggressive:
//! they run signals, cut corners, and swerve around slower traffic instead
//! of queueing behind it.

mod town;

use std::time::{Duration, Instant};

use anyhow::Result;

use av_agent::{AgentId, SpawnRequest};
use av_control::{ControlOutput, DriveState, NullField};
use av_core::{MonotonicClock, NodeId, SimConfig, SimRng, Tick};
use av_graph::BranchBoundRouter;
use av_sched::TickReport;
use av_sim::{KinematicDynamics, SimBuilder, SimObserver, TrafficCommand};

use town::build_town;

// ── Constants ─────────────────────────────────────────────────────────────────

const GRID_W:           u32   = 8;
const GRID_H:           u32   = 6;
const BLOCK:            f32   = 60.0; // intersection spacing, world units
const AGENT_COUNT:      usize = 40;
const AGGRESSIVE_SHARE: f64   = 0.1;
const SEED:             u64   = 7;
const SIM_TICKS:        u64   = 2_000;
const STEP_SECS:        f32   = 0.1;  // 1 tick = 100 ms simulated
const TICK_BUDGET:      Duration = Duration::from_millis(2);
const ROUTE_NODE_CAP:   usize = 24;
const SIGNAL_PERIOD:    u64   = 80;   // ticks per signal phase

// ── Stats observer ────────────────────────────────────────────────────────────

const STATE_NAMES: [&str; 5] = ["drive", "queue", "avoid-collision", "stopping", "backing"];

fn state_ix(state: DriveState) -> usize {
    match state {
        DriveState::Drive            => 0,
        DriveState::Queue            => 1,
        DriveState::AvoidCollision   => 2,
        DriveState::Stopping         => 3,
        DriveState::BackingFromStuck => 4,
    }
}

/// Accumulates per-state update counts and scheduler pressure over the run.
#[derive(Default)]
struct TownStats {
    state_updates:  [u64; 5],
    route_failures: u64,
    processed:      u64,
    worst_deferred: usize,
    deferred_ticks: u64,
}

impl SimObserver for TownStats {
    fn on_tick_end(&mut self, _tick: Tick, report: &TickReport) {
        self.processed += report.processed as u64;
        self.worst_deferred = self.worst_deferred.max(report.deferred);
        if report.deferred > 0 {
            self.deferred_ticks += 1;
        }
    }

    fn on_agent_update(&mut self, _id: AgentId, state: DriveState, _output: &ControlOutput) {
        self.state_updates[state_ix(state)] += 1;
    }

    fn on_route_failed(&mut self, _id: AgentId, from: NodeId, target: NodeId) {
        self.route_failures += 1;
        log::debug!("route failure {from} -> {target}");
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();

    println!("=== gridtown — avsim demo ===");
    println!("Agents: {AGENT_COUNT}  |  Ticks: {SIM_TICKS}  |  Seed: {SEED}");
    println!();

    // 1. Build the town.
    let (graph, signals) = build_town(GRID_W, GRID_H, BLOCK);
    println!(
        "Road graph: {} nodes, {} edges, {} signalled intersections",
        graph.node_count(),
        graph.edge_count(),
        signals.len()
    );

    // 2. Sim config and assembly.
    let config = SimConfig {
        seed:           SEED,
        tick_budget:    TICK_BUDGET,
        step_secs:      STEP_SECS,
        route_node_cap: Some(ROUTE_NODE_CAP),
    };
    let node_count = graph.node_count() as u32;
    let mut sim = SimBuilder::new(
        config,
        graph,
        BranchBoundRouter,
        NullField, // no static scenery on this map
        KinematicDynamics::default(),
    )
    .build()?;

    // 3. Spawn the population at random intersections.  Wandering agents:
    //    no pinned target, so every exhausted route draws a fresh one.
    let mut rng = SimRng::new(SEED);
    let mut aggressive_count = 0usize;
    for _ in 0..AGENT_COUNT {
        let start = NodeId(rng.gen_range(0..node_count));
        let mut request = SpawnRequest::at(start).cruise(rng.gen_range(35.0..55.0));
        if rng.gen_bool(AGGRESSIVE_SHARE) {
            request = request.aggressive();
            aggressive_count += 1;
        }
        sim.spawn(request)?;
    }
    println!("Spawned {AGENT_COUNT} agents ({aggressive_count} aggressive)");
    println!();

    // 4. Run, re-phasing the signals on their period.
    let mut clock = MonotonicClock::new();
    let mut stats = TownStats::default();
    let t0 = Instant::now();

    for t in 0..SIM_TICKS {
        if t % SIGNAL_PERIOD == 0 {
            let green_even = (t / SIGNAL_PERIOD) % 2 == 0;
            for signal in &signals {
                sim.push_traffic(TrafficCommand::SetPassable {
                    node:     signal.node,
                    passable: signal.even == green_even,
                });
            }
        }
        sim.tick(&mut clock, &mut stats);

        if (t + 1) % 500 == 0 {
            log::info!("tick {}/{SIM_TICKS}", t + 1);
        }
    }
    let elapsed = t0.elapsed();

    // 5. Summary.
    println!(
        "Simulation complete in {:.3} s ({:.0} ticks/s, {} agent updates)",
        elapsed.as_secs_f64(),
        SIM_TICKS as f64 / elapsed.as_secs_f64(),
        stats.processed,
    );
    println!(
        "Scheduler pressure: worst deferred = {}, ticks with deferrals = {}",
        stats.worst_deferred, stats.deferred_ticks,
    );
    println!("Route failures: {}", stats.route_failures);
    println!();

    println!("{:<18} {:>12} {:>10}", "State", "Updates", "Now");
    println!("{}", "-".repeat(42));
    let mut now_counts = [0usize; 5];
    for (_, agent) in sim.agents.iter() {
        now_counts[state_ix(agent.controller.state)] += 1;
    }
    for (i, name) in STATE_NAMES.iter().enumerate() {
        println!("{:<18} {:>12} {:>10}", name, stats.state_updates[i], now_counts[i]);
    }

    Ok(())
}
