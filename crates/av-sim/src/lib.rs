//! `av-sim` — the simulation driver.
//!
//! # Tick pipeline
//!
//! ```text
//! for each tick:
//!   ① Traffic   — drain queued TrafficCommands into the graph (writes land
//!                 strictly before any controller reads them this tick).
//!   ② Snapshot  — rebuild the agent proximity index from current positions.
//!   ③ Rotation  — AgentScheduler drains its FIFO under the compute budget;
//!                 each live agent gets: controller step → dynamics
//!                 integration → waypoint/replan bookkeeping.
//!   ④ Report    — observer.on_tick_end(tick, &report).
//! ```
//!
//! # Crate layout
//!
//! | Module        | Contents                                              |
//! |---------------|-------------------------------------------------------|
//! | [`sim`]       | `Sim` — owns graph, agents, scheduler, collaborators  |
//! | [`builder`]   | `SimBuilder`                                          |
//! | [`traffic`]   | `TrafficCommand`                                      |
//! | [`proximity`] | `AgentBodies` (R-tree snapshot), `CompositeField`     |
//! | [`dynamics`]  | `VehicleDynamics` trait, `KinematicDynamics`          |
//! | [`observer`]  | `SimObserver`, `NoopObserver`                         |
//! | [`error`]     | `SimError`, `SimResult<T>`                            |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! let mut sim = SimBuilder::new(config, graph, BranchBoundRouter, NullField,
//!                               KinematicDynamics::default())
//!     .build()?;
//! let id = sim.spawn(SpawnRequest::at(start))?;
//! let mut clock = MonotonicClock::new();
//! for _ in 0..1_000 {
//!     sim.tick(&mut clock, &mut NoopObserver);
//! }
//! ```

pub mod builder;
pub mod dynamics;
pub mod error;
pub mod observer;
pub mod proximity;
pub mod sim;
pub mod traffic;


pub use builder::SimBuilder;
pub use dynamics::{KinematicDynamics, VehicleDynamics};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::Sim;
pub use traffic::TrafficCommand;
