//! `av-graph` — road graph, spatial indexing, and routing.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                  |
//! |------------|-----------------------------------------------------------|
//! | [`graph`]  | `RoadGraph` (CSR + R-tree), `RoadGraphBuilder`, `GraphReport` |
//! | [`route`]  | `Route` — ordered node sequence plus cumulative length    |
//! | [`router`] | `Router` trait, `RouteQuery`, `BranchBoundRouter`         |
//! | [`loader`] | `load_graph_csv` / `load_graph_readers` authoring import  |
//! | [`error`]  | `GraphError`, `GraphResult<T>`                            |
//!
//! # Mutability contract
//!
//! Topology (nodes and edges) is fixed once `build()` runs.  The only fields
//! mutable during simulation are per-node passability and speed limit, written
//! by traffic-control collaborators between ticks.

pub mod error;
pub mod graph;
pub mod loader;
pub mod route;
pub mod router;


pub use error::{GraphError, GraphResult};
pub use graph::{GraphReport, RoadGraph, RoadGraphBuilder};
pub use loader::{load_graph_csv, load_graph_readers};
pub use route::Route;
pub use router::{BranchBoundRouter, RouteQuery, Router};
