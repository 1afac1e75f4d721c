//! CSV graph loader — the bulk-insertion half of the authoring interface.
//!
//! Road maps are authored offline; this loader imports them as two CSV
//! files (or any `Read` sources), one for nodes and one for directed edges.
//! The format is an authoring convenience, not a persistence contract.
//!
//! # CSV formats
//!
//! Nodes — one row per node, `NodeId` assigned by row order from 0:
//!
//! ```csv
//! x,y,z,heading,speed_limit
//! 0.0,0.0,0.0,0.0,30.0
//! 0.0,0.0,80.0,0.0,40.0
//! ```
//!
//! Edges — one row per directed edge, endpoints by node row index:
//!
//! ```csv
//! from,to
//! 0,1
//! 1,0
//! ```
//!
//! Duplicate edge rows are dropped (first wins); an edge referencing a row
//! index that does not exist fails the load with
//! [`GraphError::DanglingEdge`].

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use av_core::NodeId;
use glam::Vec3;

use crate::graph::{RoadGraph, RoadGraphBuilder};
use crate::{GraphError, GraphResult};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NodeRecord {
    x: f32,
    y: f32,
    z: f32,
    heading: f32,
    speed_limit: f32,
}

#[derive(Deserialize)]
struct EdgeRecord {
    from: u32,
    to: u32,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`RoadGraph`] from node and edge CSV files.
pub fn load_graph_csv(nodes: &Path, edges: &Path) -> GraphResult<RoadGraph> {
    let node_file = std::fs::File::open(nodes).map_err(GraphError::Io)?;
    let edge_file = std::fs::File::open(edges).map_err(GraphError::Io)?;
    load_graph_readers(node_file, edge_file)
}

/// Like [`load_graph_csv`] but accepts any `Read` sources.
///
/// Useful for testing (pass `std::io::Cursor`s) or loading embedded maps.
pub fn load_graph_readers<N: Read, E: Read>(nodes: N, edges: E) -> GraphResult<RoadGraph> {
    let mut builder = RoadGraphBuilder::new();

    let mut node_reader = csv::Reader::from_reader(nodes);
    for result in node_reader.deserialize::<NodeRecord>() {
        let row = result.map_err(|e| GraphError::Parse(e.to_string()))?;
        builder.add_node(Vec3::new(row.x, row.y, row.z), row.heading, row.speed_limit);
    }

    let mut edge_reader = csv::Reader::from_reader(edges);
    for result in edge_reader.deserialize::<EdgeRecord>() {
        let row = result.map_err(|e| GraphError::Parse(e.to_string()))?;
        builder.add_edge(NodeId(row.from), NodeId(row.to));
    }

    let report = builder.validate();
    if !report.dead_ends.is_empty() {
        log::warn!(
            "loaded road graph has {} dead-end node(s); agents reaching one will strand",
            report.dead_ends.len()
        );
    }

    builder.build()
}
