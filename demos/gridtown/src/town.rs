//! Synthetic grid-town road network.
//!
//! A `w × h` lattice of intersections, `block` units apart, with two-way
//! streets along both axes.  The middle row is a faster avenue; every
//! interior intersection carries a signal, split into two phases by
//! checkerboard parity so no two adjacent signals are green together.

use glam::Vec3;

use av_core::NodeId;
use av_graph::{RoadGraph, RoadGraphBuilder};

use std::f32::consts::FRAC_PI_2;

/// One signal-controlled intersection and its phase parity.
#[derive(Copy, Clone)]
pub struct Signal {
    pub node: NodeId,
    /// `true` for the (x + z)-even phase group.
    pub even: bool,
}

/// Build the grid town.  Returns the graph and its signal set.
pub fn build_town(w: u32, h: u32, block: f32) -> (RoadGraph, Vec<Signal>) {
    let avenue_row = h / 2;
    let mut b = RoadGraphBuilder::with_capacity((w * h) as usize, (4 * w * h) as usize);
    let mut signals = Vec::new();

    for z in 0..h {
        for x in 0..w {
            let pos = Vec3::new(x as f32 * block, 0.0, z as f32 * block);
            // The avenue runs along +X, the side streets along +Z.
            let (heading, limit) = if z == avenue_row {
                (FRAC_PI_2, 50.0)
            } else {
                (0.0, 30.0)
            };
            let id = b.add_node(pos, heading, limit);

            let interior = x > 0 && x < w - 1 && z > 0 && z < h - 1;
            if interior {
                signals.push(Signal { node: id, even: (x + z) % 2 == 0 });
            }
        }
    }

    let at = |x: u32, z: u32| NodeId(z * w + x);
    for z in 0..h {
        for x in 0..w {
            if x + 1 < w {
                b.add_lane_pair(at(x, z), at(x + 1, z));
            }
            if z + 1 < h {
                b.add_lane_pair(at(x, z), at(x, z + 1));
            }
        }
    }

    let report = b.validate();
    if !report.is_clean() {
        log::warn!(
            "town authoring problems: {} dangling edge(s), {} dead end(s)",
            report.dangling_edges.len(),
            report.dead_ends.len()
        );
    }

    let graph = b.build().expect("lattice edges all reference added nodes");
    (graph, signals)
}
