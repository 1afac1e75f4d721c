//! Road graph representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the index range:
//!
//! ```text
//! node_out_start[n] .. node_out_start[n+1]
//! ```
//!
//! All edge arrays (`edge_from`, `edge_to`, `edge_length`) are sorted by
//! source node and indexed by `EdgeId`, so iterating one node's outgoing
//! edges is a contiguous memory scan — ideal for the router's inner loop.
//! Within one source node, edges keep their authoring order (stable sort),
//! and duplicate `(from, to)` pairs are dropped at insertion: an outgoing-
//! edge set never contains the same target twice.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps ground-plane `(x, z)` to the nearest
//! `NodeId`.  Used by spawn logic to snap world positions to road nodes.

use glam::Vec3;
use rstar::{PointDistance, RTree, RTreeObject, AABB};
use rustc_hash::FxHashSet;

use av_core::{EdgeId, NodeId};

use crate::{GraphError, GraphResult};

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: a ground-plane `[x, z]` point
/// with the associated `NodeId`.
#[derive(Clone)]
struct NodeEntry {
    point: [f32; 2], // [x, z]
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.point[0] - point[0];
        let dz = self.point[1] - point[1];
        dx * dx + dz * dz
    }
}

// ── RoadGraph ─────────────────────────────────────────────────────────────────

/// Directed road graph in CSR format plus a spatial index for node snapping.
///
/// Node attribute arrays are `pub` for direct indexed access on hot paths.
/// Do not construct directly; use [`RoadGraphBuilder`].
pub struct RoadGraph {
    // ── Node data (indexed by NodeId) ─────────────────────────────────────
    /// World position of each node.
    pub node_pos: Vec<Vec3>,

    /// Yaw heading of the road through each node, radians.
    pub node_heading: Vec<f32>,

    /// Local speed limit at each node.
    pub node_speed_limit: Vec<f32>,

    /// Whether traffic control currently grants right of way through each
    /// node.  `true` also covers "no control present".
    pub node_passable: Vec<bool>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Outgoing edges of node `n` are at EdgeIds
    /// `node_out_start[n] .. node_out_start[n+1]`.
    /// Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId = position in sorted order) ──────────
    /// Source node of each edge.
    pub edge_from: Vec<NodeId>,

    /// Destination node of each edge.
    pub edge_to: Vec<NodeId>,

    /// Straight-line length of each edge, from the endpoint positions.
    pub edge_length: Vec<f32>,

    // ── Spatial index ─────────────────────────────────────────────────────
    spatial_idx: RTree<NodeEntry>,
}

impl RoadGraph {
    /// Construct an empty graph with no nodes or edges.
    ///
    /// Any routing request against it returns an empty route.
    pub fn empty() -> Self {
        RoadGraphBuilder::new().build().expect("empty graph cannot have dangling edges")
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    /// `true` if `node` names an existing node.
    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_pos.len()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    ///
    /// This is a contiguous index range — no heap allocation.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    /// Iterator over the target nodes of `node`'s outgoing edges, in
    /// authoring order, duplicate-free by construction.
    #[inline]
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.out_edges(node).map(|e| self.edge_to[e.index()])
    }

    /// Out-degree of `node` (number of outgoing edges).
    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    // ── Node attributes ───────────────────────────────────────────────────

    #[inline]
    pub fn position(&self, node: NodeId) -> Vec3 {
        self.node_pos[node.index()]
    }

    #[inline]
    pub fn heading(&self, node: NodeId) -> f32 {
        self.node_heading[node.index()]
    }

    #[inline]
    pub fn speed_limit(&self, node: NodeId) -> f32 {
        self.node_speed_limit[node.index()]
    }

    #[inline]
    pub fn is_passable(&self, node: NodeId) -> bool {
        self.node_passable[node.index()]
    }

    /// Straight-line distance between two nodes.
    #[inline]
    pub fn distance(&self, a: NodeId, b: NodeId) -> f32 {
        self.node_pos[a.index()].distance(self.node_pos[b.index()])
    }

    // ── Traffic-control writes (between ticks only) ───────────────────────

    /// Grant or revoke right of way through `node`.
    #[inline]
    pub fn set_passable(&mut self, node: NodeId, passable: bool) {
        self.node_passable[node.index()] = passable;
    }

    /// Adjust the local speed limit at `node`.
    #[inline]
    pub fn set_speed_limit(&mut self, node: NodeId, limit: f32) {
        self.node_speed_limit[node.index()] = limit;
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Return the `NodeId` of the nearest road node to `pos` on the ground
    /// plane.  Returns `None` only if the graph has no nodes.
    pub fn snap_to_node(&self, pos: Vec3) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.x, pos.z])
            .map(|e| e.id)
    }
}

// ── GraphReport ───────────────────────────────────────────────────────────────

/// Result of [`RoadGraphBuilder::validate`]: authoring problems found in the
/// pending node/edge set.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GraphReport {
    /// Edges whose endpoint does not name an added node.
    pub dangling_edges: Vec<(NodeId, NodeId)>,
    /// Nodes with zero outgoing edges — agents reaching one strand there.
    pub dead_ends: Vec<NodeId>,
}

impl GraphReport {
    pub fn is_clean(&self) -> bool {
        self.dangling_edges.is_empty() && self.dead_ends.is_empty()
    }
}

// ── RoadGraphBuilder ──────────────────────────────────────────────────────────

/// Construct a [`RoadGraph`] incrementally, then call [`build`](Self::build).
///
/// The builder accepts nodes and directed edges in any order.  `build()`
/// sorts edges by source node (stable — authoring order survives within one
/// source), constructs the CSR arrays, and bulk-loads the R-tree.
///
/// # Example
///
/// ```
/// use av_graph::RoadGraphBuilder;
/// use glam::Vec3;
///
/// let mut b = RoadGraphBuilder::new();
/// let a = b.add_node(Vec3::ZERO, 0.0, 30.0);
/// let c = b.add_node(Vec3::new(0.0, 0.0, 50.0), 0.0, 30.0);
/// b.add_lane_pair(a, c);
/// let graph = b.build().unwrap();
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 2); // one per direction
/// ```
pub struct RoadGraphBuilder {
    positions: Vec<Vec3>,
    headings:  Vec<f32>,
    limits:    Vec<f32>,
    raw_edges: Vec<(NodeId, NodeId)>,
    seen:      FxHashSet<(u32, u32)>,
}

impl RoadGraphBuilder {
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            headings:  Vec::new(),
            limits:    Vec::new(),
            raw_edges: Vec::new(),
            seen:      FxHashSet::default(),
        }
    }

    /// Pre-allocate for the expected number of nodes and edges to reduce
    /// reallocations when bulk-loading an authored map.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            positions: Vec::with_capacity(nodes),
            headings:  Vec::with_capacity(nodes),
            limits:    Vec::with_capacity(nodes),
            raw_edges: Vec::with_capacity(edges),
            seen:      FxHashSet::default(),
        }
    }

    /// Add a road node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, pos: Vec3, heading: f32, speed_limit: f32) -> NodeId {
        let id = NodeId(self.positions.len() as u32);
        self.positions.push(pos);
        self.headings.push(heading);
        self.limits.push(speed_limit);
        id
    }

    /// Add a **directed** edge from `from` to `to`.
    ///
    /// A repeated `(from, to)` pair is dropped silently — the first
    /// occurrence wins, keeping every outgoing-edge set duplicate-free.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) {
        if self.seen.insert((from.0, to.0)) {
            self.raw_edges.push((from, to));
        }
    }

    /// Convenience: add edges in **both directions** for a two-way road
    /// segment.
    pub fn add_lane_pair(&mut self, a: NodeId, b: NodeId) {
        self.add_edge(a, b);
        self.add_edge(b, a);
    }

    /// Look up the position of a node added earlier.
    pub fn node_pos(&self, id: NodeId) -> Vec3 {
        self.positions[id.index()]
    }

    pub fn node_count(&self) -> usize { self.positions.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Report authoring problems in the pending node/edge set: edges whose
    /// endpoint was never added, and nodes with zero outgoing edges.
    pub fn validate(&self) -> GraphReport {
        let n = self.positions.len();

        let dangling_edges: Vec<(NodeId, NodeId)> = self
            .raw_edges
            .iter()
            .filter(|(from, to)| from.index() >= n || to.index() >= n)
            .copied()
            .collect();

        let mut has_out = vec![false; n];
        for (from, _) in &self.raw_edges {
            if from.index() < n {
                has_out[from.index()] = true;
            }
        }
        let dead_ends: Vec<NodeId> = (0..n as u32)
            .map(NodeId)
            .filter(|id| !has_out[id.index()])
            .collect();

        GraphReport { dangling_edges, dead_ends }
    }

    /// Consume the builder and produce a [`RoadGraph`].
    ///
    /// Fails with [`GraphError::DanglingEdge`] if any edge references a node
    /// that was never added — such an edge would corrupt CSR indexing.
    /// Dead-end nodes are permitted (see [`validate`](Self::validate)).
    pub fn build(self) -> GraphResult<RoadGraph> {
        let node_count = self.positions.len();
        let edge_count = self.raw_edges.len();

        if let Some(&(from, to)) = self
            .raw_edges
            .iter()
            .find(|(from, to)| from.index() >= node_count || to.index() >= node_count)
        {
            return Err(GraphError::DanglingEdge { from, to });
        }

        // Sort edges by source node for CSR construction; stable sort keeps
        // authoring order within each node's outgoing set.
        let mut raw = self.raw_edges;
        raw.sort_by_key(|(from, _)| from.0);

        let edge_from: Vec<NodeId> = raw.iter().map(|(from, _)| *from).collect();
        let edge_to:   Vec<NodeId> = raw.iter().map(|(_, to)| *to).collect();
        let edge_length: Vec<f32> = raw
            .iter()
            .map(|(from, to)| self.positions[from.index()].distance(self.positions[to.index()]))
            .collect();

        // Build CSR row pointer (node_out_start).
        let mut node_out_start = vec![0u32; node_count + 1];
        for (from, _) in &raw {
            node_out_start[from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        // Bulk-load R-tree for O(N log N) construction (faster than N inserts).
        let entries: Vec<NodeEntry> = self
            .positions
            .iter()
            .enumerate()
            .map(|(i, pos)| NodeEntry {
                point: [pos.x, pos.z],
                id: NodeId(i as u32),
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        Ok(RoadGraph {
            node_pos: self.positions,
            node_heading: self.headings,
            node_speed_limit: self.limits,
            node_passable: vec![true; node_count],
            node_out_start,
            edge_from,
            edge_to,
            edge_length,
            spatial_idx,
        })
    }
}

impl Default for RoadGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
