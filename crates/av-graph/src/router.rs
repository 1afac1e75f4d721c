//! Routing trait and the default branch-and-bound implementation.
//!
//! # Pluggability
//!
//! The sim driver calls routing via the [`Router`] trait, so applications can
//! swap in custom implementations (Dijkstra, A*, hierarchical) without
//! touching the framework core.  The default [`BranchBoundRouter`] is a
//! depth-first branch-and-bound search tuned for the shallow, locally
//! connected graphs road maps tend to be.
//!
//! # Search shape
//!
//! At each expansion the candidate successors are ordered by straight-line
//! distance to the target, closest first — a greedy ordering heuristic only,
//! not an admissibility bound.  A partial path is abandoned the moment its
//! accumulated length reaches the best recorded candidate's length.  With
//! [`RouteQuery::max_nodes`] set, a path exceeding that node count is
//! recorded as a candidate as-is and the branch is cut, trading optimality
//! for a bounded search ("good enough" partial routes — the successor
//! ordering biases them toward the target).

use av_core::NodeId;

use crate::graph::RoadGraph;
use crate::route::Route;
use crate::{GraphError, GraphResult};

// ── RouteQuery ────────────────────────────────────────────────────────────────

/// Options for one routing request.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteQuery {
    /// Node excluded from the route body.  Never suppresses the start or the
    /// target themselves.
    pub avoid: Option<NodeId>,

    /// Cut any branch whose path grows beyond this many nodes, keeping the
    /// partial as a candidate.  `None` searches exhaustively.
    pub max_nodes: Option<usize>,
}

impl RouteQuery {
    /// Unbounded search with no exclusions.
    pub fn direct() -> Self {
        Self::default()
    }

    pub fn avoiding(mut self, node: NodeId) -> Self {
        self.avoid = Some(node);
        self
    }

    pub fn capped(mut self, max_nodes: usize) -> Self {
        self.max_nodes = Some(max_nodes);
        self
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.
pub trait Router {
    /// Compute a route from `start` to `target`.
    ///
    /// Errors only on nonexistent endpoints.  An unreachable target is not
    /// an error: the result is the **empty route**, which callers must treat
    /// as "no path found".  The returned sequence excludes `start` itself.
    fn find_route(
        &self,
        graph: &RoadGraph,
        start: NodeId,
        target: NodeId,
        query: &RouteQuery,
    ) -> GraphResult<Route>;
}

// ── BranchBoundRouter ─────────────────────────────────────────────────────────

/// Depth-first branch-and-bound over the road graph.
///
/// Exhaustively optimal over simple paths in unbounded mode; with a node cap
/// the result is the shortest *recorded* candidate, which may be a partial
/// (see module docs).
pub struct BranchBoundRouter;

impl Router for BranchBoundRouter {
    fn find_route(
        &self,
        graph: &RoadGraph,
        start: NodeId,
        target: NodeId,
        query: &RouteQuery,
    ) -> GraphResult<Route> {
        if !graph.contains(start) {
            return Err(GraphError::NodeNotFound(start));
        }
        if !graph.contains(target) {
            return Err(GraphError::NodeNotFound(target));
        }
        if start == target {
            return Ok(Route::empty());
        }

        let mut search = Search {
            graph,
            start,
            target,
            avoid: query.avoid,
            max_nodes: query.max_nodes,
            path: Vec::new(),
            length: 0.0,
            best: None,
        };
        search.descend(start);

        Ok(match search.best {
            None => Route::empty(),
            Some((nodes, length)) => Route::new(nodes, length),
        })
    }
}

// ── Search state ──────────────────────────────────────────────────────────────

struct Search<'a> {
    graph: &'a RoadGraph,
    start: NodeId,
    target: NodeId,
    avoid: Option<NodeId>,
    max_nodes: Option<usize>,

    /// Path-so-far, excluding `start` (the caller's position is implicit).
    path: Vec<NodeId>,
    /// Accumulated length of `path`.
    length: f32,
    /// Best recorded candidate: complete routes and node-cap partials
    /// compete in the same slot, by length.
    best: Option<(Vec<NodeId>, f32)>,
}

impl Search<'_> {
    /// `true` if a candidate of `length` would beat the recorded best.
    #[inline]
    fn beats_best(&self, length: f32) -> bool {
        match &self.best {
            None => true,
            Some((_, best_len)) => length < *best_len,
        }
    }

    fn record_candidate(&mut self) {
        if self.beats_best(self.length) {
            self.best = Some((self.path.clone(), self.length));
        }
    }

    /// Expand `node`'s successors, closest-to-target first, with
    /// backtrack-on-return discipline over the owned `path`.
    fn descend(&mut self, node: NodeId) {
        // Gather successors with their edge lengths, then order greedily.
        let mut successors: Vec<(f32, NodeId, f32)> = self
            .graph
            .out_edges(node)
            .map(|e| {
                let to = self.graph.edge_to[e.index()];
                (
                    self.graph.distance(to, self.target),
                    to,
                    self.graph.edge_length[e.index()],
                )
            })
            .collect();
        successors.sort_by(|a, b| a.0.total_cmp(&b.0));

        for (_, cand, edge_len) in successors {
            // No revisits: the implicit start and every path node are taken.
            if cand == self.start || self.path.contains(&cand) {
                continue;
            }
            // The avoid node is excluded everywhere except as the target
            // itself (start is unreachable as a candidate above anyway).
            if self.avoid == Some(cand) && cand != self.target {
                continue;
            }
            let new_length = self.length + edge_len;
            // Branch-and-bound: a path that already matches the best
            // candidate's length cannot improve on it.
            if !self.beats_best(new_length) {
                continue;
            }

            self.path.push(cand);
            self.length = new_length;

            if cand == self.target {
                self.record_candidate();
            } else if self.max_nodes.is_some_and(|cap| self.path.len() > cap) {
                // Bounded mode: keep the partial as a candidate, cut here.
                self.record_candidate();
            } else {
                self.descend(cand);
            }

            self.path.pop();
            self.length -= edge_len;
        }
    }
}
