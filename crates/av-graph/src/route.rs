//! `Route` — the result of a routing query.

use std::collections::VecDeque;

use av_core::NodeId;

/// An ordered sequence of road nodes from the querying agent's position to a
/// target, plus the cumulative straight-line length.
///
/// The agent's current node is implicit and never part of the sequence.
/// A route is owned by exactly one agent, replaced wholesale when exhausted
/// or invalidated, and mutated only by [`advance`](Route::advance) popping
/// the head as each node is reached.
///
/// An **empty** route is the "no path found" signal: drivers receiving one
/// must fall back to a stopped state.  A non-empty route whose last node is
/// not the requested target is a bounded-search partial — drivable, but not
/// a guarantee of arrival (check [`reaches`](Route::reaches)).
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    nodes: VecDeque<NodeId>,
    length: f32,
}

impl Route {
    /// The empty route ("no path found").
    pub fn empty() -> Self {
        Self { nodes: VecDeque::new(), length: 0.0 }
    }

    /// Build a route from an ordered node sequence and its total length.
    pub fn new(nodes: Vec<NodeId>, length: f32) -> Self {
        Self { nodes: VecDeque::from(nodes), length }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes remaining, excluding any already reached.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Total straight-line length of the route as found.
    #[inline]
    pub fn length(&self) -> f32 {
        self.length
    }

    /// The next node to drive toward.
    #[inline]
    pub fn head(&self) -> Option<NodeId> {
        self.nodes.front().copied()
    }

    /// The final node of the route.
    #[inline]
    pub fn last(&self) -> Option<NodeId> {
        self.nodes.back().copied()
    }

    /// `true` if the route ends at `target`.
    #[inline]
    pub fn reaches(&self, target: NodeId) -> bool {
        self.last() == Some(target)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    /// Pop the head node (it has been reached) and return it.
    pub fn advance(&mut self) -> Option<NodeId> {
        self.nodes.pop_front()
    }

    /// Iterate the remaining nodes in driving order.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }
}
