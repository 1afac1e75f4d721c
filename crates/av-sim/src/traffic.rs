//! The traffic-control interface.
//!
//! Signal-timing collaborators run on their own cadence, so their writes are
//! queued here and applied at the top of the next tick — before any
//! controller reads the graph.  That makes toggle-then-read ordering
//! deterministic for the whole tick.

use av_core::NodeId;

/// One queued write against the road graph.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrafficCommand {
    /// Grant or revoke right of way through a node.
    SetPassable { node: NodeId, passable: bool },
    /// Adjust a node's local speed limit.
    SetSpeedLimit { node: NodeId, limit: f32 },
}
