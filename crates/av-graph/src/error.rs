//! Graph-subsystem error type.
//!
//! "No route found" is deliberately **not** here: routers signal it with an
//! empty [`Route`](crate::Route) so callers recover locally instead of
//! unwinding.

use thiserror::Error;

use av_core::NodeId;

/// Errors produced by `av-graph`.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),

    #[error("edge {from} -> {to} references a node that was never added")]
    DanglingEdge { from: NodeId, to: NodeId },

    #[error("graph parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GraphResult<T> = Result<T, GraphError>;
