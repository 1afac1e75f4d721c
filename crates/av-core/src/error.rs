//! Framework error type.
//!
//! Sub-crates define their own error enums and either convert into `AvError`
//! via `From` impls or wrap it as one variant.  Soft runtime conditions
//! (no route found, stale agent reference, budget exhaustion) are *not*
//! errors — they are recovered locally by the components that meet them.

use thiserror::Error;

use crate::NodeId;

/// The top-level error type for `av-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum AvError {
    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `av-*` crates.
pub type AvResult<T> = Result<T, AvError>;
