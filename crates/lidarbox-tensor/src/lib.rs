#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// The lane algebra trait and the immediate-evaluation backend.
pub mod backend;

/// Error types for graph evaluation.
pub mod error;

/// The deferred computation-graph backend.
pub mod graph;

pub use backend::{Backend, Eager};
pub use error::GraphError;
pub use graph::{Graph, NodeId};
