//! Graph module - the canonical executable dependency graph
//!
//! Contains the dialect-agnostic graph model and its post-passes:
//! - `port` / `link` / `node`: ports, directed edges, nodes/containers
//! - `propagate`: copies link merge strategies onto destination ports
//! - `validate`: cycle detection and link referential integrity
//!
//! Graphs are immutable once translation, propagation and validation
//! complete; they are rebuilt from scratch for every request.

mod link;
mod node;
mod port;
pub mod propagate;
pub mod validate;

// Re-export public types
pub use link::Link;
pub use node::{GraphNode, NodeKind};
pub use port::{LinkMerge, Port, PortDirection, ScatterMethod};
