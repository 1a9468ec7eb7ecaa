//! Plait - workflow graph compiler for versioned pipeline dialects
//!
//! Compiles declarative, possibly deeply nested pipeline documents
//! into one canonical executable dependency graph, and processes the
//! values flowing through ports - file discovery, path remapping and
//! secondary-file derivation - uniformly across dialects.
//!
//! The crate does not execute anything: it produces the graph and the
//! resolved values a separate execution component consumes.

pub mod bindings;
pub mod dialect;
pub mod error;
pub mod graph;
pub mod model;
pub mod process;
pub mod util;

pub use bindings::Dialect;
pub use error::{FixSuggestion, PlaitError, Result};
pub use graph::{GraphNode, Link, LinkMerge, NodeKind, Port, PortDirection, ScatterMethod};
pub use model::{CommonValue, FileDescriptor};
