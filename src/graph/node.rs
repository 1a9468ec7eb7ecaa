//! Graph nodes - units of work, possibly containing nested sub-graphs
//!
//! A node's identifier is hierarchical: each nesting level appends the
//! step's local id behind [`crate::util::constants::ID_SEPARATOR`],
//! which is what keeps identifiers globally unique across nesting.
//! Containers own their children exclusively; the whole graph is
//! rebuilt from scratch for every translation request.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::model::CommonValue;

use super::link::Link;
use super::port::{Port, ScatterMethod};

/// What a node is: a single task, or a container of linked children
#[derive(Debug, Clone, Serialize)]
pub enum NodeKind {
    Task,
    Container {
        children: Vec<GraphNode>,
        links: Vec<Link>,
    },
}

/// One unit of work in the canonical graph
#[derive(Debug, Clone, Serialize)]
pub struct GraphNode {
    /// Globally unique hierarchical identifier
    pub id: Arc<str>,
    pub input_ports: Vec<Port>,
    pub output_ports: Vec<Port>,
    pub scatter_method: ScatterMethod,
    /// The dialect-specific application document this node wraps,
    /// opaque to the graph
    pub app: Arc<Value>,
    /// Supplied input values in canonical representation
    pub defaults: BTreeMap<String, CommonValue>,
    pub kind: NodeKind,
}

impl GraphNode {
    pub fn is_container(&self) -> bool {
        matches!(self.kind, NodeKind::Container { .. })
    }

    /// Child nodes; empty for task nodes
    pub fn children(&self) -> &[GraphNode] {
        match &self.kind {
            NodeKind::Container { children, .. } => children,
            NodeKind::Task => &[],
        }
    }

    /// Links owned by this container; empty for task nodes
    pub fn links(&self) -> &[Link] {
        match &self.kind {
            NodeKind::Container { links, .. } => links,
            NodeKind::Task => &[],
        }
    }

    /// Total node count: this node plus every transitive child
    pub fn node_count(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(GraphNode::node_count)
            .sum::<usize>()
    }

    /// Look a node up by id, searching this node and all descendants
    pub fn find_node(&self, id: &str) -> Option<&GraphNode> {
        if self.id.as_ref() == id {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find_node(id))
    }

    /// Ports of both directions, inputs first
    pub fn ports(&self) -> impl Iterator<Item = &Port> {
        self.input_ports.iter().chain(self.output_ports.iter())
    }

    /// True when some port of this node matches the given identity
    pub fn has_port(&self, port: &Port) -> bool {
        self.ports().any(|candidate| candidate == port)
    }
}
