//! Ports - the named endpoints data enters and leaves a node through
//!
//! A port's identity is `(node_id, id)`; scatter, link-merge, default
//! and transform are mutable attributes of that identity and take no
//! part in equality or hashing.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::model::CommonValue;

/// Which side of a node a port sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PortDirection {
    Input,
    Output,
}

/// Strategy for combining multiple values arriving at one destination
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, serde::Deserialize)]
pub enum LinkMerge {
    /// Wrap incoming values as an array-of-arrays
    #[default]
    #[serde(rename = "merge_nested")]
    MergeNested,
    /// Concatenate incoming arrays into one
    #[serde(rename = "merge_flattened")]
    MergeFlattened,
}

/// Policy for fanning a scattered node out over its array inputs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, serde::Deserialize)]
pub enum ScatterMethod {
    /// Pairwise over equal-length arrays
    #[default]
    #[serde(rename = "dotproduct")]
    Dotproduct,
    /// Cross-product, output nested per scatter source
    #[serde(rename = "nested_crossproduct")]
    NestedCrossproduct,
    /// Cross-product, output flattened
    #[serde(rename = "flat_crossproduct")]
    FlatCrossproduct,
}

/// An input or output port of a graph node
#[derive(Debug, Clone, Serialize)]
pub struct Port {
    /// Normalized port id (dialect sigil prefixes stripped)
    pub id: String,
    /// Owning node, referenced by id rather than live reference
    pub node_id: Arc<str>,
    pub direction: PortDirection,
    pub scatter: bool,
    pub link_merge: LinkMerge,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<CommonValue>,
    /// Dialect-specific transform expression, carried opaquely
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<Value>,
}

impl Port {
    pub fn new(id: impl Into<String>, node_id: Arc<str>, direction: PortDirection) -> Self {
        Self {
            id: id.into(),
            node_id,
            direction,
            scatter: false,
            link_merge: LinkMerge::default(),
            default: None,
            transform: None,
        }
    }

    /// True when `other` names the same port identity
    pub fn same_port(&self, other: &Port) -> bool {
        self == other
    }
}

impl PartialEq for Port {
    fn eq(&self, other: &Self) -> bool {
        self.node_id == other.node_id && self.id == other.id
    }
}

impl Eq for Port {}

impl Hash for Port {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.node_id.hash(state);
        self.id.hash(state);
    }
}
