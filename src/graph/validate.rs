//! Graph validation - cycle detection and link referential integrity
//!
//! Cycle detection uses DFS three-color marking over the node-to-node
//! edges induced by each container's links:
//! - White: unvisited
//! - Gray: currently in the DFS stack (visiting)
//! - Black: fully processed
//!
//! A cycle exists when traversal reaches a Gray node. Nested containers
//! are validated with the same walk over their own links.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::error::{PlaitError, Result};

use super::node::GraphNode;

/// Stack-allocated successor lists: most nodes have few outgoing links
type EdgeVec = SmallVec<[Arc<str>; 4]>;

/// Verify the graph is acyclic.
///
/// Fails with [`PlaitError::CycleDetected`] naming the cycle path the
/// first time a node repeats on the current traversal path.
pub fn detect_loop(node: &GraphNode) -> Result<()> {
    if !node.is_container() {
        return Ok(());
    }

    let mut adjacency: FxHashMap<Arc<str>, EdgeVec> = FxHashMap::default();
    for link in node.links() {
        adjacency
            .entry(Arc::clone(&link.source.node_id))
            .or_default()
            .push(Arc::clone(&link.destination.node_id));
    }

    let mut members: Vec<Arc<str>> = Vec::with_capacity(node.children().len() + 1);
    members.push(Arc::clone(&node.id));
    members.extend(node.children().iter().map(|child| Arc::clone(&child.id)));

    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Color {
        White,
        Gray,
        Black,
    }

    fn dfs(
        current: &Arc<str>,
        container_id: &str,
        adjacency: &FxHashMap<Arc<str>, EdgeVec>,
        colors: &mut FxHashMap<Arc<str>, Color>,
        stack: &mut Vec<Arc<str>>,
    ) -> std::result::Result<(), String> {
        colors.insert(Arc::clone(current), Color::Gray);
        stack.push(Arc::clone(current));

        if let Some(successors) = adjacency.get(current) {
            for next in successors {
                // Edges into the container's own boundary ports leave the
                // child subgraph; they cannot close a cycle among children.
                if next.as_ref() == container_id {
                    continue;
                }
                match colors.get(next) {
                    Some(Color::Gray) => {
                        let start = stack
                            .iter()
                            .position(|id| id.as_ref() == next.as_ref())
                            .unwrap_or(0);
                        let cycle: Vec<&str> =
                            stack[start..].iter().map(|id| id.as_ref()).collect();
                        return Err(format!("{} → {}", cycle.join(" → "), next));
                    }
                    Some(Color::White) | None => {
                        dfs(next, container_id, adjacency, colors, stack)?;
                    }
                    Some(Color::Black) => {}
                }
            }
        }

        stack.pop();
        colors.insert(Arc::clone(current), Color::Black);
        Ok(())
    }

    let mut colors: FxHashMap<Arc<str>, Color> = members
        .iter()
        .map(|id| (Arc::clone(id), Color::White))
        .collect();
    let mut stack: Vec<Arc<str>> = Vec::new();

    for member in &members {
        if colors.get(member) == Some(&Color::White) {
            if let Err(cycle) = dfs(member, node.id.as_ref(), &adjacency, &mut colors, &mut stack)
            {
                return Err(PlaitError::CycleDetected { cycle });
            }
        }
    }

    for child in node.children() {
        detect_loop(child)?;
    }

    Ok(())
}

/// Verify every link endpoint resolves to a declared port.
///
/// An endpoint may name the container itself (a boundary port) or one
/// of its direct children; anything else is a dangling reference.
pub fn check_links(node: &GraphNode) -> Result<()> {
    for link in node.links() {
        for endpoint in [&link.source, &link.destination] {
            let owner = if endpoint.node_id == node.id {
                Some(node)
            } else {
                node.children()
                    .iter()
                    .find(|child| child.id == endpoint.node_id)
            };
            let resolved = owner.is_some_and(|owner| owner.has_port(endpoint));
            if !resolved {
                return Err(PlaitError::DanglingLink {
                    node_id: endpoint.node_id.to_string(),
                    port_id: endpoint.id.clone(),
                });
            }
        }
    }
    for child in node.children() {
        check_links(child)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::link::Link;
    use crate::graph::node::NodeKind;
    use crate::graph::port::{LinkMerge, Port, PortDirection, ScatterMethod};
    use serde_json::Value;
    use std::collections::BTreeMap;

    fn port(node: &str, id: &str, direction: PortDirection) -> Port {
        Port::new(id, Arc::from(node), direction)
    }

    fn task(id: &str, inputs: &[&str], outputs: &[&str]) -> GraphNode {
        GraphNode {
            id: Arc::from(id),
            input_ports: inputs
                .iter()
                .map(|p| port(id, p, PortDirection::Input))
                .collect(),
            output_ports: outputs
                .iter()
                .map(|p| port(id, p, PortDirection::Output))
                .collect(),
            scatter_method: ScatterMethod::default(),
            app: Arc::new(Value::Null),
            defaults: BTreeMap::new(),
            kind: NodeKind::Task,
        }
    }

    fn container(id: &str, children: Vec<GraphNode>, links: Vec<Link>) -> GraphNode {
        GraphNode {
            id: Arc::from(id),
            input_ports: vec![port(id, "in", PortDirection::Input)],
            output_ports: vec![port(id, "out", PortDirection::Output)],
            scatter_method: ScatterMethod::default(),
            app: Arc::new(Value::Null),
            defaults: BTreeMap::new(),
            kind: NodeKind::Container { children, links },
        }
    }

    fn edge(src_node: &str, src_port: &str, dst_node: &str, dst_port: &str) -> Link {
        Link::new(
            port(src_node, src_port, PortDirection::Output),
            port(dst_node, dst_port, PortDirection::Input),
            LinkMerge::MergeNested,
            1,
        )
    }

    #[test]
    fn linear_chain_is_acyclic() {
        let graph = container(
            "w",
            vec![
                task("w.a", &["in"], &["out"]),
                task("w.b", &["in"], &["out"]),
            ],
            vec![
                edge("w.a", "out", "w.b", "in"),
                edge("w.b", "out", "w", "out"),
            ],
        );
        assert!(detect_loop(&graph).is_ok());
    }

    #[test]
    fn two_step_cycle_is_detected() {
        let graph = container(
            "w",
            vec![
                task("w.a", &["in"], &["out"]),
                task("w.b", &["in"], &["out"]),
            ],
            vec![
                edge("w.a", "out", "w.b", "in"),
                edge("w.b", "out", "w.a", "in"),
            ],
        );
        let err = detect_loop(&graph).unwrap_err();
        assert_eq!(err.code(), "PLAIT-020");
        let msg = err.to_string();
        assert!(msg.contains("w.a") || msg.contains("w.b"));
        assert!(msg.contains("→"));
    }

    #[test]
    fn self_loop_is_detected() {
        let graph = container(
            "w",
            vec![task("w.a", &["in"], &["out"])],
            vec![edge("w.a", "out", "w.a", "in")],
        );
        assert!(detect_loop(&graph).is_err());
    }

    #[test]
    fn boundary_roundtrip_is_not_a_cycle() {
        // in -> step -> out passes through the container's own ports
        let graph = container(
            "w",
            vec![task("w.a", &["in"], &["out"])],
            vec![
                edge("w", "in", "w.a", "in"),
                edge("w.a", "out", "w", "out"),
            ],
        );
        assert!(detect_loop(&graph).is_ok());
    }

    #[test]
    fn nested_container_cycle_is_detected() {
        let inner = container(
            "w.sub",
            vec![
                task("w.sub.x", &["in"], &["out"]),
                task("w.sub.y", &["in"], &["out"]),
            ],
            vec![
                edge("w.sub.x", "out", "w.sub.y", "in"),
                edge("w.sub.y", "out", "w.sub.x", "in"),
            ],
        );
        let graph = container("w", vec![inner], Vec::new());
        let err = detect_loop(&graph).unwrap_err();
        assert_eq!(err.code(), "PLAIT-020");
    }

    #[test]
    fn dangling_endpoint_fails_integrity() {
        let graph = container(
            "w",
            vec![task("w.a", &["in"], &["out"])],
            vec![edge("w.a", "out", "w.ghost", "in")],
        );
        let err = check_links(&graph).unwrap_err();
        assert_eq!(err.code(), "PLAIT-021");
        assert!(err.to_string().contains("w.ghost.in"));
    }

    #[test]
    fn valid_links_pass_integrity() {
        let graph = container(
            "w",
            vec![task("w.a", &["in"], &["out"])],
            vec![
                edge("w", "in", "w.a", "in"),
                edge("w.a", "out", "w", "out"),
            ],
        );
        assert!(check_links(&graph).is_ok());
    }
}
