//! Link-merge propagation - post-pass over a built graph
//!
//! Every link carries the merge strategy its dialect declared; this
//! pass copies that strategy onto each destination port identity
//! wherever it occurs: the link's own destination reference, the
//! container's boundary ports, and every child's ports (both
//! directions, since a destination reference may match an input or an
//! output port depending on where it sits in the nesting). The scan is
//! O(links × nodes × ports) per container; graphs are small and built
//! once per submission. Re-application only copies an enum value, so
//! repeated runs are idempotent.

use super::node::{GraphNode, NodeKind};
use super::port::{LinkMerge, Port};

/// Push every link's merge strategy onto the ports it terminates at,
/// recursing through nested containers.
pub fn propagate(node: &mut GraphNode) {
    let NodeKind::Container { children, links } = &mut node.kind else {
        return;
    };

    let mut targets: Vec<(Port, LinkMerge)> = Vec::with_capacity(links.len());
    for link in links.iter_mut() {
        link.destination.link_merge = link.link_merge;
        targets.push((link.destination.clone(), link.link_merge));
    }

    for (destination, merge) in &targets {
        apply(&mut node.input_ports, destination, *merge);
        apply(&mut node.output_ports, destination, *merge);
        for child in children.iter_mut() {
            apply(&mut child.input_ports, destination, *merge);
            apply(&mut child.output_ports, destination, *merge);
        }
    }

    for child in children.iter_mut() {
        propagate(child);
    }
}

fn apply(ports: &mut [Port], destination: &Port, merge: LinkMerge) {
    for port in ports {
        if port == destination {
            port.link_merge = merge;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::link::Link;
    use crate::graph::port::{PortDirection, ScatterMethod};
    use serde_json::Value;
    use std::collections::BTreeMap;
    use std::sync::Arc;

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

    #[test]
    fn merge_lands_on_destination_port_and_link() {
        let child = task("w.step", &["items"], &["out"]);
        let link = Link::new(
            port("w", "items", PortDirection::Input),
            port("w.step", "items", PortDirection::Input),
            LinkMerge::MergeFlattened,
            1,
        );
        let mut graph = GraphNode {
            id: Arc::from("w"),
            input_ports: vec![port("w", "items", PortDirection::Input)],
            output_ports: Vec::new(),
            scatter_method: ScatterMethod::default(),
            app: Arc::new(Value::Null),
            defaults: BTreeMap::new(),
            kind: NodeKind::Container {
                children: vec![child],
                links: vec![link],
            },
        };

        propagate(&mut graph);

        let step = &graph.children()[0];
        assert_eq!(step.input_ports[0].link_merge, LinkMerge::MergeFlattened);
        assert_eq!(
            graph.links()[0].destination.link_merge,
            LinkMerge::MergeFlattened
        );
        // The boundary port is the source here, not the destination
        assert_eq!(graph.input_ports[0].link_merge, LinkMerge::MergeNested);
    }

    #[test]
    fn propagation_recurses_into_nested_containers() {
        let leaf = task("w.sub.leaf", &["x"], &[]);
        let inner_link = Link::new(
            port("w.sub", "x", PortDirection::Input),
            port("w.sub.leaf", "x", PortDirection::Input),
            LinkMerge::MergeFlattened,
            1,
        );
        let sub = GraphNode {
            id: Arc::from("w.sub"),
            input_ports: vec![port("w.sub", "x", PortDirection::Input)],
            output_ports: Vec::new(),
            scatter_method: ScatterMethod::default(),
            app: Arc::new(Value::Null),
            defaults: BTreeMap::new(),
            kind: NodeKind::Container {
                children: vec![leaf],
                links: vec![inner_link],
            },
        };
        let mut graph = GraphNode {
            id: Arc::from("w"),
            input_ports: Vec::new(),
            output_ports: Vec::new(),
            scatter_method: ScatterMethod::default(),
            app: Arc::new(Value::Null),
            defaults: BTreeMap::new(),
            kind: NodeKind::Container {
                children: vec![sub],
                links: Vec::new(),
            },
        };

        propagate(&mut graph);

        let leaf = graph.find_node("w.sub.leaf").unwrap();
        assert_eq!(leaf.input_ports[0].link_merge, LinkMerge::MergeFlattened);
    }

    #[test]
    fn propagation_is_idempotent() {
        let child = task("w.step", &["items"], &[]);
        let link = Link::new(
            port("w", "items", PortDirection::Input),
            port("w.step", "items", PortDirection::Input),
            LinkMerge::MergeFlattened,
            1,
        );
        let mut graph = GraphNode {
            id: Arc::from("w"),
            input_ports: Vec::new(),
            output_ports: Vec::new(),
            scatter_method: ScatterMethod::default(),
            app: Arc::new(Value::Null),
            defaults: BTreeMap::new(),
            kind: NodeKind::Container {
                children: vec![child],
                links: vec![link],
            },
        };

        propagate(&mut graph);
        let first = format!("{graph:?}");
        propagate(&mut graph);
        assert_eq!(first, format!("{graph:?}"));
    }
}
