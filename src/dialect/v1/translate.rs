//! Graph builder - compiles a v1 job document into the canonical graph
//!
//! Recursive construction: leaf jobs become task nodes whose ports come
//! straight from the application's declarations; pipeline jobs
//! additionally translate every step (child id = parent id + `.` +
//! step local id, which keeps identifiers globally unique across
//! nesting) and every declared data link. The finished graph goes
//! through link-merge propagation, cycle detection and link integrity
//! checks before it is returned.

use std::sync::Arc;

use serde_json::Value;
use smallvec::SmallVec;
use tracing::{debug, instrument};

use crate::error::{PlaitError, Result};
use crate::graph::{
    propagate, validate, GraphNode, Link, LinkMerge, NodeKind, Port, PortDirection,
};
use crate::util::constants::ID_SEPARATOR;

use super::document::{Application, DataLink, PipelineJob};
use super::schema::normalize_id;
use super::values;

/// Compile a job document into a validated canonical graph
#[instrument(skip(job), fields(job_id = %job.id))]
pub fn translate(job: &PipelineJob) -> Result<GraphNode> {
    let mut node = build_node(job.id.clone(), job)?;
    propagate::propagate(&mut node);
    validate::detect_loop(&node)?;
    validate::check_links(&node)?;
    debug!(nodes = node.node_count(), "translated pipeline document");
    Ok(node)
}

fn build_node(node_id: String, job: &PipelineJob) -> Result<GraphNode> {
    let id: Arc<str> = Arc::from(node_id.as_str());

    let mut input_ports = Vec::with_capacity(job.app.inputs().len());
    for decl in job.app.inputs() {
        let port_id = normalize_id(&decl.id);
        let mut port = Port::new(port_id, Arc::clone(&id), PortDirection::Input);
        port.scatter = decl.scatter.unwrap_or(false);
        port.link_merge = decl.link_merge.unwrap_or_default();
        port.default = job
            .inputs
            .get(port_id)
            .map(values::to_common)
            .transpose()?;
        input_ports.push(port);
    }

    let mut output_ports = Vec::with_capacity(job.app.outputs().len());
    for decl in job.app.outputs() {
        let port = Port::new(
            normalize_id(&decl.id),
            Arc::clone(&id),
            PortDirection::Output,
        );
        output_ports.push(port);
    }

    let kind = match &job.app {
        Application::Tool(_) => NodeKind::Task,
        Application::Pipeline(pipeline) => {
            let mut children = Vec::with_capacity(pipeline.steps.len());
            for step in &pipeline.steps {
                let child_id = format!(
                    "{node_id}{ID_SEPARATOR}{local}",
                    local = normalize_id(&step.id)
                );
                children.push(build_node(child_id, &step.job)?);
            }
            let mut links = Vec::with_capacity(pipeline.data_links.len());
            for data_link in &pipeline.data_links {
                links.push(build_link(&node_id, data_link)?);
            }
            NodeKind::Container { children, links }
        }
    };

    let mut node = GraphNode {
        id,
        input_ports,
        output_ports,
        scatter_method: job.scatter_method.unwrap_or_default(),
        app: Arc::new(serde_json::to_value(&job.app)?),
        defaults: values::map_to_common(&job.inputs)?,
        kind,
    };
    process_scatter(job, &mut node)?;
    Ok(node)
}

fn build_link(container_id: &str, data_link: &DataLink) -> Result<Link> {
    let (source_node, source_port, source_at_boundary) =
        resolve_endpoint(container_id, &data_link.source)?;
    let (destination_node, destination_port, destination_at_boundary) =
        resolve_endpoint(container_id, &data_link.destination)?;

    // A boundary source is the container's own input feeding inward; a
    // step source is that step's output. Destinations mirror this.
    let mut source = Port::new(
        source_port,
        Arc::from(source_node.as_str()),
        if source_at_boundary {
            PortDirection::Input
        } else {
            PortDirection::Output
        },
    );
    source.link_merge = LinkMerge::default();

    let mut destination = Port::new(
        destination_port,
        Arc::from(destination_node.as_str()),
        if destination_at_boundary {
            PortDirection::Output
        } else {
            PortDirection::Input
        },
    );
    destination.link_merge = data_link.link_merge;
    destination.scatter = data_link.scattered.unwrap_or(false);

    let position = data_link.position.unwrap_or(1);
    Ok(Link::new(source, destination, data_link.link_merge, position))
}

/// Split an endpoint reference into (node id, port id, at-boundary).
///
/// References without the separator name the container's own boundary
/// ports; otherwise the first segment names a step and the rest that
/// step's port.
fn resolve_endpoint(container_id: &str, reference: &str) -> Result<(String, String, bool)> {
    let stripped = normalize_id(reference);
    let malformed = || PlaitError::MalformedLink {
        reference: reference.to_string(),
        details: "empty endpoint segment".to_string(),
    };
    match stripped.split_once(ID_SEPARATOR) {
        None => {
            if stripped.is_empty() {
                return Err(malformed());
            }
            Ok((container_id.to_string(), stripped.to_string(), true))
        }
        Some((step, port)) => {
            if step.is_empty() || port.is_empty() {
                return Err(malformed());
            }
            Ok((
                format!("{container_id}{ID_SEPARATOR}{step}"),
                port.to_string(),
                false,
            ))
        }
    }
}

/// Flag the node's scatter targets declared on the job.
///
/// The declaration is a port id or a list of port ids; each flags the
/// matching input port, and on containers also the source port of any
/// boundary link fanning that input out to a step.
fn process_scatter(job: &PipelineJob, node: &mut GraphNode) -> Result<()> {
    let Some(declaration) = &job.scatter else {
        return Ok(());
    };

    let mut targets: SmallVec<[String; 4]> = SmallVec::new();
    match declaration {
        Value::String(port_id) => targets.push(normalize_id(port_id).to_string()),
        Value::Array(items) => {
            for item in items {
                match item.as_str() {
                    Some(port_id) => targets.push(normalize_id(port_id).to_string()),
                    None => {
                        return Err(PlaitError::InvalidScatter {
                            node_id: node.id.to_string(),
                            details: format!("non-string entry in scatter list: {item}"),
                        })
                    }
                }
            }
        }
        other => {
            return Err(PlaitError::InvalidScatter {
                node_id: node.id.to_string(),
                details: format!("expected port id or list of port ids, got {other}"),
            })
        }
    }

    for target in &targets {
        for port in &mut node.input_ports {
            if port.id == *target {
                port.scatter = true;
            }
        }
        if let NodeKind::Container { links, .. } = &mut node.kind {
            for link in links.iter_mut() {
                if link.source.id == *target && link.source.direction == PortDirection::Input {
                    link.source.scatter = true;
                }
            }
        }
    }
    Ok(())
}
