//! v1 pipeline document model
//!
//! The raw serde types a `plait/pipeline@1` document deserializes
//! into. A job wraps an application; pipeline applications nest
//! further jobs through their steps, giving the workflow-of-workflows
//! shape. Unknown application fields ride along in `extra` so the
//! document survives the trip into the graph's opaque `app` slot.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::graph::{LinkMerge, ScatterMethod};

/// Schema tag for v1 pipeline documents
pub const SCHEMA_V1: &str = "plait/pipeline@1";

/// A unit of submitted work: an application plus its supplied values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineJob {
    /// Dialect tag; present on the document root, omitted on nested jobs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub id: String,
    pub app: Application,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub inputs: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub outputs: Map<String, Value>,
    /// Port id or list of port ids to fan out over; shape is checked
    /// at translation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scatter: Option<Value>,
    #[serde(
        default,
        rename = "scatterMethod",
        skip_serializing_if = "Option::is_none"
    )]
    pub scatter_method: Option<ScatterMethod>,
    /// Per-job configuration handed to injected collaborators
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub config: Map<String, Value>,
}

impl PipelineJob {
    /// Copy of the job with replaced input values
    pub fn clone_with_inputs(&self, inputs: Map<String, Value>) -> Self {
        Self {
            inputs,
            ..self.clone()
        }
    }

    /// Copy of the job with replaced output values
    pub fn clone_with_outputs(&self, outputs: Map<String, Value>) -> Self {
        Self {
            outputs,
            ..self.clone()
        }
    }
}

/// What a job runs: a leaf tool or a nested pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "class")]
pub enum Application {
    Tool(ToolApp),
    Pipeline(PipelineApp),
}

impl Application {
    pub fn inputs(&self) -> &[PortDecl] {
        match self {
            Application::Tool(tool) => &tool.inputs,
            Application::Pipeline(pipeline) => &pipeline.inputs,
        }
    }

    pub fn outputs(&self) -> &[PortDecl] {
        match self {
            Application::Tool(tool) => &tool.outputs,
            Application::Pipeline(pipeline) => &pipeline.outputs,
        }
    }

    pub fn is_pipeline(&self) -> bool {
        matches!(self, Application::Pipeline(_))
    }
}

/// A leaf application; execution details stay opaque to the compiler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolApp {
    #[serde(default)]
    pub inputs: Vec<PortDecl>,
    #[serde(default)]
    pub outputs: Vec<PortDecl>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A composite application wiring steps together with data links
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineApp {
    #[serde(default)]
    pub inputs: Vec<PortDecl>,
    #[serde(default)]
    pub outputs: Vec<PortDecl>,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default, rename = "dataLinks")]
    pub data_links: Vec<DataLink>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One step of a pipeline: a local id and the job it runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub id: String,
    pub job: PipelineJob,
}

/// A declared edge between two port references.
///
/// References are `#port` for the pipeline's own boundary or
/// `#step.port` for a step's port.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataLink {
    pub source: String,
    pub destination: String,
    #[serde(default, rename = "linkMerge")]
    pub link_merge: LinkMerge,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scattered: Option<bool>,
}

/// Declared port of an application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortDecl {
    pub id: String,
    #[serde(default, rename = "type", skip_serializing_if = "Value::is_null")]
    pub schema: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scatter: Option<bool>,
    #[serde(
        default,
        rename = "linkMerge",
        skip_serializing_if = "Option::is_none"
    )]
    pub link_merge: Option<LinkMerge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binding: Option<PortBinding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Binding metadata attached to a port declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortBinding {
    #[serde(
        default,
        rename = "secondaryFiles",
        skip_serializing_if = "Option::is_none"
    )]
    pub secondary_files: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl crate::process::AppPort for PortDecl {
    fn id(&self) -> &str {
        super::schema::normalize_id(&self.id)
    }

    fn is_array(&self) -> bool {
        super::schema::is_array_schema(&self.schema)
    }

    fn is_file(&self) -> bool {
        super::schema::is_file_schema(&self.schema)
    }

    fn secondary_file_rules(&self) -> Option<&[String]> {
        self.binding
            .as_ref()
            .and_then(|binding| binding.secondary_files.as_deref())
    }
}
