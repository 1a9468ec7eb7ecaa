//! v1 dialect - `plait/pipeline@1` documents
//!
//! Contains the document model, schema helpers, value translator,
//! graph builder and per-job file-value operations for the first
//! pipeline schema, plus the [`crate::bindings::Dialect`] facade that
//! presents them dialect-agnostically.

pub mod document;
pub mod processor;
pub mod schema;
pub mod translate;
pub mod values;

use rustc_hash::FxHashSet;
use serde_json::Value;

use crate::bindings::Dialect;
use crate::error::{PlaitError, Result};
use crate::graph::GraphNode;
use crate::model::{CommonValue, FileDescriptor};
use crate::process::{ExpressionEvaluator, FilePathMapper, FileTransformer};

pub use document::{
    Application, DataLink, PipelineApp, PipelineJob, PortBinding, PortDecl, Step, ToolApp,
    SCHEMA_V1,
};

/// Facade wiring the v1 pieces into the dialect-agnostic boundary
#[derive(Debug)]
pub struct V1Dialect;

impl V1Dialect {
    fn parse(&self, document: &Value) -> Result<PipelineJob> {
        serde_json::from_value(document.clone()).map_err(|e| PlaitError::ParseError {
            details: e.to_string(),
        })
    }

    fn serialize(&self, job: &PipelineJob) -> Result<Value> {
        Ok(serde_json::to_value(job)?)
    }
}

impl Dialect for V1Dialect {
    fn schema_tag(&self) -> &'static str {
        SCHEMA_V1
    }

    fn translate(&self, document: &Value) -> Result<GraphNode> {
        self.parse(document)
            .and_then(|job| translate::translate(&job))
            .map_err(PlaitError::into_binding)
    }

    fn input_files(
        &self,
        document: &Value,
        evaluator: Option<&dyn ExpressionEvaluator>,
        visible_ports: Option<FxHashSet<String>>,
    ) -> Result<FxHashSet<FileDescriptor>> {
        self.parse(document)
            .and_then(|job| processor::get_input_files(&job, evaluator, visible_ports))
            .map_err(PlaitError::into_binding)
    }

    fn output_files(
        &self,
        document: &Value,
        evaluator: Option<&dyn ExpressionEvaluator>,
        visible_ports: Option<FxHashSet<String>>,
    ) -> Result<FxHashSet<FileDescriptor>> {
        self.parse(document)
            .and_then(|job| processor::get_output_files(&job, evaluator, visible_ports))
            .map_err(PlaitError::into_binding)
    }

    fn map_input_paths(&self, document: &Value, mapper: &dyn FilePathMapper) -> Result<Value> {
        self.parse(document)
            .and_then(|job| processor::map_input_paths(&job, mapper))
            .and_then(|job| self.serialize(&job))
            .map_err(PlaitError::into_binding)
    }

    fn map_output_paths(&self, document: &Value, mapper: &dyn FilePathMapper) -> Result<Value> {
        self.parse(document)
            .and_then(|job| processor::map_output_paths(&job, mapper))
            .and_then(|job| self.serialize(&job))
            .map_err(PlaitError::into_binding)
    }

    fn update_input_files(
        &self,
        document: &Value,
        transformer: &dyn FileTransformer,
    ) -> Result<Value> {
        self.parse(document)
            .and_then(|job| processor::update_input_files(&job, transformer))
            .and_then(|job| self.serialize(&job))
            .map_err(PlaitError::into_binding)
    }

    fn update_output_files(
        &self,
        document: &Value,
        transformer: &dyn FileTransformer,
    ) -> Result<Value> {
        self.parse(document)
            .and_then(|job| processor::update_output_files(&job, transformer))
            .and_then(|job| self.serialize(&job))
            .map_err(PlaitError::into_binding)
    }

    fn to_common(&self, native: &Value) -> Result<CommonValue> {
        values::to_common(native).map_err(PlaitError::into_binding)
    }

    fn to_specific(&self, common: &CommonValue) -> Result<Value> {
        Ok(values::to_specific(common))
    }
}
