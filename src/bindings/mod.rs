//! Bindings - the dialect-agnostic protocol boundary
//!
//! A dialect packages everything version-specific behind one
//! capability set: translation to the canonical graph, per-job file
//! value operations, and value translation. Callers pick a dialect by
//! its schema tag (or let [`detect`] read it off the document) and
//! never see dialect document types.
//!
//! Every error crossing this boundary is wrapped into the
//! [`crate::error::PlaitError::Binding`] umbrella.

use rustc_hash::FxHashSet;
use serde_json::Value;

use crate::error::{PlaitError, Result};
use crate::graph::GraphNode;
use crate::model::{CommonValue, FileDescriptor};
use crate::process::{ExpressionEvaluator, FilePathMapper, FileTransformer};
use crate::util::constants::SCHEMA_KEY;

/// Version-specific capabilities, one implementation per dialect
pub trait Dialect: Sync + std::fmt::Debug {
    /// The schema tag documents of this dialect carry
    fn schema_tag(&self) -> &'static str;

    /// Compile a job document into the canonical, validated graph
    fn translate(&self, document: &Value) -> Result<GraphNode>;

    /// Files reachable from the job's inputs
    fn input_files(
        &self,
        document: &Value,
        evaluator: Option<&dyn ExpressionEvaluator>,
        visible_ports: Option<FxHashSet<String>>,
    ) -> Result<FxHashSet<FileDescriptor>>;

    /// Files reachable from the job's outputs
    fn output_files(
        &self,
        document: &Value,
        evaluator: Option<&dyn ExpressionEvaluator>,
        visible_ports: Option<FxHashSet<String>>,
    ) -> Result<FxHashSet<FileDescriptor>>;

    /// Job document with every input file location rewritten
    fn map_input_paths(&self, document: &Value, mapper: &dyn FilePathMapper) -> Result<Value>;

    /// Job document with every output file location rewritten
    fn map_output_paths(&self, document: &Value, mapper: &dyn FilePathMapper) -> Result<Value>;

    /// Job document with every input file value rebuilt
    fn update_input_files(
        &self,
        document: &Value,
        transformer: &dyn FileTransformer,
    ) -> Result<Value>;

    /// Job document with every output file value rebuilt
    fn update_output_files(
        &self,
        document: &Value,
        transformer: &dyn FileTransformer,
    ) -> Result<Value>;

    /// Native value → canonical value
    fn to_common(&self, native: &Value) -> Result<CommonValue>;

    /// Canonical value → native value
    fn to_specific(&self, common: &CommonValue) -> Result<Value>;
}

/// Every dialect this build knows about
static DIALECTS: &[&dyn Dialect] = &[&crate::dialect::v1::V1Dialect];

/// Look a dialect up by its schema tag
pub fn for_schema(tag: &str) -> Result<&'static dyn Dialect> {
    DIALECTS
        .iter()
        .copied()
        .find(|dialect| dialect.schema_tag() == tag)
        .ok_or_else(|| PlaitError::UnsupportedDialect {
            schema: tag.to_string(),
        })
}

/// Read the document's schema tag and look its dialect up
pub fn detect(document: &Value) -> Result<&'static dyn Dialect> {
    let tag = document
        .get(SCHEMA_KEY)
        .and_then(Value::as_str)
        .ok_or_else(|| PlaitError::UnsupportedDialect {
            schema: "<missing schema tag>".to_string(),
        })?;
    for_schema(tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::v1::SCHEMA_V1;
    use serde_json::json;

    #[test]
    fn registry_resolves_the_v1_tag() {
        let dialect = for_schema(SCHEMA_V1).unwrap();
        assert_eq!(dialect.schema_tag(), SCHEMA_V1);
    }

    #[test]
    fn unknown_tag_is_unsupported() {
        let err = for_schema("plait/pipeline@99").unwrap_err();
        assert_eq!(err.code(), "PLAIT-002");
    }

    #[test]
    fn detect_reads_the_schema_field() {
        let document = json!({ "schema": SCHEMA_V1, "id": "j", "app": { "class": "Tool" } });
        assert!(detect(&document).is_ok());

        let untagged = json!({ "id": "j" });
        assert_eq!(detect(&untagged).unwrap_err().code(), "PLAIT-002");
    }

    #[test]
    fn boundary_errors_wear_the_binding_umbrella() {
        let dialect = for_schema(SCHEMA_V1).unwrap();
        let document = json!({ "schema": SCHEMA_V1, "not": "a job" });
        let err = dialect.translate(&document).unwrap_err();
        assert_eq!(err.code(), "PLAIT-050");
    }
}
