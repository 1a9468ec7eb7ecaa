//! File-discovery callback - collects every file reachable from a
//! job's values, deriving secondary files along the way
//!
//! One instance accumulates per job; construct a fresh callback for
//! every invocation and never share one across concurrent jobs.

use rustc_hash::FxHashSet;
use serde_json::{Map, Value};

use crate::error::{PlaitError, Result};
use crate::model::FileDescriptor;
use crate::util::constants::FILE_SECONDARY_KEY;

use super::secondary::{apply_suffix, derived_name, is_expression};
use super::{AppPort, CallbackResult, PortCallback};

/// Resolves an expression-form secondary-file rule against the current
/// value. The per-job context belongs to the evaluator instance.
pub trait ExpressionEvaluator {
    fn evaluate(&self, value: &Value, expression: &str) -> Result<String>;
}

impl<F> ExpressionEvaluator for F
where
    F: Fn(&Value, &str) -> Result<String>,
{
    fn evaluate(&self, value: &Value, expression: &str) -> Result<String> {
        self(value, expression)
    }
}

/// Callback collecting the set of top-level [`FileDescriptor`]s seen
/// while walking a job's values.
pub struct FileDiscovery<'a> {
    evaluator: Option<&'a dyn ExpressionEvaluator>,
    /// Normalized port ids to include; `None` admits every port
    visible_ports: Option<FxHashSet<String>>,
    derive_secondary_files: bool,
    files: FxHashSet<FileDescriptor>,
}

impl<'a> FileDiscovery<'a> {
    pub fn new(
        evaluator: Option<&'a dyn ExpressionEvaluator>,
        visible_ports: Option<FxHashSet<String>>,
        derive_secondary_files: bool,
    ) -> Self {
        Self {
            evaluator,
            visible_ports,
            derive_secondary_files,
            files: FxHashSet::default(),
        }
    }

    /// Files collected so far, queried after processing completes
    pub fn files(&self) -> &FxHashSet<FileDescriptor> {
        &self.files
    }

    pub fn into_files(self) -> FxHashSet<FileDescriptor> {
        self.files
    }

    fn skip(&self, port_id: &str) -> bool {
        self.visible_ports
            .as_ref()
            .is_some_and(|visible| !visible.contains(port_id))
    }

    fn derive_secondaries<P: AppPort>(
        &self,
        file_object: &Map<String, Value>,
        descriptor: &FileDescriptor,
        port: &P,
    ) -> Result<Vec<FileDescriptor>> {
        let Some(rules) = port.secondary_file_rules() else {
            return Ok(Vec::new());
        };
        let value = Value::Object(file_object.clone());
        let mut secondaries = Vec::with_capacity(rules.len());
        for rule in rules {
            let path = if is_expression(rule) {
                let evaluator =
                    self.evaluator
                        .ok_or_else(|| PlaitError::ExpressionEval {
                            expression: rule.clone(),
                            reason: "no expression evaluator configured".to_string(),
                        })?;
                evaluator.evaluate(&value, rule)?
            } else {
                apply_suffix(&descriptor.path, rule)
            };
            let mut secondary = FileDescriptor::new(path);
            secondary.name = derived_name(&secondary.path);
            secondaries.push(secondary);
        }
        Ok(secondaries)
    }
}

impl<P: AppPort> PortCallback<P> for FileDiscovery<'_> {
    fn process(&mut self, file_object: Map<String, Value>, port: &P) -> Result<CallbackResult> {
        if self.skip(port.id()) {
            return Ok(CallbackResult::untouched(Value::Object(file_object)));
        }

        let mut descriptor = FileDescriptor::from_object(&file_object)?;

        let has_explicit_secondaries = file_object
            .get(FILE_SECONDARY_KEY)
            .and_then(Value::as_array)
            .is_some();
        if !has_explicit_secondaries && self.derive_secondary_files {
            let secondaries = self.derive_secondaries(&file_object, &descriptor, port)?;
            if !secondaries.is_empty() {
                descriptor = descriptor.with_secondary_files(secondaries);
            }
        }
        // Explicit secondaryFiles were already converted verbatim by
        // the descriptor deserialization.

        self.files.insert(descriptor);
        Ok(CallbackResult::processed(Value::Object(file_object)))
    }
}
