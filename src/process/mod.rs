//! Structural Value Processor - generic walker over nested port values
//!
//! Walks a job's per-port values without assuming any fixed schema:
//! scalars pass through, sequences and mappings are recursed into
//! structurally, and file-objects (mappings carrying the reserved
//! `"class": "File"` discriminator) are deep-cloned and handed to a
//! pluggable callback together with the owning port declaration.
//!
//! The walker never mutates its input. Every callback failure aborts
//! the whole call wrapped as `PlaitError::PortProcessing`; partial
//! results from already-processed siblings are discarded.

pub mod discover;
pub mod path_map;
pub mod secondary;
pub mod update;

use serde_json::{Map, Value};
use tracing::trace;

use crate::error::{PlaitError, Result};
use crate::util::constants::{FILE_CLASS_KEY, FILE_CLASS_VALUE};

pub use discover::{ExpressionEvaluator, FileDiscovery};
pub use path_map::{FilePathMapCallback, FilePathMapper};
pub use update::{FileTransformer, FileUpdateCallback};

/// Read-only view of an application's port declaration.
///
/// Keeps the walker and its callbacks free of any dialect document
/// type: a dialect only has to expose the port id, the two schema
/// predicates, and the binding's secondary-file rules.
pub trait AppPort {
    /// Normalized port id
    fn id(&self) -> &str;

    /// True when the declared schema is an array type
    fn is_array(&self) -> bool;

    /// True when the declared schema is a file type
    fn is_file(&self) -> bool;

    /// Secondary-file suffix rules declared by the port's binding
    fn secondary_file_rules(&self) -> Option<&[String]>;
}

/// What a callback did with one file-object
#[derive(Debug)]
pub struct CallbackResult {
    pub value: Value,
    pub processed: bool,
}

impl CallbackResult {
    pub fn processed(value: Value) -> Self {
        Self {
            value,
            processed: true,
        }
    }

    pub fn untouched(value: Value) -> Self {
        Self {
            value,
            processed: false,
        }
    }
}

/// A transformation applied to every file-typed leaf of a value tree.
///
/// The callback receives an owned deep copy of the file-object, so it
/// may mutate freely; the caller's original structure stays intact
/// even when the callback fails partway through a job.
pub trait PortCallback<P: AppPort> {
    fn process(&mut self, file_object: Map<String, Value>, port: &P) -> Result<CallbackResult>;
}

/// True when the value is a mapping carrying the file discriminator
pub fn is_file_object(value: &Value) -> bool {
    value
        .as_object()
        .and_then(|object| object.get(FILE_CLASS_KEY))
        .and_then(Value::as_str)
        == Some(FILE_CLASS_VALUE)
}

/// Walk every port's value, applying `callback` to each file-typed
/// leaf, and return the re-assembled value map.
///
/// Entries with no matching port declaration pass through unchanged;
/// order of keys is preserved.
pub fn process<P, C>(
    values: &Map<String, Value>,
    ports: &[P],
    callback: &mut C,
) -> Result<Map<String, Value>>
where
    P: AppPort,
    C: PortCallback<P>,
{
    let mut out = Map::with_capacity(values.len());
    for (key, value) in values {
        let port = ports.iter().find(|port| port.id() == key.as_str());
        let processed = match port {
            Some(port) => process_value(value, port, callback)?,
            None => value.clone(),
        };
        out.insert(key.clone(), processed);
    }
    Ok(out)
}

fn process_value<P, C>(value: &Value, port: &P, callback: &mut C) -> Result<Value>
where
    P: AppPort,
    C: PortCallback<P>,
{
    if is_file_object(value) {
        trace!(port = port.id(), "visiting file-object");
        // The callback gets its own deep copy; the input stays intact.
        let clone = value
            .as_object()
            .cloned()
            .unwrap_or_default();
        let result = callback
            .process(clone, port)
            .map_err(|source| PlaitError::PortProcessing {
                port: port.id().to_string(),
                source: Box::new(source),
            })?;
        return Ok(result.value);
    }

    match value {
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(process_value(item, port, callback)?);
            }
            Ok(Value::Array(out))
        }
        Value::Object(fields) => {
            let mut out = Map::with_capacity(fields.len());
            for (key, field) in fields {
                out.insert(key.clone(), process_value(field, port, callback)?);
            }
            Ok(Value::Object(out))
        }
        other => Ok(other.clone()),
    }
}
