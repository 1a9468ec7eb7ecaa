//! Value translation between the v1 native shape and the canonical
//! representation
//!
//! Lossless both ways for every value a v1 document can produce:
//! scalars, sequences, records, and file-objects.

use std::collections::BTreeMap;

use serde_json::{Map, Number, Value};

use crate::error::{PlaitError, Result};
use crate::model::{CommonValue, FileDescriptor};
use crate::process::is_file_object;

/// Native value → canonical value
pub fn to_common(native: &Value) -> Result<CommonValue> {
    if is_file_object(native) {
        let object = native
            .as_object()
            .ok_or_else(|| PlaitError::ValueTranslation {
                details: "file-object is not a mapping".to_string(),
            })?;
        return Ok(CommonValue::File(FileDescriptor::from_object(object)?));
    }

    Ok(match native {
        Value::Null => CommonValue::Null,
        Value::Bool(b) => CommonValue::Bool(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => CommonValue::Integer(i),
            None => CommonValue::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => CommonValue::Text(s.clone()),
        Value::Array(items) => {
            let mut sequence = Vec::with_capacity(items.len());
            for item in items {
                sequence.push(to_common(item)?);
            }
            CommonValue::Sequence(sequence)
        }
        Value::Object(fields) => {
            let mut record = BTreeMap::new();
            for (key, field) in fields {
                record.insert(key.clone(), to_common(field)?);
            }
            CommonValue::Record(record)
        }
    })
}

/// Canonical value → native value
pub fn to_specific(common: &CommonValue) -> Value {
    match common {
        CommonValue::Null => Value::Null,
        CommonValue::Bool(b) => Value::Bool(*b),
        CommonValue::Integer(i) => Value::Number(Number::from(*i)),
        CommonValue::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
        CommonValue::Text(s) => Value::String(s.clone()),
        CommonValue::Sequence(items) => Value::Array(items.iter().map(to_specific).collect()),
        CommonValue::Record(fields) => Value::Object(
            fields
                .iter()
                .map(|(key, field)| (key.clone(), to_specific(field)))
                .collect(),
        ),
        CommonValue::File(fd) => Value::Object(fd.to_object()),
    }
}

/// Translate a whole value map, keyed as supplied
pub fn map_to_common(values: &Map<String, Value>) -> Result<BTreeMap<String, CommonValue>> {
    let mut out = BTreeMap::new();
    for (key, value) in values {
        out.insert(key.clone(), to_common(value)?);
    }
    Ok(out)
}
