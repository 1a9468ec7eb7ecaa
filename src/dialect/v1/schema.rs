//! Schema interrogation for v1 port declarations
//!
//! Port schemas are loosely shaped: a bare type name, a union list
//! (with `"null"` marking optionality), or a mapping with a `type`
//! key. Translation only needs the broad category.

use serde_json::Value;

use crate::util::constants::PORT_SIGIL;

/// Broad category of a declared port type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    File,
    Array,
    Record,
    Primitive,
    Any,
}

/// Strip the dialect's reference sigil off a port or step id
pub fn normalize_id(id: &str) -> &str {
    id.strip_prefix(PORT_SIGIL).unwrap_or(id)
}

/// Read the broad data type out of a schema fragment
pub fn data_type(schema: &Value) -> DataType {
    match schema {
        Value::String(name) => match name.as_str() {
            "File" => DataType::File,
            "array" => DataType::Array,
            "record" => DataType::Record,
            "Any" | "" => DataType::Any,
            _ => DataType::Primitive,
        },
        // Union: skip the "null" marker, categorize the first real option
        Value::Array(options) => options
            .iter()
            .find(|option| option.as_str() != Some("null"))
            .map(data_type)
            .unwrap_or(DataType::Any),
        Value::Object(fields) => match fields.get("type") {
            Some(inner) => data_type(inner),
            None => DataType::Any,
        },
        _ => DataType::Any,
    }
}

pub fn is_file_schema(schema: &Value) -> bool {
    data_type(schema) == DataType::File
}

pub fn is_array_schema(schema: &Value) -> bool {
    data_type(schema) == DataType::Array
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalize_strips_one_sigil() {
        assert_eq!(normalize_id("#reads"), "reads");
        assert_eq!(normalize_id("reads"), "reads");
        assert_eq!(normalize_id("#align.bam"), "align.bam");
    }

    #[test]
    fn bare_type_names() {
        assert_eq!(data_type(&json!("File")), DataType::File);
        assert_eq!(data_type(&json!("string")), DataType::Primitive);
        assert_eq!(data_type(&json!("Any")), DataType::Any);
    }

    #[test]
    fn unions_skip_the_null_marker() {
        assert_eq!(data_type(&json!(["null", "File"])), DataType::File);
        assert_eq!(data_type(&json!(["null"])), DataType::Any);
    }

    #[test]
    fn mappings_read_the_type_key() {
        assert_eq!(
            data_type(&json!({ "type": "array", "items": "File" })),
            DataType::Array
        );
        assert_eq!(
            data_type(&json!({ "type": "record", "fields": [] })),
            DataType::Record
        );
        assert_eq!(data_type(&json!({ "items": "File" })), DataType::Any);
    }

    #[test]
    fn array_of_files_is_array() {
        let schema = json!({ "type": "array", "items": "File" });
        assert!(is_array_schema(&schema));
        assert!(!is_file_schema(&schema));
    }
}
