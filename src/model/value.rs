//! Canonical value representation
//!
//! The dialect-agnostic shape every value translator converts to and
//! from. The walker-facing native representation stays `serde_json`;
//! this tagged variant is what the graph's default-value fields and
//! downstream consumers see.

use std::collections::BTreeMap;

use serde::Serialize;

use super::file::FileDescriptor;

/// A value flowing through a port, in canonical form
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CommonValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Sequence(Vec<CommonValue>),
    Record(BTreeMap<String, CommonValue>),
    File(FileDescriptor),
}

impl CommonValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CommonValue::Null)
    }

    pub fn as_file(&self) -> Option<&FileDescriptor> {
        match self {
            CommonValue::File(fd) => Some(fd),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[CommonValue]> {
        match self {
            CommonValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Short name of the variant, for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            CommonValue::Null => "null",
            CommonValue::Bool(_) => "bool",
            CommonValue::Integer(_) => "integer",
            CommonValue::Float(_) => "float",
            CommonValue::Text(_) => "text",
            CommonValue::Sequence(_) => "sequence",
            CommonValue::Record(_) => "record",
            CommonValue::File(_) => "file",
        }
    }
}

impl From<FileDescriptor> for CommonValue {
    fn from(fd: FileDescriptor) -> Self {
        CommonValue::File(fd)
    }
}
