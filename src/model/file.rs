//! File descriptors - canonical representation of file-typed values
//!
//! A descriptor is created fresh every time the value processor meets a
//! file-typed leaf and is never mutated in place: transformations build
//! new descriptors (copy-on-write).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{PlaitError, Result};

/// A file reachable from a job's inputs or outputs.
///
/// Serializes as the canonical file-object: a mapping carrying the
/// `"class": "File"` discriminator and camelCase keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "class", rename = "File", rename_all = "camelCase")]
pub struct FileDescriptor {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    /// Companion files, in rule order. Owned, never shared.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub secondary_files: Vec<FileDescriptor>,
}

impl FileDescriptor {
    /// Bare descriptor for a path, no metadata
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: None,
            size: None,
            checksum: None,
            secondary_files: Vec::new(),
        }
    }

    /// Copy with a replaced secondary-file list
    pub fn with_secondary_files(&self, secondary_files: Vec<FileDescriptor>) -> Self {
        Self {
            secondary_files,
            ..self.clone()
        }
    }

    /// Build a descriptor from a file-object mapping.
    ///
    /// Unknown keys are ignored; a missing path or discriminator fails.
    pub fn from_object(object: &Map<String, Value>) -> Result<Self> {
        serde_json::from_value(Value::Object(object.clone())).map_err(|e| {
            PlaitError::ValueTranslation {
                details: e.to_string(),
            }
        })
    }

    /// Render the descriptor back into its file-object mapping
    pub fn to_object(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            // A struct with named fields always serializes as an object
            _ => Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_class_discriminator() {
        let fd = FileDescriptor::new("/data/sample.bam");
        let value = serde_json::to_value(&fd).unwrap();
        assert_eq!(value["class"], "File");
        assert_eq!(value["path"], "/data/sample.bam");
        assert!(value.get("secondaryFiles").is_none());
    }

    #[test]
    fn from_object_reads_camel_case_keys() {
        let value = json!({
            "class": "File",
            "path": "/data/sample.bam",
            "size": 1024,
            "checksum": "sha1$abc",
            "secondaryFiles": [
                { "class": "File", "path": "/data/sample.bam.bai" }
            ]
        });
        let fd = FileDescriptor::from_object(value.as_object().unwrap()).unwrap();
        assert_eq!(fd.size, Some(1024));
        assert_eq!(fd.secondary_files.len(), 1);
        assert_eq!(fd.secondary_files[0].path, "/data/sample.bam.bai");
    }

    #[test]
    fn from_object_rejects_missing_path() {
        let value = json!({ "class": "File", "size": 3 });
        let err = FileDescriptor::from_object(value.as_object().unwrap()).unwrap_err();
        assert_eq!(err.code(), "PLAIT-040");
    }

    #[test]
    fn with_secondary_files_leaves_original_untouched() {
        let fd = FileDescriptor::new("/a/b.txt");
        let derived = fd.with_secondary_files(vec![FileDescriptor::new("/a/b.txt.idx")]);
        assert!(fd.secondary_files.is_empty());
        assert_eq!(derived.secondary_files.len(), 1);
        assert_eq!(derived.path, fd.path);
    }

    #[test]
    fn object_round_trip() {
        let fd = FileDescriptor {
            path: "/data/x.fq".to_string(),
            name: Some("x.fq".to_string()),
            size: Some(42),
            checksum: None,
            secondary_files: vec![FileDescriptor::new("/data/x.fq.idx")],
        };
        let back = FileDescriptor::from_object(&fd.to_object()).unwrap();
        assert_eq!(back, fd);
    }
}
