//! File-update callback - materializes transformed file values
//!
//! After a job runs, the execution layer knows where each produced
//! file actually lives (and its size/checksum). This callback rebuilds
//! every file-object through an injected transformer, which returns a
//! fresh descriptor rather than mutating the one it was given.

use serde_json::{Map, Value};

use crate::error::Result;
use crate::model::FileDescriptor;

use super::{AppPort, CallbackResult, PortCallback};

/// Produces the replacement descriptor for one file value
pub trait FileTransformer {
    fn transform(&self, file: FileDescriptor) -> Result<FileDescriptor>;
}

impl<F> FileTransformer for F
where
    F: Fn(FileDescriptor) -> Result<FileDescriptor>,
{
    fn transform(&self, file: FileDescriptor) -> Result<FileDescriptor> {
        self(file)
    }
}

/// Callback replacing every file-object with its transformed form
pub struct FileUpdateCallback<'a> {
    transformer: &'a dyn FileTransformer,
}

impl<'a> FileUpdateCallback<'a> {
    pub fn new(transformer: &'a dyn FileTransformer) -> Self {
        Self { transformer }
    }
}

impl<P: AppPort> PortCallback<P> for FileUpdateCallback<'_> {
    fn process(&mut self, file_object: Map<String, Value>, _port: &P) -> Result<CallbackResult> {
        let descriptor = FileDescriptor::from_object(&file_object)?;
        let transformed = self.transformer.transform(descriptor)?;
        Ok(CallbackResult::processed(Value::Object(
            transformed.to_object(),
        )))
    }
}
