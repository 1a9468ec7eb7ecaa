//! Path-mapping callback - rewrites file locations through an
//! injected mapping function
//!
//! Pure path algebra: the mapper receives the current location and a
//! per-job configuration mapping and returns the rewritten location.
//! Nothing here touches the filesystem.

use serde_json::{Map, Value};

use crate::error::Result;
use crate::util::constants::{FILE_PATH_KEY, FILE_SECONDARY_KEY};

use super::{AppPort, CallbackResult, PortCallback};

/// Rewrites one file location. Fails with `PlaitError::FileMapping`.
pub trait FilePathMapper {
    fn map(&self, path: &str, config: &Map<String, Value>) -> Result<String>;
}

impl<F> FilePathMapper for F
where
    F: Fn(&str, &Map<String, Value>) -> Result<String>,
{
    fn map(&self, path: &str, config: &Map<String, Value>) -> Result<String> {
        self(path, config)
    }
}

/// Callback applying a [`FilePathMapper`] to every file-object and all
/// of its secondary files.
///
/// With no mapper configured, or on file-objects without a resolvable
/// path, the value passes through untouched.
pub struct FilePathMapCallback<'a> {
    mapper: Option<&'a dyn FilePathMapper>,
    config: Map<String, Value>,
}

impl<'a> FilePathMapCallback<'a> {
    pub fn new(mapper: &'a dyn FilePathMapper, config: Map<String, Value>) -> Self {
        Self {
            mapper: Some(mapper),
            config,
        }
    }

    /// A callback that maps nothing and passes every value through
    pub fn disabled() -> Self {
        Self {
            mapper: None,
            config: Map::new(),
        }
    }

    fn map_paths(&self, object: &mut Map<String, Value>) -> Result<()> {
        let Some(mapper) = self.mapper else {
            return Ok(());
        };
        if let Some(path) = object.get(FILE_PATH_KEY).and_then(Value::as_str) {
            let mapped = mapper.map(path, &self.config)?;
            object.insert(FILE_PATH_KEY.to_string(), Value::String(mapped));
        }
        if let Some(Value::Array(secondaries)) = object.get_mut(FILE_SECONDARY_KEY) {
            for secondary in secondaries {
                if let Value::Object(secondary) = secondary {
                    self.map_paths(secondary)?;
                }
            }
        }
        Ok(())
    }
}

impl<P: AppPort> PortCallback<P> for FilePathMapCallback<'_> {
    fn process(&mut self, mut file_object: Map<String, Value>, _port: &P) -> Result<CallbackResult> {
        let has_path = file_object
            .get(FILE_PATH_KEY)
            .and_then(Value::as_str)
            .is_some();
        if self.mapper.is_none() || !has_path {
            return Ok(CallbackResult::untouched(Value::Object(file_object)));
        }
        self.map_paths(&mut file_object)?;
        Ok(CallbackResult::processed(Value::Object(file_object)))
    }
}
