//! Dialects - one module per incompatible pipeline schema version

pub mod v1;
