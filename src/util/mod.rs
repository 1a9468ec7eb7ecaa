//! Utility module - reserved identifier characters and format keys

pub mod constants;
