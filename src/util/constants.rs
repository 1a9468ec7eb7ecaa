//! Centralized constants for the canonical graph and value formats
//!
//! Reserved identifier characters and file-object keys in one place.

// ═══════════════════════════════════════════════════════════════
// Identifier format
// ═══════════════════════════════════════════════════════════════

/// Separator joining the segments of a hierarchical node identifier
pub const ID_SEPARATOR: char = '.';

/// Sigil prefix dialects put in front of port references
pub const PORT_SIGIL: char = '#';

// ═══════════════════════════════════════════════════════════════
// Canonical file-object keys
// ═══════════════════════════════════════════════════════════════

/// Discriminator key marking a mapping as a file-object
pub const FILE_CLASS_KEY: &str = "class";

/// Discriminator value marking a mapping as a file-object
pub const FILE_CLASS_VALUE: &str = "File";

/// Location of the file
pub const FILE_PATH_KEY: &str = "path";

/// Companion files attached to a file-object
pub const FILE_SECONDARY_KEY: &str = "secondaryFiles";

// ═══════════════════════════════════════════════════════════════
// Document format
// ═══════════════════════════════════════════════════════════════

/// Top-level key carrying the dialect schema tag of a document
pub const SCHEMA_KEY: &str = "schema";
