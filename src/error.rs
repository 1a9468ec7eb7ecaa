//! Plait Error Types with Error Codes
//!
//! Error code ranges:
//! - PLAIT-000-009: Document errors
//! - PLAIT-010-019: Translation errors
//! - PLAIT-020-029: Graph errors
//! - PLAIT-030-039: Port processing errors
//! - PLAIT-040-049: Value translation errors
//! - PLAIT-050-059: Binding boundary errors
//! - PLAIT-090-099: IO/serde errors

use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlaitError>;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

/// All error variants are part of the public API.
///
/// Implements both `thiserror::Error` for std error compatibility
/// and `miette::Diagnostic` for terminal error display.
#[derive(Error, Debug, Diagnostic)]
pub enum PlaitError {
    // ═══════════════════════════════════════════
    // DOCUMENT ERRORS (000-009)
    // ═══════════════════════════════════════════
    #[error("[PLAIT-001] Failed to parse pipeline document: {details}")]
    #[diagnostic(
        code(plait::parse_error),
        help("Check the document against the dialect's schema")
    )]
    ParseError { details: String },

    #[error("[PLAIT-002] Unsupported dialect schema: '{schema}'")]
    #[diagnostic(
        code(plait::unsupported_dialect),
        help("Use a registered schema tag such as 'plait/pipeline@1'")
    )]
    UnsupportedDialect { schema: String },

    // ═══════════════════════════════════════════
    // TRANSLATION ERRORS (010-019)
    // ═══════════════════════════════════════════
    #[error("[PLAIT-010] Invalid scatter declaration on '{node_id}': {details}")]
    #[diagnostic(
        code(plait::invalid_scatter),
        help("Declare scatter as a port id or a list of port ids")
    )]
    InvalidScatter { node_id: String, details: String },

    #[error("[PLAIT-011] Unknown application class '{class}' on '{node_id}'")]
    #[diagnostic(code(plait::unknown_app_class))]
    UnknownAppClass { node_id: String, class: String },

    #[error("[PLAIT-012] Malformed link endpoint '{reference}': {details}")]
    #[diagnostic(code(plait::malformed_link))]
    MalformedLink { reference: String, details: String },

    // ═══════════════════════════════════════════
    // GRAPH ERRORS (020-029)
    // ═══════════════════════════════════════════
    #[error("[PLAIT-020] Cycle detected in graph: {cycle}")]
    #[diagnostic(
        code(plait::cycle_detected),
        help("Remove circular data links from the pipeline")
    )]
    CycleDetected { cycle: String },

    #[error("[PLAIT-021] Link endpoint '{node_id}{separator}{port_id}' resolves to no port", separator = crate::util::constants::ID_SEPARATOR)]
    #[diagnostic(code(plait::dangling_link))]
    DanglingLink { node_id: String, port_id: String },

    // ═══════════════════════════════════════════
    // PORT PROCESSING ERRORS (030-039)
    // ═══════════════════════════════════════════
    #[error("[PLAIT-030] Processing failed on port '{port}': {source}")]
    #[diagnostic(code(plait::port_processing))]
    PortProcessing {
        port: String,
        #[source]
        source: Box<PlaitError>,
    },

    #[error("[PLAIT-031] Failed to map file path '{path}': {reason}")]
    #[diagnostic(code(plait::file_mapping))]
    FileMapping { path: String, reason: String },

    #[error("[PLAIT-032] Failed to evaluate expression '{expression}': {reason}")]
    #[diagnostic(code(plait::expression_eval))]
    ExpressionEval { expression: String, reason: String },

    // ═══════════════════════════════════════════
    // VALUE TRANSLATION ERRORS (040-049)
    // ═══════════════════════════════════════════
    #[error("[PLAIT-040] Cannot translate value: {details}")]
    #[diagnostic(code(plait::value_translation))]
    ValueTranslation { details: String },

    // ═══════════════════════════════════════════
    // BINDING BOUNDARY (050-059)
    // ═══════════════════════════════════════════
    #[error("[PLAIT-050] Binding operation failed: {source}")]
    #[diagnostic(code(plait::binding))]
    Binding {
        #[source]
        source: Box<PlaitError>,
    },

    // ═══════════════════════════════════════════
    // IO / SERDE ERRORS (090-099)
    // ═══════════════════════════════════════════
    #[error("[PLAIT-090] IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("[PLAIT-091] JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("[PLAIT-092] YAML parse error: {0}")]
    #[diagnostic(
        code(plait::yaml_parse),
        help("Check YAML syntax: indentation and quoting")
    )]
    Yaml(#[from] serde_yaml::Error),
}

impl PlaitError {
    /// Get the error code (e.g., "PLAIT-001")
    pub fn code(&self) -> &'static str {
        match self {
            Self::ParseError { .. } => "PLAIT-001",
            Self::UnsupportedDialect { .. } => "PLAIT-002",
            Self::InvalidScatter { .. } => "PLAIT-010",
            Self::UnknownAppClass { .. } => "PLAIT-011",
            Self::MalformedLink { .. } => "PLAIT-012",
            Self::CycleDetected { .. } => "PLAIT-020",
            Self::DanglingLink { .. } => "PLAIT-021",
            Self::PortProcessing { .. } => "PLAIT-030",
            Self::FileMapping { .. } => "PLAIT-031",
            Self::ExpressionEval { .. } => "PLAIT-032",
            Self::ValueTranslation { .. } => "PLAIT-040",
            Self::Binding { .. } => "PLAIT-050",
            Self::Io(_) => "PLAIT-090",
            Self::Json(_) => "PLAIT-091",
            Self::Yaml(_) => "PLAIT-092",
        }
    }

    /// Check if the failure may succeed on a retry by the caller.
    ///
    /// Nothing is retried inside the core; this only classifies the
    /// injected collaborators' failures for execution layers.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::FileMapping { .. } | Self::ExpressionEval { .. } => true,
            Self::PortProcessing { source, .. } | Self::Binding { source } => {
                source.is_recoverable()
            }
            _ => false,
        }
    }

    /// Wrap any error into the binding umbrella surfaced at the
    /// protocol boundary. Already-wrapped errors pass through.
    pub fn into_binding(self) -> PlaitError {
        match self {
            err @ Self::Binding { .. } => err,
            err => Self::Binding {
                source: Box::new(err),
            },
        }
    }
}

impl FixSuggestion for PlaitError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            PlaitError::ParseError { .. } => {
                Some("Check the document against the dialect's schema")
            }
            PlaitError::UnsupportedDialect { .. } => {
                Some("Use a registered schema tag such as 'plait/pipeline@1'")
            }
            PlaitError::InvalidScatter { .. } => {
                Some("Declare scatter as a port id or a list of port ids")
            }
            PlaitError::UnknownAppClass { .. } => {
                Some("Application class must be 'Tool' or 'Pipeline'")
            }
            PlaitError::MalformedLink { .. } => {
                Some("Link endpoints are '#port' or '#step.port' references")
            }
            PlaitError::CycleDetected { .. } => {
                Some("Remove circular data links from the pipeline")
            }
            PlaitError::DanglingLink { .. } => {
                Some("Check that both link endpoints name declared ports")
            }
            PlaitError::PortProcessing { .. } => {
                Some("Check the port's value shape and the injected callbacks")
            }
            PlaitError::FileMapping { .. } => {
                Some("Check the path mapper configuration for this job")
            }
            PlaitError::ExpressionEval { .. } => {
                Some("Check the secondary-file expression and the evaluator")
            }
            PlaitError::ValueTranslation { .. } => {
                Some("File-objects need a 'class: File' discriminator and a path")
            }
            PlaitError::Binding { .. } => None,
            PlaitError::Io(_) => Some("Check file path and permissions"),
            PlaitError::Json(_) => Some("Check JSON syntax"),
            PlaitError::Yaml(_) => Some("Check YAML syntax: indentation and quoting"),
        }
    }
}
