//! Structured errors for front-ends
//!
//! Errors never crash the system. They are values that propagate through
//! function calls and carry a machine-readable code plus a hint.

use crate::MatrixError;
use serde::{Deserialize, Serialize};

/// Standard error codes (machine-readable)
pub mod codes {
    pub const INVALID_SHAPE: &str = "INVALID_SHAPE";
    pub const INVALID_ROW_INDEX: &str = "INVALID_ROW_INDEX";
    pub const DIMENSION_MISMATCH: &str = "DIMENSION_MISMATCH";
    pub const NOT_A_VECTOR: &str = "NOT_A_VECTOR";
    pub const WRONG_DIMENSION: &str = "WRONG_DIMENSION";
    pub const ZERO_VECTOR: &str = "ZERO_VECTOR";
    pub const UNDEFINED_FUNC: &str = "UNDEFINED_FUNC";
    pub const ARG_COUNT: &str = "ARG_COUNT";
    pub const ARG_TYPE: &str = "ARG_TYPE";
    pub const DOMAIN_ERROR: &str = "DOMAIN_ERROR";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Severity level of an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// This call failed
    Error,
    /// Defect in the engine itself
    Fatal,
}

/// Structured error returned by registry functions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EchelonError {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    /// Propagation notes
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub notes: Vec<String>,

    /// Severity level
    pub severity: Severity,
}

impl EchelonError {
    /// Create a new error
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            suggestion: None,
            notes: Vec::new(),
            severity: Severity::Error,
        }
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Builder: add propagation note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Builder: set severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    // ========== Common Error Constructors ==========

    pub fn undefined_func(name: &str) -> Self {
        Self::new(codes::UNDEFINED_FUNC, format!("Unknown function: {}", name))
            .with_suggestion("Use help() to list available functions")
    }

    pub fn arg_count(func: &str, expected: usize, got: usize) -> Self {
        Self::new(
            codes::ARG_COUNT,
            format!("{}() expects {} arguments, got {}", func, expected, got),
        )
        .with_suggestion(format!("Use help('{}') for usage", func))
    }

    pub fn arg_type(func: &str, arg: &str, expected: &str, got: &str) -> Self {
        Self::new(
            codes::ARG_TYPE,
            format!("{}() argument '{}': expected {}, got {}", func, arg, expected, got),
        )
    }

    pub fn domain_error(details: impl Into<String>) -> Self {
        Self::new(codes::DOMAIN_ERROR, format!("Domain error: {}", details.into()))
    }

    pub fn internal(details: impl Into<String>) -> Self {
        Self::new(codes::INTERNAL, format!("Internal error: {}", details.into()))
            .with_suggestion("This is a bug, please report it")
            .with_severity(Severity::Fatal)
    }
}

impl std::fmt::Display for EchelonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for EchelonError {}

impl From<MatrixError> for EchelonError {
    fn from(err: MatrixError) -> Self {
        let message = err.to_string();
        match err {
            MatrixError::InvalidShape { .. } => Self::new(codes::INVALID_SHAPE, message)
                .with_suggestion("rows and columns must be at least 1 and match the value count"),
            MatrixError::InvalidRowIndex { rows, .. } => Self::new(codes::INVALID_ROW_INDEX, message)
                .with_suggestion(format!("Row indexes start at 0 and must be below {}", rows)),
            MatrixError::DimensionMismatch { .. } => Self::new(codes::DIMENSION_MISMATCH, message),
            MatrixError::NotAVector { .. } => Self::new(codes::NOT_A_VECTOR, message)
                .with_suggestion("Use vector(...) to build an n×1 matrix"),
            MatrixError::WrongDimension { .. } => Self::new(codes::WRONG_DIMENSION, message),
            MatrixError::ZeroVector { .. } => Self::new(codes::ZERO_VECTOR, message)
                .with_suggestion("Use a vector with nonzero length"),
        }
    }
}
