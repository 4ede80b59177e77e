//! Unified Error Type System
//!
//! Centralized error types for the crate outside the rewrite core.
//!
//! ## Error Boundaries
//!
//! - **Core** (catalog, engine, composer): never fails. Rewrite problems are
//!   reported as [`RewriteError`] and absorbed by the engine.
//! - **Edges** (config, store, scanner, CLI): return [`OptError`].
//!
//! Request validation is structured ([`ValidationError`]) so callers can point
//! at the offending field.

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Structured validation error with context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// What validation failed
    pub kind: ValidationErrorKind,
    /// Field that failed validation
    pub field: Option<String>,
    /// Detailed message
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(field) = &self.field {
            write!(f, "Validation failed for '{}': {}", field, self.message)
        } else {
            write!(f, "Validation failed: {}", self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            field: None,
            message: message.into(),
        }
    }

    /// Add field context
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Shorthand for a missing or empty required field
    pub fn missing(field: impl Into<String>) -> Self {
        let field = field.into();
        Self::new(
            ValidationErrorKind::MissingField,
            format!("'{}' must not be empty", field),
        )
        .with_field(field)
    }
}

/// Validation error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Required field missing or empty
    MissingField,
    /// Invalid format or unknown enum value
    Format,
    /// Value out of range
    Range,
}

// =============================================================================
// Rewrite Error
// =============================================================================

/// Failure of a single rule rewrite.
///
/// Only the rewrite engine sees these; it logs them and falls back to the
/// original source.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RewriteError {
    #[error("pattern '{0}' failed to compile")]
    PatternUnavailable(&'static str),

    #[error("rule '{0}' found nothing to rewrite")]
    NoMatch(&'static str),

    #[error("unbalanced braces after offset {0}")]
    UnbalancedBraces(usize),

    #[error("invalid identifier pattern: {0}")]
    InvalidPattern(String),
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum OptError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    #[error("{0}")]
    Validation(ValidationError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Unsupported file {path}: {reason}")]
    UnsupportedFile { path: String, reason: String },

    #[error("Store error: {0}")]
    Store(String),
}

impl From<ValidationError> for OptError {
    fn from(err: ValidationError) -> Self {
        OptError::Validation(err)
    }
}

pub type Result<T> = std::result::Result<T, OptError>;

impl OptError {
    pub fn unsupported_file(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedFile {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether the CLI may skip the offending input and continue with the rest
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::UnsupportedFile { .. } | Self::Io(_)
        )
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::missing("code");
        assert_eq!(err.kind, ValidationErrorKind::MissingField);
        assert_eq!(
            err.to_string(),
            "Validation failed for 'code': 'code' must not be empty"
        );

        let bare = ValidationError::new(ValidationErrorKind::Range, "too large");
        assert_eq!(bare.to_string(), "Validation failed: too large");
    }

    #[test]
    fn test_rewrite_error_display() {
        assert_eq!(
            RewriteError::NoMatch("js-inner-html").to_string(),
            "rule 'js-inner-html' found nothing to rewrite"
        );
        assert_eq!(
            RewriteError::UnbalancedBraces(12).to_string(),
            "unbalanced braces after offset 12"
        );
    }

    #[test]
    fn test_opt_error_from_validation() {
        let err: OptError = ValidationError::missing("filename").into();
        assert!(matches!(err, OptError::Validation(_)));
        assert!(err.is_skippable());
        assert!(!OptError::Config("bad".into()).is_skippable());
    }
}
