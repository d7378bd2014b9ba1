//! Error types for Draftpulse
//!
//! Missing telemetry, rate limiting and malformed writer profiles are not
//! errors: they degrade to sentinel values, declined decisions and "no
//! profile" respectively. `CoreError` covers what remains.

use thiserror::Error;

/// Errors that can surface from the core or its collaborators
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Failed to parse input: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Collaborator failure: {0}")]
    Collaborator(String),
}

impl CoreError {
    /// Shorthand for a lookup failure
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Whether this error is a lookup failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = CoreError::not_found("intervention", "abc-123");
        assert_eq!(err.to_string(), "intervention not found: abc-123");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_json_error_conversion() {
        let parsed: Result<serde_json::Value, _> = serde_json::from_str("{nope");
        let err: CoreError = parsed.unwrap_err().into();
        assert!(matches!(err, CoreError::JsonError(_)));
        assert!(!err.is_not_found());
    }
}
