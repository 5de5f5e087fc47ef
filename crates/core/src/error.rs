//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// These are deterministic business failures. Callers in the service layer are
/// expected to translate them into user-facing errors; the domain never
/// swallows them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation at construction time (e.g. a zero quantity).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A business rule was breached by the requested operation.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A conflict occurred (e.g. stale version / optimistic concurrency).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// True for the business-rule channel (as opposed to malformed input).
    pub fn is_rule_violation(&self) -> bool {
        matches!(self, Self::InvariantViolation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_the_message() {
        let err = DomainError::invariant("maximum of 15 units per product");
        assert_eq!(
            err.to_string(),
            "invariant violated: maximum of 15 units per product"
        );
        assert!(err.is_rule_violation());
        assert!(!DomainError::validation("bad").is_rule_violation());
    }
}
