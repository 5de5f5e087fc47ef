//! Recoverable validation outcomes.
//!
//! Unlike [`DomainError`](crate::DomainError), a `ValidationResult` is an
//! expected answer to "is this acceptable?": the caller inspects it and decides
//! what to do. An empty result is a valid one.

use serde::{Deserialize, Serialize};

/// One named failure: which field was rejected, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFailure {
    pub field: String,
    pub message: String,
}

impl ValidationFailure {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl core::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Collection of failures; valid when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    failures: Vec<ValidationFailure>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failures(&self) -> &[ValidationFailure] {
        &self.failures
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.failures.push(ValidationFailure::new(field, message));
    }

    /// Records a failure when `condition` does not hold.
    pub fn ensure(&mut self, condition: bool, field: &str, message: &str) {
        if !condition {
            self.push(field, message);
        }
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.failures.iter().map(|f| f.message.as_str())
    }
}

impl FromIterator<ValidationFailure> for ValidationResult {
    fn from_iter<I: IntoIterator<Item = ValidationFailure>>(iter: I) -> Self {
        Self {
            failures: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_result_is_valid() {
        let result = ValidationResult::valid();
        assert!(result.is_valid());
        assert!(result.failures().is_empty());
    }

    #[test]
    fn ensure_collects_every_failed_condition() {
        let mut result = ValidationResult::valid();
        result.ensure(true, "code", "never recorded");
        result.ensure(false, "code", "voucher has no valid code");
        result.ensure(false, "used", "voucher has already been used");

        assert!(!result.is_valid());
        assert_eq!(result.failures().len(), 2);
        assert_eq!(
            result.messages().collect::<Vec<_>>(),
            vec!["voucher has no valid code", "voucher has already been used"]
        );
        assert_eq!(result.failures()[0].to_string(), "code: voucher has no valid code");
    }
}
