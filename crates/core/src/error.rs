//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic failures of raw page or catalog input.
/// Network and UI concerns belong to the storefront crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. blank SKU).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A page attribute could not be decoded.
    #[error("invalid attribute `{name}`: {reason}")]
    InvalidAttribute { name: &'static str, reason: String },
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_attribute(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidAttribute {
            name,
            reason: reason.into(),
        }
    }
}
