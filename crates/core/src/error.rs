//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Deterministic business failures only. Storage failures are modelled in the
/// infrastructure layer.
///
/// The payload is the client-facing message; `Display` renders it verbatim so
/// the HTTP boundary can return it as-is.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (malformed input, unknown reference data).
    #[error("{0}")]
    Validation(String),

    /// An identifier could not be parsed.
    #[error("{0}")]
    InvalidId(String),

    /// A requested resource does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The resource already exists.
    #[error("{0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// The message carried by any variant.
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(m) | Self::InvalidId(m) | Self::NotFound(m) | Self::Conflict(m) => m,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_bare_message() {
        let err = DomainError::not_found("account not found");
        assert_eq!(err.to_string(), "account not found");
        assert_eq!(err.message(), "account not found");
    }
}
