//! Domain-level error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure category carried by every [`DomainError`].
///
/// Adapters branch on this instead of inspecting the concrete error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Input broke a value-object constraint or a status-transition rule.
    Invalid,
    /// The referenced post, tag or user does not exist.
    NotFound,
    /// A uniqueness constraint was violated.
    Conflict,
    /// Caller identity is missing or invalid.
    Unauthorized,
    /// Unexpected collaborator failure.
    Internal,
}

/// Domain errors - business logic failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DomainError {
    kind: ErrorKind,
    message: String,
}

impl DomainError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Invalid, message)
    }

    pub fn not_found(entity_type: &'static str, id: impl std::fmt::Display) -> Self {
        Self::new(
            ErrorKind::NotFound,
            format!("{entity_type} with id {id} not found"),
        )
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_invalid(&self) -> bool {
        self.kind == ErrorKind::Invalid
    }
}

/// Repository-level errors.
#[derive(Debug, Clone, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl RepoError {
    /// Wrap a store failure with the step it happened in.
    ///
    /// NotFound and Constraint keep their own kind; everything else becomes
    /// an Internal error carrying only `context`, with the cause logged.
    pub fn into_domain(self, context: &str) -> DomainError {
        match self {
            RepoError::NotFound => DomainError::new(ErrorKind::NotFound, context),
            RepoError::Constraint(msg) => DomainError::conflict(format!("{context}: {msg}")),
            RepoError::Connection(_) | RepoError::Query(_) => {
                tracing::error!(error = %self, "{context}");
                DomainError::internal(context)
            }
        }
    }
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => DomainError::new(ErrorKind::NotFound, "resource not found"),
            RepoError::Constraint(msg) => DomainError::conflict(msg),
            RepoError::Connection(_) | RepoError::Query(_) => {
                tracing::error!(error = %err, "storage failure");
                DomainError::internal("storage failure")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_is_display() {
        let err = DomainError::invalid("tag already exists");
        assert_eq!(err.to_string(), "tag already exists");
        assert_eq!(err.kind(), ErrorKind::Invalid);
    }

    #[test]
    fn test_repo_error_mapping() {
        assert_eq!(
            DomainError::from(RepoError::NotFound).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            DomainError::from(RepoError::Constraint("dup".into())).kind(),
            ErrorKind::Conflict
        );
        let err = DomainError::from(RepoError::Query("syntax error at SELECT".into()));
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(!err.message().contains("SELECT"));
    }

    #[test]
    fn test_into_domain_keeps_context() {
        let err = RepoError::Connection("refused".into()).into_domain("failed to create post");
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.message(), "failed to create post");
    }
}
