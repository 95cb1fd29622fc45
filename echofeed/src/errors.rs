use std::borrow::Cow;

use thiserror::Error;

/// Top-level error type returned by store-backed operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Validation failed for one or more fields before anything was written.
    #[error("validation failed")]
    Validation(#[from] ValidationError),

    /// Underlying Redis command failed.
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Optimistic concurrency guard detected a stale version.
    #[error("version conflict (expected {expected:?}, actual {actual:?})")]
    VersionConflict { expected: Option<i64>, actual: Option<i64> },

    /// Referenced document does not exist.
    #[error("entity not found")]
    NotFound { entity_id: Option<String> },

    /// Invalid input supplied to a store operation.
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },

    /// The value already belongs to another entity (e.g. a taken username).
    #[error("unique constraint violation: field '{field}' value '{value}' already belongs to entity '{existing_entity_id}'")]
    UniqueConstraintViolation {
        field: String,
        value: String,
        existing_entity_id: String,
    },

    /// Catch-all for malformed server replies and serialization failures.
    #[error("{message}")]
    Other { message: Cow<'static, str> },
}

impl StoreError {
    pub(crate) fn other(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Other { message: message.into() }
    }
}

/// Collection of validation issues encountered while preparing a mutation.
#[derive(Debug, Error)]
#[error("validation errors: {issues:?}")]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    pub fn new<I>(issues: I) -> Self
    where
        I: IntoIterator<Item = ValidationIssue>,
    {
        Self {
            issues: issues.into_iter().collect(),
        }
    }

    /// Convenience helper for constructing a single-field validation error.
    pub fn single(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new([ValidationIssue::new(field, code, message)])
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Detailed validation failure for a single field or logical path.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;
