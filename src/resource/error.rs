use thiserror::Error;

use crate::storage::{DocumentId, InvalidId, StoreError};

/// Payload rejected by a schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("field '{0}' is required")]
    MissingField(&'static str),
    #[error("field '{field}' {reason}")]
    InvalidField { field: &'static str, reason: &'static str },
}

impl ValidationError {
    /// Name of the field that failed
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingField(field) => field,
            ValidationError::InvalidField { field, .. } => field,
        }
    }
}

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    MalformedId(#[from] InvalidId),
    #[error("{resource} {id} not found")]
    NotFound { resource: String, id: DocumentId },
    #[error("storage failure: {0}")]
    Storage(#[from] StoreError),
}
