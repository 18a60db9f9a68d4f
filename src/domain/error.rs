//! Domain errors

use thiserror::Error;

/// Domain-level error types
///
/// Every business-rule failure is detected before any write happens,
/// so a caller receiving one of these can assume no partial state.
#[derive(Debug, Clone, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Booking limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Cannot {action} a reservation in status '{status}'")]
    InvalidStateTransition {
        action: &'static str,
        status: String,
    },

    #[error("Allocation failed: {0}")]
    AllocationFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            field,
            value: value.into(),
        }
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
