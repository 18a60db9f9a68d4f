//! Shared HTTP plumbing: response envelope, error mapping, validated JSON

pub mod validated_json;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

pub use validated_json::ValidatedJson;

/// Standard API response wrapper.
///
/// Every endpoint returns data in this envelope.
/// On success: `{"success": true, "data": {...}}`,
/// on failure: `{"success": false, "error": "description"}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// `true` when the request succeeded
    pub success: bool,
    /// Payload; `null` on failure
    pub data: Option<T>,
    /// Error description; `null` on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Empty response for operations without return data
#[derive(Debug, Serialize, Deserialize)]
pub struct EmptyData {}

/// Result type all handlers return.
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, (StatusCode, Json<ApiResponse<T>>)>;

/// The single mapping from domain failures to HTTP responses.
pub fn domain_error<T>(e: DomainError) -> (StatusCode, Json<ApiResponse<T>>) {
    let status = match &e {
        DomainError::Validation(_) | DomainError::LimitExceeded(_) => StatusCode::BAD_REQUEST,
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Conflict(_)
        | DomainError::InvalidStateTransition { .. }
        | DomainError::AllocationFailed(_) => StatusCode::CONFLICT,
        DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ApiResponse::error(e.to_string())))
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_follows_the_error_taxonomy() {
        let cases = [
            (
                DomainError::Validation("bad".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                DomainError::LimitExceeded("too many".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                DomainError::not_found("reservation", "id", "x"),
                StatusCode::NOT_FOUND,
            ),
            (DomainError::Conflict("busy".into()), StatusCode::CONFLICT),
            (
                DomainError::InvalidStateTransition {
                    action: "seat",
                    status: "cancelled".into(),
                },
                StatusCode::CONFLICT,
            ),
            (
                DomainError::AllocationFailed("full".into()),
                StatusCode::CONFLICT,
            ),
            (
                DomainError::Internal("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            let (status, body) = domain_error::<EmptyData>(error);
            assert_eq!(status, expected);
            assert!(!body.0.success);
            assert!(body.0.error.is_some());
        }
    }

    #[test]
    fn envelope_serializes_without_error_field_on_success() {
        let ok = ApiResponse::success(42);
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], 42);
        assert!(json.get("error").is_none());
    }
}
