//! Domain-to-HTTP error mapping
//!
//! Every error leaves the API as `{error: <code>, detail: <text>}` with
//! the status the taxonomy prescribes. Lock-busy intentionally surfaces
//! as `no_capacity`: from the caller's viewpoint the slot is unavailable
//! right now either way.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use crate::domain::DomainError;

/// Wire format of every error response
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Stable machine-readable code
    pub error: String,
    /// Human-readable description
    pub detail: String,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    /// 400 `invalid_format` for malformed request input.
    pub fn invalid(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody {
                error: "invalid_format".into(),
                detail: detail.into(),
            },
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ErrorBody {
                error: "internal_server_error".into(),
                detail: detail.into(),
            },
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        let status = match &e {
            DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
            DomainError::NoCapacity(_) => StatusCode::CONFLICT,
            DomainError::OutsideServiceWindow(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DomainError::InvalidFormat(_) => StatusCode::BAD_REQUEST,
            DomainError::Conflict(_) => StatusCode::CONFLICT,
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %e, "request failed with internal error");
        }
        Self {
            status,
            body: ErrorBody {
                error: e.code().to_string(),
                detail: e.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_the_documented_statuses() {
        let cases = [
            (
                DomainError::not_found("Restaurant", "r1"),
                StatusCode::NOT_FOUND,
                "not_found",
            ),
            (
                DomainError::NoCapacity("lock busy".into()),
                StatusCode::CONFLICT,
                "no_capacity",
            ),
            (
                DomainError::OutsideServiceWindow("x".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
                "outside_service_window",
            ),
            (
                DomainError::InvalidFormat("x".into()),
                StatusCode::BAD_REQUEST,
                "invalid_format",
            ),
            (
                DomainError::Conflict("x".into()),
                StatusCode::CONFLICT,
                "conflict",
            ),
            (
                DomainError::Internal("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_server_error",
            ),
        ];
        for (err, status, code) in cases {
            let api: ApiError = err.into();
            assert_eq!(api.status, status);
            assert_eq!(api.body.error, code);
        }
    }
}
