//! Domain errors
//!
//! One taxonomy for the whole engine. The HTTP layer maps each variant to a
//! status code and a stable machine-readable error code; everything below
//! the interface layer only ever deals in `DomainError`.

use thiserror::Error;

/// Domain-level error types
#[derive(Debug, Clone, Error)]
pub enum DomainError {
    /// A referenced restaurant, sector, table or reservation does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// No table or combination fits, a competing writer holds the slot
    /// locks, or the restaurant guest cap is reached
    #[error("no capacity: {0}")]
    NoCapacity(String),

    /// The requested start does not fall inside any service shift
    #[error("outside service window: {0}")]
    OutsideServiceWindow(String),

    /// Payload validation or booking-policy violation
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// State conflict, e.g. approving an expired pending hold
    #[error("conflict: {0}")]
    Conflict(String),

    /// Unexpected failure in the store or lock service
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Stable machine-readable code used in HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::NoCapacity(_) => "no_capacity",
            Self::OutsideServiceWindow(_) => "outside_service_window",
            Self::InvalidFormat(_) => "invalid_format",
            Self::Conflict(_) => "conflict",
            Self::Internal(_) => "internal_server_error",
        }
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_formats_entity_and_id() {
        let e = DomainError::not_found("Restaurant", "r-9");
        assert_eq!(e.to_string(), "Restaurant not found: r-9");
        assert_eq!(e.code(), "not_found");
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(DomainError::NoCapacity("x".into()).code(), "no_capacity");
        assert_eq!(
            DomainError::OutsideServiceWindow("x".into()).code(),
            "outside_service_window"
        );
        assert_eq!(DomainError::InvalidFormat("x".into()).code(), "invalid_format");
        assert_eq!(DomainError::Conflict("x".into()).code(), "conflict");
        assert_eq!(
            DomainError::Internal("x".into()).code(),
            "internal_server_error"
        );
    }
}
