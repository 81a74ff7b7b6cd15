//! Project and variation error types.

use crate::domain::foundation::{DomainError, ErrorCode, ProjectId, ValidationError, VariationId};

use super::VariationStatus;

/// Errors produced by project and variation operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariationError {
    /// Project was not found.
    ProjectNotFound(ProjectId),
    /// Variation was not found in the project.
    VariationNotFound(VariationId),
    /// Acting user does not own the project.
    Forbidden,
    /// The state machine has no edge between these statuses.
    InvalidTransition {
        from: VariationStatus,
        to: VariationStatus,
    },
    /// The mutation policy does not allow this operation in this status.
    OperationNotAllowed {
        operation: &'static str,
        status: VariationStatus,
    },
    /// Malformed or missing input.
    ValidationFailed { field: String, message: String },
    /// No live variation holds this token.
    TokenInvalidOrExpired,
    /// The token matched but its expiry has passed.
    TokenExpired,
    /// The variation has already been signed. Not reachable through a
    /// signing link, which loses its token on approval.
    AlreadySigned,
    /// The variation is not awaiting a signature. Not reachable through a
    /// signing link either.
    NotReadyForSignature(VariationStatus),
    /// Optimistic concurrency retries were exhausted.
    Conflict(String),
    /// Storage or other infrastructure failure.
    Infrastructure(String),
}

impl VariationError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        VariationError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        VariationError::Infrastructure(message.into())
    }

    /// True for errors a client signing link can produce. They all render
    /// identically so a caller cannot tell an unknown token from a used one.
    pub fn is_signature_link_error(&self) -> bool {
        matches!(
            self,
            VariationError::TokenInvalidOrExpired
                | VariationError::TokenExpired
                | VariationError::AlreadySigned
        )
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            VariationError::ProjectNotFound(_) => ErrorCode::ProjectNotFound,
            VariationError::VariationNotFound(_) => ErrorCode::VariationNotFound,
            VariationError::Forbidden => ErrorCode::Forbidden,
            VariationError::InvalidTransition { .. }
            | VariationError::OperationNotAllowed { .. }
            | VariationError::NotReadyForSignature(_) => ErrorCode::InvalidStateTransition,
            VariationError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            VariationError::TokenInvalidOrExpired
            | VariationError::TokenExpired
            | VariationError::AlreadySigned => ErrorCode::Unauthorized,
            VariationError::Conflict(_) => ErrorCode::ConcurrencyConflict,
            VariationError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    pub fn message(&self) -> String {
        match self {
            VariationError::ProjectNotFound(id) => format!("Project not found: {}", id),
            VariationError::VariationNotFound(id) => format!("Variation not found: {}", id),
            VariationError::Forbidden => "Permission denied".to_string(),
            VariationError::InvalidTransition { from, to } => {
                format!("Cannot move variation from {} to {}", from, to)
            }
            VariationError::OperationNotAllowed { operation, status } => {
                format!("Cannot {} a variation that is {}", operation, status)
            }
            VariationError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            VariationError::TokenInvalidOrExpired => "Signature token is invalid".to_string(),
            VariationError::TokenExpired => "Signature token has expired".to_string(),
            VariationError::AlreadySigned => "Variation has already been signed".to_string(),
            VariationError::NotReadyForSignature(status) => {
                format!("Variation is {} and not awaiting signature", status)
            }
            VariationError::Conflict(msg) => format!("Concurrent update: {}", msg),
            VariationError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for VariationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for VariationError {}

impl From<ValidationError> for VariationError {
    fn from(err: ValidationError) -> Self {
        VariationError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for VariationError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::Forbidden => VariationError::Forbidden,
            ErrorCode::ConcurrencyConflict => VariationError::Conflict(err.message),
            ErrorCode::ValidationFailed => VariationError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => VariationError::Infrastructure(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_errors_share_classification() {
        assert!(VariationError::TokenInvalidOrExpired.is_signature_link_error());
        assert!(VariationError::TokenExpired.is_signature_link_error());
        assert!(VariationError::AlreadySigned.is_signature_link_error());
        assert!(!VariationError::NotReadyForSignature(VariationStatus::Draft)
            .is_signature_link_error());
    }

    #[test]
    fn forbidden_domain_error_maps_to_forbidden() {
        let err: VariationError = DomainError::new(ErrorCode::Forbidden, "nope").into();
        assert_eq!(err, VariationError::Forbidden);
    }

    #[test]
    fn conflict_domain_error_keeps_message() {
        let err: VariationError = DomainError::conflict("version 3 is stale").into();
        assert_eq!(err, VariationError::Conflict("version 3 is stale".to_string()));
    }

    #[test]
    fn validation_error_keeps_field() {
        let err: VariationError = ValidationError::empty_field("reason").into();
        assert!(matches!(
            err,
            VariationError::ValidationFailed { ref field, .. } if field == "reason"
        ));
    }

    #[test]
    fn database_errors_become_infrastructure() {
        let err: VariationError = DomainError::database("connection reset").into();
        assert!(matches!(err, VariationError::Infrastructure(_)));
        assert_eq!(err.code(), ErrorCode::DatabaseError);
    }
}
