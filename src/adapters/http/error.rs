//! Error responses shared by all HTTP modules.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domain::project::VariationError;

/// Body returned for every rejected signing link.
pub const INVALID_SIGNING_LINK: &str = "This signing link is invalid or has expired";

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self {
            details: Some(serde_json::json!({ "field": field })),
            ..Self::new("VALIDATION_FAILED", message)
        }
    }

    pub fn not_found(resource_type: &str, id: &str) -> Self {
        Self::new("NOT_FOUND", format!("{} not found: {}", resource_type, id))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new("FORBIDDEN", message)
    }

    pub fn conflict(code: &str, message: impl Into<String>) -> Self {
        Self::new(code, message)
    }

    pub fn invalid_signing_link() -> Self {
        Self::new("INVALID_SIGNING_LINK", INVALID_SIGNING_LINK)
    }

    pub fn internal() -> Self {
        Self::new("INTERNAL_ERROR", "An internal error occurred")
    }
}

/// Responds with 400 for an unparseable path id.
pub fn invalid_id(kind: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::bad_request(format!("Invalid {} ID", kind))),
    )
        .into_response()
}

/// Maps a variation error onto its HTTP status and body.
pub fn variation_error_response(error: VariationError) -> Response {
    if error.is_signature_link_error() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::invalid_signing_link()),
        )
            .into_response();
    }

    let (status, body) = match &error {
        VariationError::ProjectNotFound(id) => (
            StatusCode::NOT_FOUND,
            ErrorResponse::not_found("Project", &id.to_string()),
        ),
        VariationError::VariationNotFound(id) => (
            StatusCode::NOT_FOUND,
            ErrorResponse::not_found("Variation", &id.to_string()),
        ),
        VariationError::Forbidden => (
            StatusCode::FORBIDDEN,
            ErrorResponse::forbidden("Permission denied"),
        ),
        VariationError::ValidationFailed { field, .. } => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::validation(field, error.message()),
        ),
        VariationError::InvalidTransition { .. }
        | VariationError::OperationNotAllowed { .. }
        | VariationError::NotReadyForSignature(_) => (
            StatusCode::CONFLICT,
            ErrorResponse::conflict("INVALID_STATE", error.message()),
        ),
        VariationError::Conflict(_) => (
            StatusCode::CONFLICT,
            ErrorResponse::conflict("CONCURRENT_UPDATE", error.message()),
        ),
        VariationError::Infrastructure(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::internal())
        }
        VariationError::TokenInvalidOrExpired
        | VariationError::TokenExpired
        | VariationError::AlreadySigned => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::invalid_signing_link(),
        ),
    };

    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ProjectId;
    use crate::domain::project::VariationStatus;

    async fn body_of(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn statuses_follow_error_kind() {
        let cases = [
            (VariationError::ProjectNotFound(ProjectId::new()), StatusCode::NOT_FOUND),
            (VariationError::Forbidden, StatusCode::FORBIDDEN),
            (VariationError::validation("name", "empty"), StatusCode::BAD_REQUEST),
            (
                VariationError::NotReadyForSignature(VariationStatus::Draft),
                StatusCode::CONFLICT,
            ),
            (
                VariationError::OperationNotAllowed {
                    operation: "edit",
                    status: VariationStatus::Approved,
                },
                StatusCode::CONFLICT,
            ),
            (VariationError::Conflict("x".into()), StatusCode::CONFLICT),
            (
                VariationError::infrastructure("pool timed out"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(variation_error_response(error).status(), status);
        }
    }

    #[tokio::test]
    async fn signing_link_errors_are_identical() {
        let bodies = [
            VariationError::TokenInvalidOrExpired,
            VariationError::TokenExpired,
            VariationError::AlreadySigned,
        ];
        let mut rendered = Vec::new();
        for error in bodies {
            let response = variation_error_response(error);
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            rendered.push(body_of(response).await);
        }

        assert!(rendered[0].contains(INVALID_SIGNING_LINK));
        assert_eq!(rendered[0], rendered[1]);
        assert_eq!(rendered[1], rendered[2]);
    }

    #[tokio::test]
    async fn infrastructure_details_are_hidden() {
        let body = body_of(variation_error_response(VariationError::infrastructure(
            "password authentication failed for user app",
        )))
        .await;

        assert!(!body.contains("password"));
        assert!(body.contains("INTERNAL_ERROR"));
    }
}
