//! HTTP handlers for the public signing endpoints.
//!
//! Neither endpoint requires a session. Every rejected link produces the
//! same response whatever the underlying reason.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::{variation_error_response, ErrorResponse};
use crate::adapters::http::request::signer_context;
use crate::application::handlers::variation::{
    SignVariationCommand, SignVariationHandler, ValidateSignatureTokenHandler,
    ValidateSignatureTokenQuery,
};

use super::dto::{
    SignVariationRequest, SignVariationResponse, SigningProjectResponse, ValidateTokenParams,
    ValidateTokenResponse,
};

#[derive(Clone)]
pub struct SigningHandlers {
    validate_handler: Arc<ValidateSignatureTokenHandler>,
    sign_handler: Arc<SignVariationHandler>,
    trust_proxy_headers: bool,
}

impl SigningHandlers {
    pub fn new(
        validate_handler: Arc<ValidateSignatureTokenHandler>,
        sign_handler: Arc<SignVariationHandler>,
        trust_proxy_headers: bool,
    ) -> Self {
        Self {
            validate_handler,
            sign_handler,
            trust_proxy_headers,
        }
    }
}

/// GET /api/variations/validate-token?token= - Check a signing link
pub async fn validate_token(
    State(handlers): State<SigningHandlers>,
    Query(params): Query<ValidateTokenParams>,
) -> Response {
    let query = ValidateSignatureTokenQuery {
        token: params.token,
    };

    match handlers.validate_handler.handle(query).await {
        Ok(validated) => match validated.variation() {
            Some(variation) => {
                let response = ValidateTokenResponse {
                    project: SigningProjectResponse::from(&validated.project),
                    variation: variation.into(),
                };
                (StatusCode::OK, Json(response)).into_response()
            }
            None => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::invalid_signing_link()),
            )
                .into_response(),
        },
        Err(e) => variation_error_response(e),
    }
}

/// POST /api/variations/sign - Sign a variation
pub async fn sign_variation(
    State(handlers): State<SigningHandlers>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Json(req): Json<SignVariationRequest>,
) -> Response {
    let cmd = SignVariationCommand {
        token: req.token,
        signer_name: req.signed_by.name,
        signer_email: req.signed_by.email,
        context: signer_context(
            &headers,
            connect_info.map(|ConnectInfo(addr)| addr),
            handlers.trust_proxy_headers,
        ),
    };

    match handlers.sign_handler.handle(cmd).await {
        Ok(result) => {
            let variation = result.project.variation(result.variation_id);
            let response = SignVariationResponse {
                variation_id: result.variation_id.to_string(),
                status: variation.map(|v| v.status()).unwrap_or_default(),
                signed_at: variation.and_then(|v| v.signed_at()).map(ToString::to_string),
                message: "Variation signed".to_string(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => variation_error_response(e),
    }
}
