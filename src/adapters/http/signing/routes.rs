//! HTTP routes for the public signing endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{sign_variation, validate_token, SigningHandlers};

/// Creates the signing router, mounted under `/api/variations`.
pub fn signing_routes(handlers: SigningHandlers) -> Router {
    Router::new()
        .route("/validate-token", get(validate_token))
        .route("/sign", post(sign_variation))
        .with_state(handlers)
}
