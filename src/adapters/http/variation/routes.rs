//! HTTP routes for owner variation endpoints.

use axum::{
    routing::{post, put},
    Router,
};

use super::handlers::{
    create_variation, delete_variation, edit_variation, submit_variation, VariationHandlers,
};

/// Creates the owner variation router, mounted under `/api/projects`.
pub fn variation_routes(handlers: VariationHandlers) -> Router {
    Router::new()
        .route("/:id/variations", post(create_variation))
        .route(
            "/:id/variations/:vid",
            put(edit_variation).delete(delete_variation),
        )
        .route("/:id/variations/:vid/send-for-signature", post(submit_variation))
        .with_state(handlers)
}
