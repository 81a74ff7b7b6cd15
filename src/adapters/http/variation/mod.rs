//! HTTP adapter for owner variation endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{SubmitVariationResponse, VariationCommandResponse, VariationRequest};
pub use handlers::VariationHandlers;
pub use routes::variation_routes;
