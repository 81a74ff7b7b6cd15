//! HTTP adapter for the public signing endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    SignVariationRequest, SignVariationResponse, SignedByRequest, SigningProjectResponse,
    SigningVariationResponse, ValidateTokenParams, ValidateTokenResponse,
};
pub use handlers::SigningHandlers;
pub use routes::signing_routes;
