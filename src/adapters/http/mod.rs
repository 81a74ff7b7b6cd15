//! HTTP adapters - REST API implementations.
//!
//! Each area has its own module with DTOs, handlers and routes;
//! [`api_router`] mounts them all.

pub mod error;
pub mod middleware;
pub mod project;
pub mod request;
pub mod router;
pub mod signing;
pub mod variation;

pub use error::{variation_error_response, ErrorResponse, INVALID_SIGNING_LINK};
pub use router::{api_router, ApiServices, ApiSettings};
