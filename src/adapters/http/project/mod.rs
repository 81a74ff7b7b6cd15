//! HTTP adapter for project endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    CreateProjectRequest, ProjectListResponse, ProjectResponse, ProjectSummaryResponse,
    SignatoryResponse, VariationResponse,
};
pub use handlers::ProjectHandlers;
pub use routes::project_routes;
