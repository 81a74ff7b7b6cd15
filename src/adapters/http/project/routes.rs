//! HTTP routes for project endpoints.

use axum::{routing::get, Router};

use super::handlers::{create_project, get_project, list_projects, ProjectHandlers};

/// Creates the project router, mounted under `/api/projects`.
pub fn project_routes(handlers: ProjectHandlers) -> Router {
    Router::new()
        .route("/", get(list_projects).post(create_project))
        .route("/:id", get(get_project))
        .with_state(handlers)
}
