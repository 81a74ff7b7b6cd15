//! HTTP handlers for project endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::{invalid_id, variation_error_response};
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::request::command_metadata;
use crate::application::handlers::project::{
    CreateProjectCommand, CreateProjectHandler, GetProjectHandler, GetProjectQuery,
    ListProjectsHandler, ListProjectsQuery,
};
use crate::domain::foundation::ProjectId;

use super::dto::{CreateProjectRequest, ProjectListResponse, ProjectResponse};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct ProjectHandlers {
    create_handler: Arc<CreateProjectHandler>,
    get_handler: Arc<GetProjectHandler>,
    list_handler: Arc<ListProjectsHandler>,
}

impl ProjectHandlers {
    pub fn new(
        create_handler: Arc<CreateProjectHandler>,
        get_handler: Arc<GetProjectHandler>,
        list_handler: Arc<ListProjectsHandler>,
    ) -> Self {
        Self {
            create_handler,
            get_handler,
            list_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/projects - Create a project
pub async fn create_project(
    State(handlers): State<ProjectHandlers>,
    RequireAuth(user): RequireAuth,
    headers: HeaderMap,
    Json(req): Json<CreateProjectRequest>,
) -> Response {
    let cmd = CreateProjectCommand {
        name: req.name,
        client_name: req.client_name,
        client_email: req.client_email,
        contract_price_cents: req.contract_price_cents,
    };

    match handlers
        .create_handler
        .handle(cmd, command_metadata(user.id, &headers))
        .await
    {
        Ok(project) => (StatusCode::CREATED, Json(ProjectResponse::from(&project))).into_response(),
        Err(e) => variation_error_response(e),
    }
}

/// GET /api/projects - List the caller's projects
pub async fn list_projects(
    State(handlers): State<ProjectHandlers>,
    RequireAuth(user): RequireAuth,
) -> Response {
    match handlers
        .list_handler
        .handle(ListProjectsQuery { user_id: user.id })
        .await
    {
        Ok(projects) => {
            let response = ProjectListResponse {
                total: projects.len(),
                items: projects.iter().map(Into::into).collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => variation_error_response(e),
    }
}

/// GET /api/projects/:id - Project with its variations
pub async fn get_project(
    State(handlers): State<ProjectHandlers>,
    RequireAuth(user): RequireAuth,
    Path(project_id): Path<String>,
) -> Response {
    let Ok(project_id) = project_id.parse::<ProjectId>() else {
        return invalid_id("project");
    };

    let query = GetProjectQuery {
        project_id,
        user_id: user.id,
    };

    match handlers.get_handler.handle(query).await {
        Ok(project) => (StatusCode::OK, Json(ProjectResponse::from(&project))).into_response(),
        Err(e) => variation_error_response(e),
    }
}
