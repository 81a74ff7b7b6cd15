//! HTTP handlers for owner variation endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::{invalid_id, variation_error_response};
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::project::ProjectResponse;
use crate::adapters::http::request::command_metadata;
use crate::application::handlers::variation::{
    CreateVariationCommand, CreateVariationHandler, DeleteVariationCommand, DeleteVariationHandler,
    EditVariationCommand, EditVariationHandler, SubmitVariationCommand, SubmitVariationHandler,
};
use crate::domain::foundation::{ProjectId, VariationId};

use super::dto::{SubmitVariationResponse, VariationCommandResponse, VariationRequest};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct VariationHandlers {
    create_handler: Arc<CreateVariationHandler>,
    edit_handler: Arc<EditVariationHandler>,
    delete_handler: Arc<DeleteVariationHandler>,
    submit_handler: Arc<SubmitVariationHandler>,
}

impl VariationHandlers {
    pub fn new(
        create_handler: Arc<CreateVariationHandler>,
        edit_handler: Arc<EditVariationHandler>,
        delete_handler: Arc<DeleteVariationHandler>,
        submit_handler: Arc<SubmitVariationHandler>,
    ) -> Self {
        Self {
            create_handler,
            edit_handler,
            delete_handler,
            submit_handler,
        }
    }
}

fn parse_ids(project_id: &str, variation_id: &str) -> Result<(ProjectId, VariationId), Response> {
    let project_id = project_id
        .parse::<ProjectId>()
        .map_err(|_| invalid_id("project"))?;
    let variation_id = variation_id
        .parse::<VariationId>()
        .map_err(|_| invalid_id("variation"))?;
    Ok((project_id, variation_id))
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/projects/:id/variations - Add a draft variation
pub async fn create_variation(
    State(handlers): State<VariationHandlers>,
    RequireAuth(user): RequireAuth,
    headers: HeaderMap,
    Path(project_id): Path<String>,
    Json(req): Json<VariationRequest>,
) -> Response {
    let Ok(project_id) = project_id.parse::<ProjectId>() else {
        return invalid_id("project");
    };

    let cmd = CreateVariationCommand {
        project_id,
        fields: req.into(),
    };

    match handlers
        .create_handler
        .handle(cmd, command_metadata(user.id, &headers))
        .await
    {
        Ok(result) => (
            StatusCode::CREATED,
            Json(VariationCommandResponse::new(&result.project, result.variation_id)),
        )
            .into_response(),
        Err(e) => variation_error_response(e),
    }
}

/// PUT /api/projects/:id/variations/:vid - Edit a variation
pub async fn edit_variation(
    State(handlers): State<VariationHandlers>,
    RequireAuth(user): RequireAuth,
    headers: HeaderMap,
    Path((project_id, variation_id)): Path<(String, String)>,
    Json(req): Json<VariationRequest>,
) -> Response {
    let (project_id, variation_id) = match parse_ids(&project_id, &variation_id) {
        Ok(ids) => ids,
        Err(response) => return response,
    };

    let cmd = EditVariationCommand {
        project_id,
        variation_id,
        fields: req.into(),
    };

    match handlers
        .edit_handler
        .handle(cmd, command_metadata(user.id, &headers))
        .await
    {
        Ok(project) => (
            StatusCode::OK,
            Json(VariationCommandResponse::new(&project, variation_id)),
        )
            .into_response(),
        Err(e) => variation_error_response(e),
    }
}

/// DELETE /api/projects/:id/variations/:vid - Delete a variation
pub async fn delete_variation(
    State(handlers): State<VariationHandlers>,
    RequireAuth(user): RequireAuth,
    headers: HeaderMap,
    Path((project_id, variation_id)): Path<(String, String)>,
) -> Response {
    let (project_id, variation_id) = match parse_ids(&project_id, &variation_id) {
        Ok(ids) => ids,
        Err(response) => return response,
    };

    let cmd = DeleteVariationCommand {
        project_id,
        variation_id,
    };

    match handlers
        .delete_handler
        .handle(cmd, command_metadata(user.id, &headers))
        .await
    {
        Ok(project) => (StatusCode::OK, Json(ProjectResponse::from(&project))).into_response(),
        Err(e) => variation_error_response(e),
    }
}

/// POST /api/projects/:id/variations/:vid/send-for-signature - Submit to the client
pub async fn submit_variation(
    State(handlers): State<VariationHandlers>,
    RequireAuth(user): RequireAuth,
    headers: HeaderMap,
    Path((project_id, variation_id)): Path<(String, String)>,
) -> Response {
    let (project_id, variation_id) = match parse_ids(&project_id, &variation_id) {
        Ok(ids) => ids,
        Err(response) => return response,
    };

    let cmd = SubmitVariationCommand {
        project_id,
        variation_id,
    };

    match handlers
        .submit_handler
        .handle(cmd, command_metadata(user.id, &headers))
        .await
    {
        Ok(result) => {
            let response = SubmitVariationResponse {
                variation_id: result.variation_id.to_string(),
                signing_url: result.signing_url,
                expires_at: result.expires_at.to_string(),
                project: ProjectResponse::from(&result.project),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => variation_error_response(e),
    }
}
