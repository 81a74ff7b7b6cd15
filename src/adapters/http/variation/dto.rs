//! HTTP DTOs for owner variation endpoints.

use serde::{Deserialize, Serialize};

use crate::adapters::http::project::{ProjectResponse, VariationResponse};
use crate::application::VariationFields;
use crate::domain::project::Project;
use crate::domain::foundation::VariationId;

/// Body for creating or editing a variation.
///
/// Missing text fields arrive empty and fail domain validation with their
/// field name.
#[derive(Debug, Clone, Deserialize)]
pub struct VariationRequest {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub effect: String,
    #[serde(default)]
    pub permit_required: bool,
    #[serde(default)]
    pub delay_days: u32,
    pub cost_cents: i64,
}

impl From<VariationRequest> for VariationFields {
    fn from(req: VariationRequest) -> Self {
        Self {
            description: req.description,
            reason: req.reason,
            effect: req.effect,
            permit_required: req.permit_required,
            delay_days: req.delay_days,
            cost_cents: req.cost_cents,
        }
    }
}

/// Response for create and edit: the touched variation plus the project.
#[derive(Debug, Clone, Serialize)]
pub struct VariationCommandResponse {
    pub variation: Option<VariationResponse>,
    pub project: ProjectResponse,
}

impl VariationCommandResponse {
    pub fn new(project: &Project, variation_id: VariationId) -> Self {
        Self {
            variation: project.variation(variation_id).map(Into::into),
            project: project.into(),
        }
    }
}

/// Response for a submission. The signing link is returned so the owner can
/// pass it on if the email is lost.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitVariationResponse {
    pub variation_id: String,
    pub signing_url: String,
    pub expires_at: String,
    pub project: ProjectResponse,
}
