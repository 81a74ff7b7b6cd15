//! HTTP DTOs for the public signing endpoints.
//!
//! These views are shown to the client, so they omit owner-only data: no
//! contract price, no signer audit fields, no token.

use serde::{Deserialize, Serialize};

use crate::domain::project::{Project, Variation, VariationStatus};

/// Query string for token validation.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidateTokenParams {
    #[serde(default)]
    pub token: String,
}

/// Body for signing a variation.
#[derive(Debug, Clone, Deserialize)]
pub struct SignVariationRequest {
    #[serde(default)]
    pub token: String,
    pub signed_by: SignedByRequest,
}

/// The signer's own details.
#[derive(Debug, Clone, Deserialize)]
pub struct SignedByRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Project details shown on the signing page.
#[derive(Debug, Clone, Serialize)]
pub struct SigningProjectResponse {
    pub id: String,
    pub name: String,
    pub client_name: String,
}

impl From<&Project> for SigningProjectResponse {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id().to_string(),
            name: project.name().to_string(),
            client_name: project.client().name.clone(),
        }
    }
}

/// Variation details shown on the signing page.
#[derive(Debug, Clone, Serialize)]
pub struct SigningVariationResponse {
    pub id: String,
    pub number: u32,
    pub description: String,
    pub reason: String,
    pub effect: String,
    pub permit_required: bool,
    pub delay_days: u32,
    pub cost_cents: i64,
    pub status: VariationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

impl From<&Variation> for SigningVariationResponse {
    fn from(v: &Variation) -> Self {
        Self {
            id: v.id().to_string(),
            number: v.number(),
            description: v.details().description().to_string(),
            reason: v.details().reason().to_string(),
            effect: v.details().effect().to_string(),
            permit_required: v.details().permit_required(),
            delay_days: v.details().delay_days(),
            cost_cents: v.cost().cents(),
            status: v.status(),
            expires_at: v.signature_token_expires_at().map(ToString::to_string),
        }
    }
}

/// Response for a valid signing link.
#[derive(Debug, Clone, Serialize)]
pub struct ValidateTokenResponse {
    pub project: SigningProjectResponse,
    pub variation: SigningVariationResponse,
}

/// Response for a successful signature.
#[derive(Debug, Clone, Serialize)]
pub struct SignVariationResponse {
    pub variation_id: String,
    pub status: VariationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signed_at: Option<String>,
    pub message: String,
}
