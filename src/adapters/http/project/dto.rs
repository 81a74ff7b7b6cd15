//! HTTP DTOs for project endpoints.
//!
//! Money crosses the API as integer cents. Signature tokens are never
//! serialized here; the owner only sees a signing link when submitting.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::OwnedByUser;
use crate::domain::project::{Project, Signatory, Variation, VariationStatus};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to create a project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProjectRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub client_email: String,
    pub contract_price_cents: i64,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Full project view with its variations.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectResponse {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub client_name: String,
    pub client_email: String,
    pub contract_price_cents: i64,
    pub current_contract_price_cents: i64,
    pub variations: Vec<VariationResponse>,
    pub version: u64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Project> for ProjectResponse {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id().to_string(),
            owner_id: project.owner_id().to_string(),
            name: project.name().to_string(),
            client_name: project.client().name.clone(),
            client_email: project.client().email.clone(),
            contract_price_cents: project.contract_price().cents(),
            current_contract_price_cents: project.current_contract_price().cents(),
            variations: project.variations().iter().map(Into::into).collect(),
            version: project.version(),
            created_at: project.created_at().to_string(),
            updated_at: project.updated_at().to_string(),
        }
    }
}

/// Project summary for list responses.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSummaryResponse {
    pub id: String,
    pub name: String,
    pub client_name: String,
    pub contract_price_cents: i64,
    pub current_contract_price_cents: i64,
    pub variation_count: usize,
    pub awaiting_signature: usize,
    pub updated_at: String,
}

impl From<&Project> for ProjectSummaryResponse {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id().to_string(),
            name: project.name().to_string(),
            client_name: project.client().name.clone(),
            contract_price_cents: project.contract_price().cents(),
            current_contract_price_cents: project.current_contract_price().cents(),
            variation_count: project.variations().len(),
            awaiting_signature: project
                .variations()
                .iter()
                .filter(|v| v.status() == VariationStatus::Submitted)
                .count(),
            updated_at: project.updated_at().to_string(),
        }
    }
}

/// List of the caller's projects.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectListResponse {
    pub items: Vec<ProjectSummaryResponse>,
    pub total: usize,
}

/// Owner view of a variation.
#[derive(Debug, Clone, Serialize)]
pub struct VariationResponse {
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
    pub signature_token_expires_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signed_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signed_by: Option<SignatoryResponse>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Variation> for VariationResponse {
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
            signature_token_expires_at: v.signature_token_expires_at().map(ToString::to_string),
            signed_at: v.signed_at().map(ToString::to_string),
            signed_by: v.signed_by().map(Into::into),
            created_at: v.created_at().to_string(),
            updated_at: v.updated_at().to_string(),
        }
    }
}

/// Who signed a variation, as recorded at signing time.
#[derive(Debug, Clone, Serialize)]
pub struct SignatoryResponse {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl From<&Signatory> for SignatoryResponse {
    fn from(s: &Signatory) -> Self {
        Self {
            name: s.name.clone(),
            email: s.email.clone(),
            ip_address: s.ip_address.clone(),
            user_agent: s.user_agent.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Money, ProjectId, Timestamp, UserId};
    use crate::domain::project::{ClientContact, VariationDetails};

    fn project() -> Project {
        let now = Timestamp::from_unix_secs(1_700_000_000).unwrap();
        let mut p = Project::new(
            ProjectId::new(),
            UserId::new("owner-1").unwrap(),
            "Harbour St",
            ClientContact::new("Client", "client@example.com").unwrap(),
            Money::try_from_dollars(450_000).unwrap(),
            now,
        )
        .unwrap();
        p.add_variation(
            VariationDetails::new("Skylight", "Request", "Two days", true, 2).unwrap(),
            Money::try_from_cents(250_000).unwrap(),
            now,
        )
        .unwrap();
        p
    }

    #[test]
    fn create_request_defaults_missing_text_to_empty() {
        let req: CreateProjectRequest =
            serde_json::from_str(r#"{"contract_price_cents": 100}"#).unwrap();
        assert!(req.name.is_empty());
        assert_eq!(req.contract_price_cents, 100);
    }

    #[test]
    fn project_response_uses_cents_and_hides_tokens() {
        let response = ProjectResponse::from(&project());
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["contract_price_cents"], 45_000_000);
        assert_eq!(json["variations"][0]["cost_cents"], 250_000);
        assert_eq!(json["variations"][0]["status"], "draft");
        assert!(json["variations"][0].get("signature_token").is_none());
    }

    #[test]
    fn summary_counts_variations() {
        let summary = ProjectSummaryResponse::from(&project());
        assert_eq!(summary.variation_count, 1);
        assert_eq!(summary.awaiting_signature, 0);
    }
}
