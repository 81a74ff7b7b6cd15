//! SubmitVariationHandler - Command handler for sending a variation for signature.
//!
//! Submission issues a single-use token, stores it on the variation, and
//! emails the client a signing link. The link is also returned to the owner
//! so it can be shared by hand if the email never arrives.

use std::sync::Arc;

use crate::application::{location, signing_url, NotificationDispatcher, ProjectWriter, SignatureTokenService};
use crate::domain::foundation::{CommandMetadata, OwnedByUser, ProjectId, Timestamp, VariationId};
use crate::domain::project::{Project, VariationError};
use crate::ports::SignatureRequest;

/// Command to submit a draft variation.
#[derive(Debug, Clone)]
pub struct SubmitVariationCommand {
    pub project_id: ProjectId,
    pub variation_id: VariationId,
}

/// Result of a successful submission.
#[derive(Debug, Clone)]
pub struct SubmitVariationResult {
    pub project: Project,
    pub variation_id: VariationId,
    pub signing_url: String,
    pub expires_at: Timestamp,
}

/// Handler for submitting variations.
pub struct SubmitVariationHandler {
    writer: Arc<ProjectWriter>,
    tokens: Arc<SignatureTokenService>,
    dispatcher: NotificationDispatcher,
    public_base_url: String,
}

impl SubmitVariationHandler {
    pub fn new(
        writer: Arc<ProjectWriter>,
        tokens: Arc<SignatureTokenService>,
        dispatcher: NotificationDispatcher,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            writer,
            tokens,
            dispatcher,
            public_base_url: public_base_url.into(),
        }
    }

    pub async fn handle(
        &self,
        cmd: SubmitVariationCommand,
        metadata: CommandMetadata,
    ) -> Result<SubmitVariationResult, VariationError> {
        let (project, grant) = self
            .writer
            .modify(cmd.project_id, |project| {
                project.check_ownership(&metadata.user_id)?;
                let grant = self.tokens.issue();
                project.submit_variation(cmd.variation_id, grant.clone(), grant.issued_at)?;
                Ok(grant)
            })
            .await?;

        self.tokens
            .register(&grant, location(project.id(), cmd.variation_id))
            .await;

        let url = signing_url(&self.public_base_url, &grant.token);
        if let Some(variation) = project.variation(cmd.variation_id) {
            self.dispatcher
                .signature_request(SignatureRequest {
                    project_id: project.id(),
                    project_name: project.name().to_string(),
                    variation_id: variation.id(),
                    variation_number: variation.number(),
                    description: variation.details().description().to_string(),
                    cost: variation.cost(),
                    client_name: project.client().name.clone(),
                    client_email: project.client().email.clone(),
                    signing_url: url.clone(),
                    expires_at: grant.expires_at,
                })
                .await;
        }

        tracing::info!(
            project_id = %cmd.project_id,
            variation_id = %cmd.variation_id,
            expires_at = %grant.expires_at,
            correlation_id = %metadata.correlation_id(),
            "Variation submitted for signature"
        );
        Ok(SubmitVariationResult {
            project,
            variation_id: cmd.variation_id,
            signing_url: url,
            expires_at: grant.expires_at,
        })
    }
}
