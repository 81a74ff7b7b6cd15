//! DeleteVariationHandler - Command handler for removing a variation.

use std::sync::Arc;

use crate::application::{ProjectWriter, SignatureTokenService};
use crate::domain::foundation::{CommandMetadata, OwnedByUser, ProjectId, VariationId};
use crate::domain::project::{Project, VariationError, VariationMutationPolicy};
use crate::ports::Clock;

/// Command to delete a variation.
#[derive(Debug, Clone)]
pub struct DeleteVariationCommand {
    pub project_id: ProjectId,
    pub variation_id: VariationId,
}

/// Handler for deleting variations.
///
/// Deleting a submitted variation also drops its token from the index.
pub struct DeleteVariationHandler {
    writer: Arc<ProjectWriter>,
    tokens: Arc<SignatureTokenService>,
    clock: Arc<dyn Clock>,
    policy: VariationMutationPolicy,
}

impl DeleteVariationHandler {
    pub fn new(
        writer: Arc<ProjectWriter>,
        tokens: Arc<SignatureTokenService>,
        clock: Arc<dyn Clock>,
        policy: VariationMutationPolicy,
    ) -> Self {
        Self {
            writer,
            tokens,
            clock,
            policy,
        }
    }

    pub async fn handle(
        &self,
        cmd: DeleteVariationCommand,
        metadata: CommandMetadata,
    ) -> Result<Project, VariationError> {
        let now = self.clock.now();

        let (project, removed) = self
            .writer
            .modify(cmd.project_id, |project| {
                project.check_ownership(&metadata.user_id)?;
                project.remove_variation(cmd.variation_id, &self.policy, now)
            })
            .await?;

        if let Some(token) = removed.signature_token() {
            self.tokens.revoke(token).await;
        }

        tracing::info!(
            project_id = %cmd.project_id,
            variation_id = %cmd.variation_id,
            status = %removed.status(),
            correlation_id = %metadata.correlation_id(),
            "Variation deleted"
        );
        Ok(project)
    }
}
