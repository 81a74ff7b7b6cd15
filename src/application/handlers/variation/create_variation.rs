//! CreateVariationHandler - Command handler for adding a draft variation.

use std::sync::Arc;

use crate::application::ProjectWriter;
use crate::domain::foundation::{CommandMetadata, OwnedByUser, ProjectId, VariationId};
use crate::domain::project::{Project, VariationError};
use crate::ports::Clock;

use super::VariationFields;

/// Command to add a variation to a project.
#[derive(Debug, Clone)]
pub struct CreateVariationCommand {
    pub project_id: ProjectId,
    pub fields: VariationFields,
}

/// Result of successful variation creation.
#[derive(Debug, Clone)]
pub struct CreateVariationResult {
    pub project: Project,
    pub variation_id: VariationId,
}

/// Handler for creating variations.
pub struct CreateVariationHandler {
    writer: Arc<ProjectWriter>,
    clock: Arc<dyn Clock>,
}

impl CreateVariationHandler {
    pub fn new(writer: Arc<ProjectWriter>, clock: Arc<dyn Clock>) -> Self {
        Self { writer, clock }
    }

    pub async fn handle(
        &self,
        cmd: CreateVariationCommand,
        metadata: CommandMetadata,
    ) -> Result<CreateVariationResult, VariationError> {
        let (details, cost) = cmd.fields.into_domain()?;
        let now = self.clock.now();

        let (project, variation_id) = self
            .writer
            .modify(cmd.project_id, |project| {
                project.check_ownership(&metadata.user_id)?;
                project.add_variation(details.clone(), cost, now)
            })
            .await?;

        tracing::info!(
            project_id = %cmd.project_id,
            variation_id = %variation_id,
            correlation_id = %metadata.correlation_id(),
            "Variation created"
        );
        Ok(CreateVariationResult {
            project,
            variation_id,
        })
    }
}
