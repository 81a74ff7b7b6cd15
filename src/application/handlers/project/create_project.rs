//! CreateProjectHandler - Command handler for opening a new contract.

use std::sync::Arc;

use crate::domain::foundation::{CommandMetadata, Money, ProjectId};
use crate::domain::project::{ClientContact, Project, VariationError};
use crate::ports::{Clock, ProjectRepository};

/// Command to create a project.
#[derive(Debug, Clone)]
pub struct CreateProjectCommand {
    pub name: String,
    pub client_name: String,
    pub client_email: String,
    pub contract_price_cents: i64,
}

/// Handler for creating projects.
pub struct CreateProjectHandler {
    repository: Arc<dyn ProjectRepository>,
    clock: Arc<dyn Clock>,
}

impl CreateProjectHandler {
    pub fn new(repository: Arc<dyn ProjectRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    pub async fn handle(
        &self,
        cmd: CreateProjectCommand,
        metadata: CommandMetadata,
    ) -> Result<Project, VariationError> {
        let client = ClientContact::new(cmd.client_name, cmd.client_email)?;
        let contract_price = Money::for_field("contract_price_cents", cmd.contract_price_cents)?;
        let project = Project::new(
            ProjectId::new(),
            metadata.user_id.clone(),
            cmd.name,
            client,
            contract_price,
            self.clock.now(),
        )?;

        self.repository.insert(&project).await.map_err(|e| {
            tracing::error!(project_id = %project.id(), error = %e, "Failed to save project");
            VariationError::infrastructure(e.message)
        })?;

        tracing::info!(
            project_id = %project.id(),
            correlation_id = %metadata.correlation_id(),
            "Project created"
        );
        Ok(project)
    }
}
