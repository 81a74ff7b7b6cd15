//! GetProjectHandler - Query handler for one project with its variations.

use std::sync::Arc;

use crate::application::ProjectWriter;
use crate::domain::foundation::{ProjectId, UserId};
use crate::domain::project::{Project, VariationError};

/// Query to get a project by ID.
#[derive(Debug, Clone)]
pub struct GetProjectQuery {
    pub project_id: ProjectId,
    pub user_id: UserId,
}

/// Handler for retrieving a project.
pub struct GetProjectHandler {
    writer: Arc<ProjectWriter>,
}

impl GetProjectHandler {
    pub fn new(writer: Arc<ProjectWriter>) -> Self {
        Self { writer }
    }

    pub async fn handle(&self, query: GetProjectQuery) -> Result<Project, VariationError> {
        self.writer
            .load_owned(query.project_id, &query.user_id)
            .await
    }
}
