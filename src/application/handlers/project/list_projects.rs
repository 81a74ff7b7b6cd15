//! ListProjectsHandler - Query handler for the caller's projects.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::project::{Project, VariationError};
use crate::ports::ProjectRepository;

/// Query to list a user's projects, most recently updated first.
#[derive(Debug, Clone)]
pub struct ListProjectsQuery {
    pub user_id: UserId,
}

pub struct ListProjectsHandler {
    repository: Arc<dyn ProjectRepository>,
}

impl ListProjectsHandler {
    pub fn new(repository: Arc<dyn ProjectRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: ListProjectsQuery) -> Result<Vec<Project>, VariationError> {
        self.repository
            .find_by_owner(&query.user_id)
            .await
            .map_err(|e| {
                tracing::error!(user_id = %query.user_id, error = %e, "Failed to list projects");
                VariationError::infrastructure(e.message)
            })
    }
}
