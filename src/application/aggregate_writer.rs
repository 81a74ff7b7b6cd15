//! Load, mutate, persist loop for Project aggregates.
//!
//! Every variation command runs through [`ProjectWriter::modify`]. The
//! mutation closure is re-run from a fresh load whenever the repository
//! reports a version conflict, so two writers racing on one project both see
//! a consistent aggregate and neither overwrites the other.

use std::sync::Arc;

use crate::domain::foundation::{ErrorCode, OwnedByUser, ProjectId, UserId};
use crate::domain::project::{Project, VariationError};
use crate::ports::ProjectRepository;

/// Default number of attempts before a conflict is reported.
pub const DEFAULT_MAX_CONFLICT_RETRIES: u32 = 3;

/// Runs aggregate mutations under optimistic concurrency.
#[derive(Clone)]
pub struct ProjectWriter {
    repository: Arc<dyn ProjectRepository>,
    max_attempts: u32,
}

impl ProjectWriter {
    pub fn new(repository: Arc<dyn ProjectRepository>, max_conflict_retries: u32) -> Self {
        Self {
            repository,
            max_attempts: max_conflict_retries.max(1),
        }
    }

    pub fn repository(&self) -> &Arc<dyn ProjectRepository> {
        &self.repository
    }

    /// Loads a project or reports it missing.
    pub async fn load(&self, id: ProjectId) -> Result<Project, VariationError> {
        self.repository
            .find_by_id(&id)
            .await
            .map_err(|e| infrastructure(id, e))?
            .ok_or(VariationError::ProjectNotFound(id))
    }

    /// Loads a project the user owns.
    pub async fn load_owned(&self, id: ProjectId, user: &UserId) -> Result<Project, VariationError> {
        let project = self.load(id).await?;
        project.check_ownership(user)?;
        Ok(project)
    }

    /// Applies `op` to the latest stored version of a project and persists it.
    ///
    /// `op` may run more than once and must not have side effects outside
    /// the aggregate. Returns the persisted aggregate and `op`'s output.
    ///
    /// # Errors
    ///
    /// - whatever `op` returns, unchanged
    /// - `ProjectNotFound` if the project is missing or vanishes mid-write
    /// - `Conflict` when every attempt lost a race
    /// - `Infrastructure` on storage failure
    pub async fn modify<T, F>(&self, id: ProjectId, mut op: F) -> Result<(Project, T), VariationError>
    where
        F: FnMut(&mut Project) -> Result<T, VariationError> + Send,
        T: Send,
    {
        for attempt in 1..=self.max_attempts {
            let mut project = self.load(id).await?;
            let output = op(&mut project)?;
            project.reconcile();

            match self.repository.update(&project).await {
                Ok(version) => {
                    project.record_persisted_version(version);
                    return Ok((project, output));
                }
                Err(e) if e.code == ErrorCode::ConcurrencyConflict => {
                    tracing::debug!(
                        project_id = %id,
                        attempt,
                        "Version conflict, reloading project"
                    );
                }
                Err(e) if e.code == ErrorCode::ProjectNotFound => {
                    return Err(VariationError::ProjectNotFound(id));
                }
                Err(e) => return Err(infrastructure(id, e)),
            }
        }

        tracing::warn!(
            project_id = %id,
            attempts = self.max_attempts,
            "Gave up after repeated version conflicts"
        );
        Err(VariationError::Conflict(format!(
            "project {} was modified concurrently; retry the request",
            id
        )))
    }
}

fn infrastructure(id: ProjectId, e: crate::domain::foundation::DomainError) -> VariationError {
    tracing::error!(project_id = %id, error = %e, "Project storage failure");
    VariationError::infrastructure(e.message)
}
