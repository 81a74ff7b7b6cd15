//! Project repository port.
//!
//! Persists whole Project aggregates, variations included. Every update is a
//! compare-and-swap on the aggregate's `version`.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ProjectId, UserId};
use crate::domain::project::{Project, SignatureToken};

/// Repository port for Project aggregate persistence.
///
/// Implementations must ensure:
/// - `update` only succeeds when the stored version equals `project.version()`
/// - the aggregate (variations, token fields, price) is written atomically
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Save a new project at its current version.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure or duplicate id
    async fn insert(&self, project: &Project) -> Result<(), DomainError>;

    /// Write an existing project if nobody else has since the load.
    ///
    /// Returns the new version, which is always `project.version() + 1`.
    ///
    /// # Errors
    ///
    /// - `ConcurrencyConflict` if the stored version moved on
    /// - `ProjectNotFound` if the project no longer exists
    /// - `DatabaseError` on persistence failure
    async fn update(&self, project: &Project) -> Result<u64, DomainError>;

    /// Find a project by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, DomainError>;

    /// Find all projects owned by a user, most recently updated first.
    async fn find_by_owner(&self, owner_id: &UserId) -> Result<Vec<Project>, DomainError>;

    /// Find the project holding a variation with this signature token.
    ///
    /// Scans every project. Expired tokens still match; callers decide
    /// whether the token is live.
    async fn find_by_signature_token(
        &self,
        token: &SignatureToken,
    ) -> Result<Option<Project>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn ProjectRepository) {}
    }
}
