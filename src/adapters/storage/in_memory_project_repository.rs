//! In-Memory Project Repository Adapter
//!
//! Stores Project aggregates in a map guarded by a tokio `RwLock`.
//! Useful for tests and local runs without PostgreSQL.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, OwnedByUser, ProjectId, UserId};
use crate::domain::project::{Project, SignatureToken};
use crate::ports::ProjectRepository;

/// In-memory storage for projects.
///
/// The write lock makes the version check and the write one step, which is
/// the same compare-and-swap the PostgreSQL adapter performs in SQL.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProjectRepository {
    projects: Arc<RwLock<HashMap<ProjectId, Project>>>,
}

impl InMemoryProjectRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored projects.
    pub async fn len(&self) -> usize {
        self.projects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.projects.read().await.is_empty()
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn insert(&self, project: &Project) -> Result<(), DomainError> {
        let mut projects = self.projects.write().await;
        if projects.contains_key(&project.id()) {
            return Err(DomainError::database(format!(
                "project {} already exists",
                project.id()
            )));
        }
        projects.insert(project.id(), project.clone());
        Ok(())
    }

    async fn update(&self, project: &Project) -> Result<u64, DomainError> {
        let mut projects = self.projects.write().await;
        let stored = projects.get(&project.id()).ok_or_else(|| {
            DomainError::new(
                ErrorCode::ProjectNotFound,
                format!("Project not found: {}", project.id()),
            )
        })?;

        if stored.version() != project.version() {
            return Err(DomainError::conflict(format!(
                "project {} is at version {}, write was based on {}",
                project.id(),
                stored.version(),
                project.version()
            )));
        }

        let next_version = project.version() + 1;
        let mut next = project.clone();
        next.record_persisted_version(next_version);
        projects.insert(project.id(), next);
        Ok(next_version)
    }

    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, DomainError> {
        Ok(self.projects.read().await.get(id).cloned())
    }

    async fn find_by_owner(&self, owner_id: &UserId) -> Result<Vec<Project>, DomainError> {
        let projects = self.projects.read().await;
        let mut owned: Vec<Project> = projects
            .values()
            .filter(|p| p.is_owner(owner_id))
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.updated_at().cmp(a.updated_at()));
        Ok(owned)
    }

    async fn find_by_signature_token(
        &self,
        token: &SignatureToken,
    ) -> Result<Option<Project>, DomainError> {
        let projects = self.projects.read().await;
        Ok(projects
            .values()
            .find(|p| p.find_by_signature_token(token).is_some())
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Money, Timestamp};
    use crate::domain::project::{ClientContact, TokenGrant, VariationDetails};

    fn project(owner: &str, at: i64) -> Project {
        Project::new(
            ProjectId::new(),
            UserId::new(owner).unwrap(),
            "Kitchen fit-out",
            ClientContact::new("Client", "client@example.com").unwrap(),
            Money::try_from_dollars(100_000).unwrap(),
            Timestamp::from_unix_secs(at).unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn insert_then_find() {
        let repo = InMemoryProjectRepository::new();
        let p = project("owner-1", 1_700_000_000);

        repo.insert(&p).await.unwrap();

        assert_eq!(repo.find_by_id(&p.id()).await.unwrap(), Some(p));
    }

    #[tokio::test]
    async fn duplicate_insert_fails() {
        let repo = InMemoryProjectRepository::new();
        let p = project("owner-1", 1_700_000_000);
        repo.insert(&p).await.unwrap();

        assert!(repo.insert(&p).await.is_err());
    }

    #[tokio::test]
    async fn update_bumps_version() {
        let repo = InMemoryProjectRepository::new();
        let p = project("owner-1", 1_700_000_000);
        repo.insert(&p).await.unwrap();

        let version = repo.update(&p).await.unwrap();

        assert_eq!(version, 1);
        assert_eq!(repo.find_by_id(&p.id()).await.unwrap().unwrap().version(), 1);
    }

    #[tokio::test]
    async fn stale_update_conflicts() {
        let repo = InMemoryProjectRepository::new();
        let p = project("owner-1", 1_700_000_000);
        repo.insert(&p).await.unwrap();
        repo.update(&p).await.unwrap();

        let err = repo.update(&p).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ConcurrencyConflict);
    }

    #[tokio::test]
    async fn update_of_missing_project_is_not_found() {
        let repo = InMemoryProjectRepository::new();
        let err = repo.update(&project("owner-1", 0)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ProjectNotFound);
    }

    #[tokio::test]
    async fn find_by_owner_filters_and_orders_newest_first() {
        let repo = InMemoryProjectRepository::new();
        let older = project("owner-1", 1_700_000_000);
        let newer = project("owner-1", 1_700_100_000);
        let foreign = project("owner-2", 1_700_200_000);
        for p in [&older, &newer, &foreign] {
            repo.insert(p).await.unwrap();
        }

        let found = repo.find_by_owner(&UserId::new("owner-1").unwrap()).await.unwrap();

        let ids: Vec<_> = found.iter().map(Project::id).collect();
        assert_eq!(ids, vec![newer.id(), older.id()]);
    }

    #[tokio::test]
    async fn find_by_signature_token_scans_variations() {
        let repo = InMemoryProjectRepository::new();
        let now = Timestamp::from_unix_secs(1_700_000_000).unwrap();
        let mut p = project("owner-1", 1_700_000_000);
        let vid = p
            .add_variation(
                VariationDetails::new("d", "r", "e", false, 0).unwrap(),
                Money::ZERO,
                now,
            )
            .unwrap();
        let token = SignatureToken::from_random_bytes(&[5; 32]);
        p.submit_variation(
            vid,
            TokenGrant {
                token: token.clone(),
                issued_at: now,
                expires_at: now.plus_hours(24),
            },
            now,
        )
        .unwrap();
        repo.insert(&p).await.unwrap();
        repo.insert(&project("owner-1", 0)).await.unwrap();

        let found = repo.find_by_signature_token(&token).await.unwrap();
        let other = SignatureToken::from_random_bytes(&[6; 32]);

        assert_eq!(found.map(|p| p.id()), Some(p.id()));
        assert!(repo.find_by_signature_token(&other).await.unwrap().is_none());
    }
}
