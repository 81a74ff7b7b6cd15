//! EditVariationHandler - Command handler for revising a variation.

use std::sync::Arc;

use crate::application::ProjectWriter;
use crate::domain::foundation::{CommandMetadata, OwnedByUser, ProjectId, VariationId};
use crate::domain::project::{Project, VariationError, VariationMutationPolicy};
use crate::ports::Clock;

use super::VariationFields;

/// Command to replace a variation's fields.
#[derive(Debug, Clone)]
pub struct EditVariationCommand {
    pub project_id: ProjectId,
    pub variation_id: VariationId,
    pub fields: VariationFields,
}

/// Handler for editing variations.
///
/// Which statuses may be edited comes from the configured policy.
pub struct EditVariationHandler {
    writer: Arc<ProjectWriter>,
    clock: Arc<dyn Clock>,
    policy: VariationMutationPolicy,
}

impl EditVariationHandler {
    pub fn new(
        writer: Arc<ProjectWriter>,
        clock: Arc<dyn Clock>,
        policy: VariationMutationPolicy,
    ) -> Self {
        Self {
            writer,
            clock,
            policy,
        }
    }

    pub async fn handle(
        &self,
        cmd: EditVariationCommand,
        metadata: CommandMetadata,
    ) -> Result<Project, VariationError> {
        let (details, cost) = cmd.fields.into_domain()?;
        let now = self.clock.now();

        let (project, ()) = self
            .writer
            .modify(cmd.project_id, |project| {
                project.check_ownership(&metadata.user_id)?;
                project.edit_variation(cmd.variation_id, details.clone(), cost, &self.policy, now)
            })
            .await?;

        tracing::info!(
            project_id = %cmd.project_id,
            variation_id = %cmd.variation_id,
            correlation_id = %metadata.correlation_id(),
            "Variation edited"
        );
        Ok(project)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{fields, start, Harness};
    use super::*;
    use crate::domain::project::TokenGrant;
    use crate::application::signature_tokens::DEFAULT_TOKEN_TTL_HOURS;

    fn handler(h: &Harness, policy: VariationMutationPolicy) -> EditVariationHandler {
        EditVariationHandler::new(h.writer.clone(), h.clock.clone(), policy)
    }

    async fn with_variation(h: &Harness) -> (ProjectId, VariationId) {
        let project = h.project(1_000).await;
        let (saved, vid) = h
            .writer
            .modify(project.id(), |p| {
                let (details, cost) = fields(100).into_domain()?;
                p.add_variation(details, cost, start())
            })
            .await
            .unwrap();
        (saved.id(), vid)
    }

    async fn submit(h: &Harness, pid: ProjectId, vid: VariationId) -> TokenGrant {
        let grant = h.tokens.issue();
        let g = grant.clone();
        h.writer
            .modify(pid, move |p| p.submit_variation(vid, g.clone(), start()))
            .await
            .unwrap();
        assert_eq!(grant.expires_at, start().plus_hours(DEFAULT_TOKEN_TTL_HOURS));
        grant
    }

    #[tokio::test]
    async fn draft_edit_updates_fields() {
        let h = Harness::new();
        let (pid, vid) = with_variation(&h).await;
        let mut changed = fields(900);
        changed.description = "Bigger skylight".to_string();

        let project = handler(&h, VariationMutationPolicy::default())
            .handle(
                EditVariationCommand {
                    project_id: pid,
                    variation_id: vid,
                    fields: changed,
                },
                h.metadata(),
            )
            .await
            .unwrap();

        let v = project.variation(vid).unwrap();
        assert_eq!(v.details().description(), "Bigger skylight");
        assert_eq!(v.cost().cents(), 900);
    }

    #[tokio::test]
    async fn submitted_edit_rejected_by_default() {
        let h = Harness::new();
        let (pid, vid) = with_variation(&h).await;
        submit(&h, pid, vid).await;

        let err = handler(&h, VariationMutationPolicy::default())
            .handle(
                EditVariationCommand {
                    project_id: pid,
                    variation_id: vid,
                    fields: fields(5),
                },
                h.metadata(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, VariationError::OperationNotAllowed { operation: "edit", .. }));
    }

    #[tokio::test]
    async fn permitted_submitted_edit_keeps_token() {
        let h = Harness::new();
        let (pid, vid) = with_variation(&h).await;
        let grant = submit(&h, pid, vid).await;
        let policy = VariationMutationPolicy::from_lists("draft,submitted", "draft").unwrap();

        let project = handler(&h, policy)
            .handle(
                EditVariationCommand {
                    project_id: pid,
                    variation_id: vid,
                    fields: fields(5),
                },
                h.metadata(),
            )
            .await
            .unwrap();

        assert_eq!(
            project.variation(vid).unwrap().signature_token(),
            Some(&grant.token)
        );
    }

    #[tokio::test]
    async fn unknown_variation_is_not_found() {
        let h = Harness::new();
        let (pid, _) = with_variation(&h).await;
        let missing = VariationId::new();

        let err = handler(&h, VariationMutationPolicy::default())
            .handle(
                EditVariationCommand {
                    project_id: pid,
                    variation_id: missing,
                    fields: fields(5),
                },
                h.metadata(),
            )
            .await
            .unwrap_err();

        assert_eq!(err, VariationError::VariationNotFound(missing));
    }
}
