//! Signature token issuance and resolution.
//!
//! Tokens are generated here and stored on the variation itself. The
//! optional [`SignatureTokenIndex`] only speeds up resolution: a failing or
//! stale index degrades to a scan, never to a wrong answer.

use std::sync::Arc;

use chrono::Duration;

use crate::domain::foundation::{ProjectId, VariationId};
use crate::domain::project::{Project, SignatureToken, TokenGrant, Variation, VariationError};
use crate::ports::{Clock, ProjectRepository, SignatureTokenIndex, TokenGenerator, TokenLocation};

/// Default token lifetime.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Issues, resolves and revokes signature tokens.
#[derive(Clone)]
pub struct SignatureTokenService {
    repository: Arc<dyn ProjectRepository>,
    index: Option<Arc<dyn SignatureTokenIndex>>,
    generator: Arc<dyn TokenGenerator>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl SignatureTokenService {
    pub fn new(
        repository: Arc<dyn ProjectRepository>,
        generator: Arc<dyn TokenGenerator>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
    ) -> Self {
        Self {
            repository,
            index: None,
            generator,
            clock,
            ttl,
        }
    }

    pub fn with_index(mut self, index: Arc<dyn SignatureTokenIndex>) -> Self {
        self.index = Some(index);
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Draws a fresh token valid from now until now + ttl.
    pub fn issue(&self) -> TokenGrant {
        let issued_at = self.clock.now();
        TokenGrant {
            token: self.generator.generate(),
            issued_at,
            expires_at: issued_at.plus(self.ttl),
        }
    }

    /// Adds a committed grant to the index, if there is one.
    pub async fn register(&self, grant: &TokenGrant, location: TokenLocation) {
        if let Some(index) = &self.index {
            if let Err(e) = index.register(&grant.token, location, grant.expires_at).await {
                tracing::warn!(
                    project_id = %location.project_id,
                    variation_id = %location.variation_id,
                    error = %e,
                    "Failed to index signature token"
                );
            }
        }
    }

    /// Drops a token from the index, if there is one.
    pub async fn revoke(&self, token: &SignatureToken) {
        if let Some(index) = &self.index {
            if let Err(e) = index.revoke(token).await {
                tracing::warn!(
                    fingerprint = %token.fingerprint(),
                    error = %e,
                    "Failed to revoke signature token from index"
                );
            }
        }
    }

    /// Finds the project whose variation holds `token`, expired or not.
    ///
    /// Signing uses this so the aggregate can tell expiry apart from an
    /// unknown token.
    pub async fn locate(&self, token: &SignatureToken) -> Result<Option<Project>, VariationError> {
        if let Some(project) = self.locate_indexed(token).await? {
            return Ok(Some(project));
        }

        let found = self
            .repository
            .find_by_signature_token(token)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Signature token scan failed");
                VariationError::infrastructure(e.message)
            })?;

        match found {
            Some(project) if project.find_by_signature_token(token).is_some() => Ok(Some(project)),
            _ => {
                tracing::debug!(fingerprint = %token.fingerprint(), "Signature token not found");
                Ok(None)
            }
        }
    }

    /// Resolves a live token to its project and variation.
    ///
    /// Unknown, consumed and expired tokens all resolve to `None`.
    pub async fn resolve(
        &self,
        token: &SignatureToken,
    ) -> Result<Option<(Project, VariationId)>, VariationError> {
        let now = self.clock.now();
        let Some(project) = self.locate(token).await? else {
            return Ok(None);
        };

        let live = project
            .find_by_signature_token(token)
            .filter(|v| v.has_live_token(token, &now))
            .map(Variation::id);

        match live {
            Some(variation_id) => Ok(Some((project, variation_id))),
            None => {
                tracing::debug!(
                    project_id = %project.id(),
                    "Signature token has expired"
                );
                Ok(None)
            }
        }
    }

    async fn locate_indexed(&self, token: &SignatureToken) -> Result<Option<Project>, VariationError> {
        let Some(index) = &self.index else {
            return Ok(None);
        };

        let location = match index.lookup(token).await {
            Ok(Some(location)) => location,
            Ok(None) => return Ok(None),
            Err(e) => {
                tracing::warn!(error = %e, "Signature token index lookup failed, scanning");
                return Ok(None);
            }
        };

        let project = self
            .repository
            .find_by_id(&location.project_id)
            .await
            .map_err(|e| {
                tracing::error!(project_id = %location.project_id, error = %e, "Project load failed");
                VariationError::infrastructure(e.message)
            })?;

        // The aggregate is authoritative; an index entry is only a hint.
        Ok(project.filter(|p| {
            p.find_by_signature_token(token)
                .map_or(false, |v| v.id() == location.variation_id)
        }))
    }
}

/// Builds the client-facing signing link.
pub fn signing_url(public_base_url: &str, token: &SignatureToken) -> String {
    format!(
        "{}/sign?token={}",
        public_base_url.trim_end_matches('/'),
        token.expose()
    )
}

/// Convenience for building index locations.
pub fn location(project_id: ProjectId, variation_id: VariationId) -> TokenLocation {
    TokenLocation {
        project_id,
        variation_id,
    }
}
