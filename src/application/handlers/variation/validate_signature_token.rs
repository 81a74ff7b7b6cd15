//! ValidateSignatureTokenHandler - Query handler backing the public signing page.

use std::sync::Arc;

use crate::application::SignatureTokenService;
use crate::domain::foundation::VariationId;
use crate::domain::project::{Project, SignatureToken, Variation, VariationError};

/// Query to check a signing link before showing it.
#[derive(Debug, Clone)]
pub struct ValidateSignatureTokenQuery {
    pub token: String,
}

/// A live token and what it grants access to.
#[derive(Debug, Clone)]
pub struct ValidatedSignatureToken {
    pub project: Project,
    pub variation_id: VariationId,
}

impl ValidatedSignatureToken {
    pub fn variation(&self) -> Option<&Variation> {
        self.project.variation(self.variation_id)
    }
}

/// Handler for validating signature tokens.
///
/// Unknown, malformed, consumed and expired tokens are indistinguishable.
pub struct ValidateSignatureTokenHandler {
    tokens: Arc<SignatureTokenService>,
}

impl ValidateSignatureTokenHandler {
    pub fn new(tokens: Arc<SignatureTokenService>) -> Self {
        Self { tokens }
    }

    pub async fn handle(
        &self,
        query: ValidateSignatureTokenQuery,
    ) -> Result<ValidatedSignatureToken, VariationError> {
        let token = SignatureToken::parse(&query.token)
            .map_err(|_| VariationError::TokenInvalidOrExpired)?;

        let (project, variation_id) = self
            .tokens
            .resolve(&token)
            .await?
            .ok_or(VariationError::TokenInvalidOrExpired)?;

        Ok(ValidatedSignatureToken {
            project,
            variation_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{fields, start, Harness};
    use super::*;
    use crate::domain::project::{Signatory, TokenGrant};

    fn handler(h: &Harness) -> ValidateSignatureTokenHandler {
        ValidateSignatureTokenHandler::new(h.tokens.clone())
    }

    async fn submitted(h: &Harness) -> (VariationId, TokenGrant) {
        let project = h.project(1_000).await;
        let grant = h.tokens.issue();
        let (_, vid) = h
            .writer
            .modify(project.id(), |p| {
                let (details, cost) = fields(500).into_domain()?;
                let vid = p.add_variation(details, cost, start())?;
                p.submit_variation(vid, grant.clone(), start())?;
                Ok(vid)
            })
            .await
            .unwrap();
        (vid, grant)
    }

    fn query(token: &str) -> ValidateSignatureTokenQuery {
        ValidateSignatureTokenQuery {
            token: token.to_string(),
        }
    }

    #[tokio::test]
    async fn live_token_resolves_to_variation() {
        let h = Harness::new();
        let (vid, grant) = submitted(&h).await;

        let validated = handler(&h).handle(query(grant.token.expose())).await.unwrap();

        assert_eq!(validated.variation_id, vid);
        assert_eq!(validated.variation().unwrap().cost().cents(), 500);
    }

    #[tokio::test]
    async fn expired_token_is_invalid() {
        let h = Harness::new();
        let (_, grant) = submitted(&h).await;
        h.clock.advance_secs(24 * 3_600 + 1);

        let err = handler(&h).handle(query(grant.token.expose())).await.unwrap_err();

        assert_eq!(err, VariationError::TokenInvalidOrExpired);
    }

    #[tokio::test]
    async fn consumed_token_is_invalid() {
        let h = Harness::new();
        let (_, grant) = submitted(&h).await;
        let project = h.tokens.locate(&grant.token).await.unwrap().unwrap();
        h.writer
            .modify(project.id(), |p| {
                p.sign_variation(&grant.token, Signatory::new("C", None, None, None)?, start())
            })
            .await
            .unwrap();

        let err = handler(&h).handle(query(grant.token.expose())).await.unwrap_err();

        assert_eq!(err, VariationError::TokenInvalidOrExpired);
    }

    #[tokio::test]
    async fn garbage_is_invalid() {
        let h = Harness::new();
        let err = handler(&h).handle(query("!!not a token!!")).await.unwrap_err();
        assert_eq!(err, VariationError::TokenInvalidOrExpired);
    }
}
