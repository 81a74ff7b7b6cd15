//! SignVariationHandler - Command handler for client signatures.
//!
//! Unauthenticated: possession of a live signature token is the credential.
//! A successful signature approves the variation, consumes the token and
//! moves the project's current contract price.

use std::sync::Arc;

use crate::application::{NotificationDispatcher, ProjectWriter, SignatureTokenService};
use crate::domain::foundation::VariationId;
use crate::domain::project::{Project, Signatory, SignatureToken, SignerContext, VariationError};
use crate::ports::{Clock, SignedConfirmation};

/// Command carrying a client's signature.
#[derive(Debug, Clone)]
pub struct SignVariationCommand {
    pub token: String,
    pub signer_name: String,
    pub signer_email: Option<String>,
    pub context: SignerContext,
}

/// Result of a successful signature.
#[derive(Debug, Clone)]
pub struct SignVariationResult {
    pub project: Project,
    pub variation_id: VariationId,
}

/// Handler for signing variations.
pub struct SignVariationHandler {
    writer: Arc<ProjectWriter>,
    tokens: Arc<SignatureTokenService>,
    dispatcher: NotificationDispatcher,
    clock: Arc<dyn Clock>,
}

impl SignVariationHandler {
    pub fn new(
        writer: Arc<ProjectWriter>,
        tokens: Arc<SignatureTokenService>,
        dispatcher: NotificationDispatcher,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            writer,
            tokens,
            dispatcher,
            clock,
        }
    }

    pub async fn handle(&self, cmd: SignVariationCommand) -> Result<SignVariationResult, VariationError> {
        let token =
            SignatureToken::parse(&cmd.token).map_err(|_| VariationError::TokenInvalidOrExpired)?;
        let signatory = Signatory::from_context(cmd.signer_name, cmd.signer_email, cmd.context)?;

        let located = self
            .tokens
            .locate(&token)
            .await?
            .ok_or(VariationError::TokenInvalidOrExpired)?;

        let now = self.clock.now();
        let (project, variation_id) = self
            .writer
            .modify(located.id(), |project| {
                project.sign_variation(&token, signatory.clone(), now)
            })
            .await
            .map_err(|e| {
                if e.is_signature_link_error() {
                    tracing::info!(
                        project_id = %located.id(),
                        fingerprint = %token.fingerprint(),
                        reason = %e,
                        "Signature rejected"
                    );
                }
                e
            })?;

        self.tokens.revoke(&token).await;

        if let Some(variation) = project.variation(variation_id) {
            self.dispatcher
                .signed_confirmation(SignedConfirmation {
                    project_id: project.id(),
                    project_name: project.name().to_string(),
                    variation_id,
                    variation_number: variation.number(),
                    signer_name: signatory.name.clone(),
                    signer_email: signatory.email.clone(),
                    client_email: project.client().email.clone(),
                    signed_at: now,
                    current_contract_price: project.current_contract_price(),
                })
                .await;
        }

        tracing::info!(
            project_id = %project.id(),
            variation_id = %variation_id,
            current_contract_price = %project.current_contract_price(),
            "Variation signed"
        );
        Ok(SignVariationResult {
            project,
            variation_id,
        })
    }
}
