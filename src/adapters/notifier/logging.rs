//! Notifier that only writes log lines.
//!
//! Used when no email provider is configured. Signing links are not logged.

use async_trait::async_trait;

use crate::ports::{NotificationError, SignatureRequest, SignedConfirmation, VariationNotifier};

#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNotifier;

#[async_trait]
impl VariationNotifier for LoggingNotifier {
    async fn send_signature_request(
        &self,
        request: &SignatureRequest,
    ) -> Result<(), NotificationError> {
        tracing::info!(
            project_id = %request.project_id,
            variation_id = %request.variation_id,
            expires_at = %request.expires_at.as_datetime(),
            "Signature request ready (email delivery disabled)"
        );
        Ok(())
    }

    async fn send_signed_confirmation(
        &self,
        confirmation: &SignedConfirmation,
    ) -> Result<(), NotificationError> {
        tracing::info!(
            project_id = %confirmation.project_id,
            variation_id = %confirmation.variation_id,
            "Variation signed (email delivery disabled)"
        );
        Ok(())
    }
}
