//! Variation notifier port.
//!
//! Delivers the signing link to the client and the signed confirmation to
//! the project owner. Delivery is best-effort: a failure here never undoes a
//! committed variation change.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{Money, ProjectId, Timestamp, VariationId};

/// Everything needed to ask a client for a signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureRequest {
    pub project_id: ProjectId,
    pub project_name: String,
    pub variation_id: VariationId,
    pub variation_number: u32,
    pub description: String,
    pub cost: Money,
    pub client_name: String,
    pub client_email: String,
    /// Full link including the token. Never logged.
    pub signing_url: String,
    pub expires_at: Timestamp,
}

/// Confirmation that a variation was signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedConfirmation {
    pub project_id: ProjectId,
    pub project_name: String,
    pub variation_id: VariationId,
    pub variation_number: u32,
    pub signer_name: String,
    pub signer_email: Option<String>,
    pub client_email: String,
    pub signed_at: Timestamp,
    pub current_contract_price: Money,
}

/// Port for outbound variation notifications.
#[async_trait]
pub trait VariationNotifier: Send + Sync {
    async fn send_signature_request(&self, request: &SignatureRequest)
        -> Result<(), NotificationError>;

    async fn send_signed_confirmation(
        &self,
        confirmation: &SignedConfirmation,
    ) -> Result<(), NotificationError>;
}

/// Errors from notification delivery.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotificationError {
    /// Provider could not be reached.
    #[error("notification provider unavailable: {0}")]
    Unavailable(String),

    /// Provider refused the message.
    #[error("notification rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Delivery took longer than the configured timeout.
    #[error("notification timed out")]
    Timeout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifier_is_object_safe() {
        fn _accepts_dyn(_notifier: &dyn VariationNotifier) {}
    }

    #[test]
    fn rejected_error_includes_status() {
        let err = NotificationError::Rejected {
            status: 422,
            message: "invalid from".to_string(),
        };
        assert_eq!(err.to_string(), "notification rejected (422): invalid from");
    }
}
