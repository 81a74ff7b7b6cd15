//! Resend email notifier.
//!
//! Sends variation emails through the Resend HTTP API. The signing link in
//! a signature request is a bearer credential, so message bodies are never
//! logged.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::ports::{NotificationError, SignatureRequest, SignedConfirmation, VariationNotifier};

const DEFAULT_API_BASE_URL: &str = "https://api.resend.com";

/// Resend API configuration.
#[derive(Clone)]
pub struct ResendConfig {
    api_key: SecretString,
    /// Formatted sender, e.g. `Ledger <noreply@example.com>`.
    from: String,
    api_base_url: String,
}

impl ResendConfig {
    pub fn new(api_key: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            from: from.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }

    /// Points the adapter at another base URL (for test servers).
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: String,
    text: String,
}

/// Notifier backed by Resend.
pub struct ResendNotifier {
    config: ResendConfig,
    http_client: reqwest::Client,
}

impl ResendNotifier {
    pub fn new(config: ResendConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    async fn send(&self, email: SendEmailRequest<'_>) -> Result<(), NotificationError> {
        let url = format!("{}/emails", self.config.api_base_url.trim_end_matches('/'));
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&email)
            .send()
            .await
            .map_err(|e| NotificationError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(NotificationError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }
}

fn signature_request_email<'a>(from: &'a str, request: &'a SignatureRequest) -> SendEmailRequest<'a> {
    SendEmailRequest {
        from,
        to: vec![request.client_email.as_str()],
        subject: format!(
            "Variation #{} for {} is ready to sign",
            request.variation_number, request.project_name
        ),
        text: format!(
            "Hi {},\n\n\
             Variation #{} on {} needs your approval.\n\n\
             {}\n\
             Cost: ${}\n\n\
             Review and sign here: {}\n\n\
             This link can be used once and expires at {}.\n",
            request.client_name,
            request.variation_number,
            request.project_name,
            request.description,
            request.cost,
            request.signing_url,
            request.expires_at.as_datetime().to_rfc2822(),
        ),
    }
}

fn signed_confirmation_email<'a>(
    from: &'a str,
    confirmation: &'a SignedConfirmation,
) -> SendEmailRequest<'a> {
    let mut to = vec![confirmation.client_email.as_str()];
    if let Some(signer) = confirmation.signer_email.as_deref() {
        if signer != confirmation.client_email {
            to.push(signer);
        }
    }
    SendEmailRequest {
        from,
        to,
        subject: format!(
            "Variation #{} for {} has been signed",
            confirmation.variation_number, confirmation.project_name
        ),
        text: format!(
            "Variation #{} on {} was signed by {} at {}.\n\
             The contract price is now ${}.\n",
            confirmation.variation_number,
            confirmation.project_name,
            confirmation.signer_name,
            confirmation.signed_at.as_datetime().to_rfc2822(),
            confirmation.current_contract_price,
        ),
    }
}

#[async_trait]
impl VariationNotifier for ResendNotifier {
    async fn send_signature_request(
        &self,
        request: &SignatureRequest,
    ) -> Result<(), NotificationError> {
        self.send(signature_request_email(&self.config.from, request))
            .await
    }

    async fn send_signed_confirmation(
        &self,
        confirmation: &SignedConfirmation,
    ) -> Result<(), NotificationError> {
        self.send(signed_confirmation_email(&self.config.from, confirmation))
            .await
    }
}

impl std::fmt::Debug for ResendNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResendNotifier")
            .field("from", &self.config.from)
            .field("api_base_url", &self.config.api_base_url)
            .finish_non_exhaustive()
    }
}
