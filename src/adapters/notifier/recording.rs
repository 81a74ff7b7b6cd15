//! Notifier that records every message in memory. For tests.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::ports::{NotificationError, SignatureRequest, SignedConfirmation, VariationNotifier};

#[derive(Debug, Default)]
struct Recorded {
    signature_requests: Vec<SignatureRequest>,
    signed_confirmations: Vec<SignedConfirmation>,
}

/// Records notifications and can be told to fail or stall.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    recorded: Arc<Mutex<Recorded>>,
    failure: Option<NotificationError>,
    delay: Option<Duration>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every send records the message and then fails with `error`.
    pub fn failing(error: NotificationError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    /// Every send sleeps for `delay` before recording.
    pub fn stalling(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn signature_requests(&self) -> Vec<SignatureRequest> {
        self.lock().signature_requests.clone()
    }

    pub fn signed_confirmations(&self) -> Vec<SignedConfirmation> {
        self.lock().signed_confirmations.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn outcome(&self) -> Result<(), NotificationError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl VariationNotifier for RecordingNotifier {
    async fn send_signature_request(
        &self,
        request: &SignatureRequest,
    ) -> Result<(), NotificationError> {
        self.lock().signature_requests.push(request.clone());
        self.outcome().await
    }

    async fn send_signed_confirmation(
        &self,
        confirmation: &SignedConfirmation,
    ) -> Result<(), NotificationError> {
        self.lock().signed_confirmations.push(confirmation.clone());
        self.outcome().await
    }
}
