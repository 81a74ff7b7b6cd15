//! Best-effort notification dispatch.
//!
//! Notifications go out after the aggregate is committed. A failed or slow
//! delivery is logged and dropped; it never changes the command's result.

use std::sync::Arc;
use std::time::Duration;

use crate::ports::{NotificationError, SignatureRequest, SignedConfirmation, VariationNotifier};

/// Default upper bound on a single delivery.
pub const DEFAULT_NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(10);

/// How deliveries are scheduled relative to the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    /// Spawned on a tokio task; the request does not wait.
    Detached,
    /// Awaited before the request completes. Deterministic, for tests.
    Inline,
}

/// Sends notifications without letting failures escape.
#[derive(Clone)]
pub struct NotificationDispatcher {
    notifier: Arc<dyn VariationNotifier>,
    timeout: Duration,
    mode: DispatchMode,
}

impl NotificationDispatcher {
    pub fn new(notifier: Arc<dyn VariationNotifier>, timeout: Duration, mode: DispatchMode) -> Self {
        Self {
            notifier,
            timeout,
            mode,
        }
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    pub async fn signature_request(&self, request: SignatureRequest) {
        let notifier = self.notifier.clone();
        let timeout = self.timeout;
        self.run(async move {
            let outcome =
                tokio::time::timeout(timeout, notifier.send_signature_request(&request)).await;
            log_outcome(
                "signature_request",
                &request.project_id.to_string(),
                &request.variation_id.to_string(),
                flatten(outcome),
            );
        })
        .await;
    }

    pub async fn signed_confirmation(&self, confirmation: SignedConfirmation) {
        let notifier = self.notifier.clone();
        let timeout = self.timeout;
        self.run(async move {
            let outcome =
                tokio::time::timeout(timeout, notifier.send_signed_confirmation(&confirmation))
                    .await;
            log_outcome(
                "signed_confirmation",
                &confirmation.project_id.to_string(),
                &confirmation.variation_id.to_string(),
                flatten(outcome),
            );
        })
        .await;
    }

    async fn run<F>(&self, delivery: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        match self.mode {
            DispatchMode::Detached => {
                tokio::spawn(delivery);
            }
            DispatchMode::Inline => delivery.await,
        }
    }
}

fn flatten(
    outcome: Result<Result<(), NotificationError>, tokio::time::error::Elapsed>,
) -> Result<(), NotificationError> {
    outcome.unwrap_or(Err(NotificationError::Timeout))
}

fn log_outcome(kind: &str, project_id: &str, variation_id: &str, outcome: Result<(), NotificationError>) {
    match outcome {
        Ok(()) => tracing::debug!(kind, project_id, variation_id, "Notification sent"),
        Err(e) => tracing::warn!(
            kind,
            project_id,
            variation_id,
            error = %e,
            "Notification failed; continuing"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::notifier::RecordingNotifier;
    use crate::domain::foundation::{Money, ProjectId, Timestamp, VariationId};

    fn request() -> SignatureRequest {
        SignatureRequest {
            project_id: ProjectId::new(),
            project_name: "Harbour St".to_string(),
            variation_id: VariationId::new(),
            variation_number: 1,
            description: "Extra steel".to_string(),
            cost: Money::ZERO,
            client_name: "Client".to_string(),
            client_email: "client@example.com".to_string(),
            signing_url: "https://app.example.com/sign?token=x".to_string(),
            expires_at: Timestamp::from_unix_secs(1_700_000_000).unwrap(),
        }
    }

    #[tokio::test]
    async fn inline_dispatch_delivers_before_returning() {
        let notifier = RecordingNotifier::new();
        let dispatcher = NotificationDispatcher::new(
            Arc::new(notifier.clone()),
            DEFAULT_NOTIFICATION_TIMEOUT,
            DispatchMode::Inline,
        );

        dispatcher.signature_request(request()).await;

        assert_eq!(notifier.signature_requests().len(), 1);
    }

    #[tokio::test]
    async fn failures_are_swallowed() {
        let notifier = RecordingNotifier::failing(NotificationError::Unavailable("down".into()));
        let dispatcher = NotificationDispatcher::new(
            Arc::new(notifier.clone()),
            DEFAULT_NOTIFICATION_TIMEOUT,
            DispatchMode::Inline,
        );

        dispatcher.signature_request(request()).await;

        assert_eq!(notifier.signature_requests().len(), 1);
    }

    #[tokio::test]
    async fn slow_delivery_is_cut_off() {
        let notifier = RecordingNotifier::stalling(Duration::from_secs(60));
        let dispatcher = NotificationDispatcher::new(
            Arc::new(notifier.clone()),
            Duration::from_millis(50),
            DispatchMode::Inline,
        );

        let started = tokio::time::Instant::now();
        dispatcher.signature_request(request()).await;

        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(notifier.signature_requests().len(), 1);
    }

    #[tokio::test]
    async fn detached_dispatch_eventually_delivers() {
        let notifier = RecordingNotifier::new();
        let dispatcher = NotificationDispatcher::new(
            Arc::new(notifier.clone()),
            DEFAULT_NOTIFICATION_TIMEOUT,
            DispatchMode::Detached,
        );

        dispatcher.signature_request(request()).await;
        for _ in 0..100 {
            if !notifier.signature_requests().is_empty() {
                break;
            }
            tokio::task::yield_now().await;
        }

        assert_eq!(notifier.signature_requests().len(), 1);
    }
}
