//! Owner session port.
//!
//! Only owner routes authenticate a session. Clients signing a variation
//! present a signature token instead and never reach this port.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Turns a bearer token into the project owner it was issued to.
///
/// `InvalidToken` covers malformed, forged and foreign tokens alike;
/// `TokenExpired` is reserved for a genuine token past its expiry so the
/// frontend can refresh instead of logging out. `ServiceUnavailable` maps
/// to a 503.
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validates a raw token (no `Bearer ` prefix).
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}
