//! Signature token index port.
//!
//! An optional inverted index from signature token to the variation that
//! holds it, so signing does not need to scan every project. The index is a
//! cache: the Project aggregate stays authoritative and every hit is
//! re-verified against it.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{ProjectId, Timestamp, VariationId};
use crate::domain::project::SignatureToken;

/// Where a token points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLocation {
    pub project_id: ProjectId,
    pub variation_id: VariationId,
}

/// Port for the token -> variation index.
///
/// Entries must stop resolving once `expires_at` has passed.
#[async_trait]
pub trait SignatureTokenIndex: Send + Sync {
    /// Records a token until `expires_at`.
    async fn register(
        &self,
        token: &SignatureToken,
        location: TokenLocation,
        expires_at: Timestamp,
    ) -> Result<(), TokenIndexError>;

    /// Looks a token up. Expired and unknown tokens both return `None`.
    async fn lookup(&self, token: &SignatureToken) -> Result<Option<TokenLocation>, TokenIndexError>;

    /// Removes a token. Removing an absent token is not an error.
    async fn revoke(&self, token: &SignatureToken) -> Result<(), TokenIndexError>;
}

/// Errors from token index operations.
#[derive(Debug, Clone, Error)]
pub enum TokenIndexError {
    /// Index backend is unavailable.
    #[error("token index unavailable: {0}")]
    Unavailable(String),

    /// Stored entry could not be decoded.
    #[error("corrupt token index entry: {0}")]
    Corrupt(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_index_is_object_safe() {
        fn _accepts_dyn(_index: &dyn SignatureTokenIndex) {}
    }
}
