//! Signature token generator port.

use crate::domain::project::SignatureToken;

/// Produces unguessable signature tokens.
///
/// Implementations must draw at least 128 bits from a cryptographically
/// secure source.
pub trait TokenGenerator: Send + Sync {
    fn generate(&self) -> SignatureToken;
}
