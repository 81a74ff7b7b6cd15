//! Signature token value objects.
//!
//! A signature token is the only credential a client presents when signing a
//! variation. It is opaque, single-use, and expires a fixed time after issue.
//! The raw value never appears in `Debug` output or logs; use
//! [`SignatureToken::fingerprint`] when a stable reference is needed.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use subtle::ConstantTimeEq;

use crate::domain::foundation::{Timestamp, ValidationError};

/// Shortest accepted token. 22 URL-safe base64 chars carry 132 bits.
pub const MIN_TOKEN_LENGTH: usize = 22;

/// Longest accepted token.
pub const MAX_TOKEN_LENGTH: usize = 128;

/// An opaque signature token.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignatureToken(String);

impl SignatureToken {
    /// Parses a token presented by a client.
    ///
    /// Only shape is checked here: length and the URL-safe alphabet.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ValidationError::empty_field("token"));
        }
        if raw.len() < MIN_TOKEN_LENGTH || raw.len() > MAX_TOKEN_LENGTH {
            return Err(ValidationError::out_of_range(
                "token",
                MIN_TOKEN_LENGTH as i64,
                MAX_TOKEN_LENGTH as i64,
                raw.len() as i64,
            ));
        }
        if !raw
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            return Err(ValidationError::invalid_format(
                "token",
                "unexpected character",
            ));
        }
        Ok(Self(raw.to_string()))
    }

    /// Encodes freshly generated random bytes as a token.
    pub fn from_random_bytes(bytes: &[u8]) -> Self {
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Returns the raw token, for building signing links and persistence.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Constant-time comparison against a presented token.
    pub fn matches(&self, presented: &SignatureToken) -> bool {
        self.0.as_bytes().ct_eq(presented.0.as_bytes()).into()
    }

    /// SHA-256 digest of the token, URL-safe base64.
    ///
    /// Used as the token index key so stores never hold raw tokens.
    pub fn fingerprint(&self) -> String {
        URL_SAFE_NO_PAD.encode(Sha256::digest(self.0.as_bytes()))
    }
}

impl fmt::Debug for SignatureToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SignatureToken(<redacted>)")
    }
}

/// A newly issued token together with its validity window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub token: SignatureToken,
    pub issued_at: Timestamp,
    pub expires_at: Timestamp,
}

impl TokenGrant {
    /// True once `now` is strictly past the expiry instant.
    pub fn is_expired_at(&self, now: &Timestamp) -> bool {
        now.is_after(&self.expires_at)
    }
}
