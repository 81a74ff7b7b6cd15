//! Authentication configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use super::error::ValidationError;

/// Minimum HS256 secret length in bytes.
const MIN_SECRET_BYTES: usize = 32;

/// Owner authentication configuration (HS256 JWT)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared signing secret for owner session tokens
    pub jwt_secret: Secret<String>,

    /// Expected `iss` claim
    #[serde(default = "default_issuer")]
    pub jwt_issuer: String,

    /// Expected `aud` claim
    #[serde(default = "default_audience")]
    pub jwt_audience: String,
}

impl AuthConfig {
    /// Secret bytes for the validator
    pub fn secret_bytes(&self) -> &[u8] {
        self.jwt_secret.expose_secret().as_bytes()
    }

    /// Validate authentication configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let secret = self.jwt_secret.expose_secret();
        if secret.is_empty() {
            return Err(ValidationError::MissingRequired("VARIATION_LEDGER__AUTH__JWT_SECRET"));
        }
        if secret.len() < MIN_SECRET_BYTES {
            return Err(ValidationError::JwtSecretTooShort);
        }
        if self.jwt_issuer.is_empty() {
            return Err(ValidationError::MissingRequired("VARIATION_LEDGER__AUTH__JWT_ISSUER"));
        }
        if self.jwt_audience.is_empty() {
            return Err(ValidationError::MissingRequired("VARIATION_LEDGER__AUTH__JWT_AUDIENCE"));
        }
        Ok(())
    }
}

fn default_issuer() -> String {
    "variation-ledger".to_string()
}

fn default_audience() -> String {
    "variation-ledger-api".to_string()
}
