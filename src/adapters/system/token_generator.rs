//! Signature token generators.

use rand::rngs::OsRng;
use rand::RngCore;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::project::SignatureToken;
use crate::ports::TokenGenerator;

/// Random bytes per token. 256 bits encode to 43 URL-safe characters.
pub const TOKEN_BYTES: usize = 32;

/// Draws tokens from the operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRngTokenGenerator;

impl TokenGenerator for OsRngTokenGenerator {
    fn generate(&self) -> SignatureToken {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        SignatureToken::from_random_bytes(&bytes)
    }
}

/// Predictable, distinct tokens for tests. Never use outside tests.
#[derive(Debug, Default)]
pub struct SequentialTokenGenerator {
    counter: AtomicU64,
}

impl SequentialTokenGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The token the `n`th call (1-based) returns.
    pub fn token_for(n: u64) -> SignatureToken {
        let mut bytes = [0u8; TOKEN_BYTES];
        bytes[..8].copy_from_slice(&n.to_be_bytes());
        SignatureToken::from_random_bytes(&bytes)
    }
}

impl TokenGenerator for SequentialTokenGenerator {
    fn generate(&self) -> SignatureToken {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        Self::token_for(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn os_rng_tokens_are_43_chars_and_distinct() {
        let generator = OsRngTokenGenerator;
        let a = generator.generate();
        let b = generator.generate();
        assert_eq!(a.expose().len(), 43);
        assert_ne!(a, b);
        assert!(SignatureToken::parse(a.expose()).is_ok());
    }

    #[test]
    fn sequential_tokens_are_predictable() {
        let generator = SequentialTokenGenerator::new();
        assert_eq!(generator.generate(), SequentialTokenGenerator::token_for(1));
        assert_eq!(generator.generate(), SequentialTokenGenerator::token_for(2));
    }
}
