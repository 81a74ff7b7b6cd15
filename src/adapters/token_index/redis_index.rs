//! Redis-backed signature token index for multi-server deployments.
//!
//! Each token is stored as `SET sigtok:<fingerprint> <project>:<variation> EX ttl`.
//! Keys hold the SHA-256 fingerprint, never the raw token, and Redis expiry
//! evicts them.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::sync::Arc;

use crate::domain::foundation::{ProjectId, Timestamp, VariationId};
use crate::domain::project::SignatureToken;
use crate::ports::{Clock, SignatureTokenIndex, TokenIndexError, TokenLocation};

const KEY_PREFIX: &str = "sigtok:";

/// Redis token index.
#[derive(Clone)]
pub struct RedisTokenIndex {
    conn: MultiplexedConnection,
    clock: Arc<dyn Clock>,
}

impl RedisTokenIndex {
    pub fn new(conn: MultiplexedConnection, clock: Arc<dyn Clock>) -> Self {
        Self { conn, clock }
    }
}

fn redis_key(token: &SignatureToken) -> String {
    format!("{}{}", KEY_PREFIX, token.fingerprint())
}

fn encode_location(location: &TokenLocation) -> String {
    format!("{}:{}", location.project_id, location.variation_id)
}

fn decode_location(raw: &str) -> Result<TokenLocation, TokenIndexError> {
    let (project, variation) = raw
        .split_once(':')
        .ok_or_else(|| TokenIndexError::Corrupt(format!("missing separator in '{}'", raw)))?;
    let project_id: ProjectId = project
        .parse()
        .map_err(|e: uuid::Error| TokenIndexError::Corrupt(e.to_string()))?;
    let variation_id: VariationId = variation
        .parse()
        .map_err(|e: uuid::Error| TokenIndexError::Corrupt(e.to_string()))?;
    Ok(TokenLocation {
        project_id,
        variation_id,
    })
}

#[async_trait]
impl SignatureTokenIndex for RedisTokenIndex {
    async fn register(
        &self,
        token: &SignatureToken,
        location: TokenLocation,
        expires_at: Timestamp,
    ) -> Result<(), TokenIndexError> {
        let ttl = expires_at.as_unix_secs() - self.clock.now().as_unix_secs();
        if ttl <= 0 {
            return Ok(());
        }

        let mut conn = self.conn.clone();
        redis::cmd("SET")
            .arg(redis_key(token))
            .arg(encode_location(&location))
            .arg("EX")
            .arg(ttl)
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(|e| TokenIndexError::Unavailable(e.to_string()))
    }

    async fn lookup(&self, token: &SignatureToken) -> Result<Option<TokenLocation>, TokenIndexError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn
            .get(redis_key(token))
            .await
            .map_err(|e: redis::RedisError| TokenIndexError::Unavailable(e.to_string()))?;

        raw.as_deref().map(decode_location).transpose()
    }

    async fn revoke(&self, token: &SignatureToken) -> Result<(), TokenIndexError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(redis_key(token))
            .await
            .map_err(|e: redis::RedisError| TokenIndexError::Unavailable(e.to_string()))
    }
}

impl std::fmt::Debug for RedisTokenIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisTokenIndex").finish_non_exhaustive()
    }
}
