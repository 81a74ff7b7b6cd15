//! In-memory signature token index.
//!
//! Entries are keyed by token fingerprint and evicted lazily on lookup, or
//! in bulk with [`InMemoryTokenIndex::purge_expired`]. Single-process only.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::Timestamp;
use crate::domain::project::SignatureToken;
use crate::ports::{Clock, SignatureTokenIndex, TokenIndexError, TokenLocation};

#[derive(Debug, Clone, Copy)]
struct Entry {
    location: TokenLocation,
    expires_at: Timestamp,
}

/// In-memory token index for tests and single-server deployments.
#[derive(Clone)]
pub struct InMemoryTokenIndex {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryTokenIndex {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            clock,
        }
    }

    /// Drops every expired entry, returning how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !now.is_after(&entry.expires_at));
        before - entries.len()
    }

    /// Number of entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl std::fmt::Debug for InMemoryTokenIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryTokenIndex").finish_non_exhaustive()
    }
}

#[async_trait]
impl SignatureTokenIndex for InMemoryTokenIndex {
    async fn register(
        &self,
        token: &SignatureToken,
        location: TokenLocation,
        expires_at: Timestamp,
    ) -> Result<(), TokenIndexError> {
        self.entries.write().await.insert(
            token.fingerprint(),
            Entry {
                location,
                expires_at,
            },
        );
        Ok(())
    }

    async fn lookup(&self, token: &SignatureToken) -> Result<Option<TokenLocation>, TokenIndexError> {
        let key = token.fingerprint();
        let now = self.clock.now();

        let entry = self.entries.read().await.get(&key).copied();
        match entry {
            Some(entry) if !now.is_after(&entry.expires_at) => Ok(Some(entry.location)),
            Some(_) => {
                self.entries.write().await.remove(&key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn revoke(&self, token: &SignatureToken) -> Result<(), TokenIndexError> {
        self.entries.write().await.remove(&token.fingerprint());
        Ok(())
    }
}
