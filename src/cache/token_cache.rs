use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::token::CachedToken;
use crate::utils::constants::SINGLE_TOKEN_KEY;

/// Credential slots keyed by token type.
///
/// The slot set is fixed at construction. A `None` key addresses the single-pattern
/// slot on reads and writes, and every slot on `clear`. Each slot is replaced as a
/// whole under the write lock, so readers never observe a partial update.
#[derive(Debug, Clone)]
pub struct TokenCache {
    inner: Arc<RwLock<HashMap<String, Option<CachedToken>>>>,
}

impl TokenCache {
    /// One slot, for the single auth pattern.
    pub fn single() -> Self {
        Self::with_keys([SINGLE_TOKEN_KEY])
    }

    /// One empty slot per declared token type.
    pub fn with_keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let slots = keys.into_iter().map(|k| (k.into(), None)).collect();
        Self {
            inner: Arc::new(RwLock::new(slots)),
        }
    }

    fn slot(key: Option<&str>) -> &str {
        key.unwrap_or(SINGLE_TOKEN_KEY)
    }

    pub async fn contains(&self, key: Option<&str>) -> bool {
        self.inner.read().await.contains_key(Self::slot(key))
    }

    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.inner.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Cached record regardless of expiry.
    pub async fn get(&self, key: Option<&str>) -> Option<CachedToken> {
        self.inner
            .read()
            .await
            .get(Self::slot(key))
            .cloned()
            .flatten()
    }

    /// Cached token if it is still valid at `now`.
    pub async fn get_valid(&self, key: Option<&str>, now: DateTime<Utc>) -> Option<CachedToken> {
        self.get(key).await.filter(|token| token.is_valid_at(now))
    }

    /// Replace the slot. Returns false for a key that has no slot.
    pub async fn set(&self, key: Option<&str>, value: String, expires_at: DateTime<Utc>) -> bool {
        let mut map = self.inner.write().await;
        match map.get_mut(Self::slot(key)) {
            Some(slot) => {
                *slot = Some(CachedToken::new(value, expires_at));
                true
            }
            None => false,
        }
    }

    /// Empty the addressed slot, or every slot when `key` is None.
    pub async fn clear(&self, key: Option<&str>) {
        let mut map = self.inner.write().await;
        match key {
            Some(key) => {
                if let Some(slot) = map.get_mut(key) {
                    *slot = None;
                }
            }
            None => map.values_mut().for_each(|slot| *slot = None),
        }
        debug!("token cache cleared: {}", key.unwrap_or("all"));
    }
}
