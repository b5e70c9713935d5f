//! Caller-owned, TTL-bounded credential cache

use crate::credentials::{CredentialProvider, Credentials};
use crate::error::SourceResult;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Time source for expiry checks
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

struct CachedEntry {
    credentials: Credentials,
    expires_at: DateTime<Utc>,
}

/// Reuses credentials from a provider until the TTL elapses.
///
/// Concurrent `get` calls during a refresh wait for the single in-flight fetch.
/// A failed fetch leaves the cache empty.
pub struct CredentialCache {
    provider: Box<dyn CredentialProvider>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    entry: Mutex<Option<CachedEntry>>,
}

impl CredentialCache {
    pub fn new(provider: Box<dyn CredentialProvider>, ttl: Duration) -> Self {
        Self::with_clock(provider, ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(
        provider: Box<dyn CredentialProvider>,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            provider,
            clock,
            ttl,
            entry: Mutex::new(None),
        }
    }

    /// Cached credentials, fetching new ones when absent or expired
    pub async fn get(&self) -> SourceResult<Credentials> {
        let mut entry = self.entry.lock().await;
        let now = self.clock.now();

        if let Some(cached) = entry.as_ref() {
            if now < cached.expires_at {
                return Ok(cached.credentials.clone());
            }
            log::debug!("Cached credentials expired at {}", cached.expires_at);
        }

        let credentials = self.provider.fetch().await?;
        *entry = Some(CachedEntry {
            credentials: credentials.clone(),
            expires_at: now + self.ttl,
        });
        Ok(credentials)
    }

    /// Drop cached credentials so the next `get` fetches again
    pub async fn invalidate(&self) {
        *self.entry.lock().await = None;
    }

    /// Expiry of the cached credentials, if any are held
    pub async fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.entry.lock().await.as_ref().map(|e| e.expires_at)
    }
}

#[cfg(test)]
#[path = "cache_test.rs"]
mod tests;
