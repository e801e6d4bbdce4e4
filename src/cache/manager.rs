//! Cache Manager
//!
//! The single façade over whichever backend was bound at startup. Every
//! operation is fail-open: backend errors are logged and turned into an
//! empty read, a `false` write, or a zero count, never returned to callers.

use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::backend::{BackendKind, CacheBackend};
use crate::cache::metrics::CacheMetrics;
use crate::cache::DEFAULT_TTL_SECS;
use crate::error::{CacheError, Result};

// == Health Report ==
/// Result of [`CacheManager::health`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    /// Remote backend answered its liveness probe
    pub remote_available: bool,
    /// The in-memory path is always usable
    pub memory_available: bool,
    /// Live keys in the bound backend
    pub key_count: usize,
}

// == Cache Manager ==
#[derive(Debug, Clone)]
pub struct CacheManager {
    backend: Arc<dyn CacheBackend>,
    metrics: Arc<CacheMetrics>,
    default_ttl: u64,
}

impl CacheManager {
    // == Constructor ==
    pub fn new(backend: Arc<dyn CacheBackend>, metrics: Arc<CacheMetrics>) -> Self {
        Self {
            backend,
            metrics,
            default_ttl: DEFAULT_TTL_SECS,
        }
    }

    /// Overrides the TTL used by [`set_default`](Self::set_default).
    pub fn with_default_ttl(mut self, ttl_secs: u64) -> Self {
        self.default_ttl = ttl_secs;
        self
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    pub fn metrics(&self) -> &Arc<CacheMetrics> {
        &self.metrics
    }

    pub fn default_ttl(&self) -> u64 {
        self.default_ttl
    }

    // == Get ==
    /// Returns the stored value if present, unexpired, and decodable as `T`.
    ///
    /// Does not touch the hit/miss counters.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.try_get(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!("cache get {} failed, treating as miss: {}", key, e);
                None
            }
        }
    }

    async fn try_get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.backend.get(key).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    // == Set ==
    /// Stores `value` for `ttl_secs` seconds. Returns `false` on any failure.
    pub async fn set<T>(&self, key: &str, value: &T, ttl_secs: u64) -> bool
    where
        T: Serialize + ?Sized,
    {
        let stored = async {
            let value = serde_json::to_value(value)?;
            self.backend.set(key, value, ttl_secs).await
        };

        match stored.await {
            Ok(()) => {
                debug!("cache set {} (ttl {}s)", key, ttl_secs);
                true
            }
            Err(e) => {
                warn!("cache set {} failed: {}", key, e);
                false
            }
        }
    }

    /// Stores `value` with the configured default TTL.
    pub async fn set_default<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        self.set(key, value, self.default_ttl).await
    }

    // == Delete ==
    /// Removes `key`. Deleting an absent key succeeds.
    pub async fn delete(&self, key: &str) -> bool {
        match self.backend.delete(key).await {
            Ok(()) => true,
            Err(e) => {
                warn!("cache delete {} failed: {}", key, e);
                false
            }
        }
    }

    // == Invalidate Pattern ==
    /// Removes every key sharing the literal prefix before a single trailing `*`.
    ///
    /// Returns the number of keys removed, 0 on failure or on a pattern that is
    /// not `prefix*`.
    pub async fn invalidate_pattern(&self, pattern: &str) -> usize {
        let result = match parse_pattern(pattern) {
            Ok(prefix) => self.backend.invalidate_prefix(prefix).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(count) => {
                debug!("cache invalidated {} keys for {}", count, pattern);
                count
            }
            Err(e) => {
                warn!("cache invalidate {} failed: {}", pattern, e);
                0
            }
        }
    }

    // == Get Or Set ==
    /// Cache-aside read.
    ///
    /// On a hit returns the cached value. On a miss calls `fetch`, stores the
    /// result best-effort and returns it. If the backend read itself fails,
    /// `fetch` is called and its value returned without storing. Errors from
    /// `fetch` propagate. Concurrent misses on one key each call `fetch`.
    pub async fn get_or_set<T, F, Fut, E>(
        &self,
        key: &str,
        fetch: F,
        ttl_secs: u64,
    ) -> std::result::Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        match self.try_get::<T>(key).await {
            Ok(Some(value)) => {
                self.metrics.record_hit();
                debug!("cache hit {}", key);
                Ok(value)
            }
            Ok(None) => {
                self.metrics.record_miss();
                debug!("cache miss {}", key);
                let fresh = fetch().await?;
                self.set(key, &fresh, ttl_secs).await;
                Ok(fresh)
            }
            Err(e) => {
                self.metrics.record_miss();
                warn!("cache read {} failed, computing from source: {}", key, e);
                fetch().await
            }
        }
    }

    // == Health ==
    /// Probes the bound backend.
    pub async fn health(&self) -> HealthReport {
        let remote_available = match self.backend.kind() {
            BackendKind::Remote => self.backend.ping().await.unwrap_or_else(|e| {
                warn!("remote cache ping failed: {}", e);
                false
            }),
            BackendKind::Memory => false,
        };

        let key_count = self.backend.key_count().await.unwrap_or_else(|e| {
            warn!("cache key count failed: {}", e);
            0
        });

        HealthReport {
            remote_available,
            memory_available: true,
            key_count,
        }
    }
}

/// Splits `prefix*` into its literal prefix.
fn parse_pattern(pattern: &str) -> Result<&str> {
    match pattern.strip_suffix('*') {
        Some(prefix) if !prefix.is_empty() && !prefix.contains('*') => Ok(prefix),
        _ => Err(CacheError::InvalidRequest(format!(
            "pattern must be a non-empty prefix followed by one '*': {}",
            pattern
        ))),
    }
}
