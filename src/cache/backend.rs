//! Backend Interface
//!
//! The two storage strategies behind the cache manager. Values cross this
//! boundary as JSON so both backends store the same shape.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

/// Which backend the process bound at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Remote REST key-value service
    Remote,
    /// Process-local map
    Memory,
}

/// Storage operations the cache manager delegates to.
///
/// Implementations report failures as errors; fail-open handling lives in the
/// manager, not here.
#[async_trait]
pub trait CacheBackend: Send + Sync + std::fmt::Debug {
    /// Identifies the implementation.
    fn kind(&self) -> BackendKind;

    /// Point lookup. `Ok(None)` for absent or expired keys.
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Stores `value` under `key` for `ttl_secs` seconds.
    async fn set(&self, key: &str, value: Value, ttl_secs: u64) -> Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Removes every key in the family named by `prefix`, returning the count.
    async fn invalidate_prefix(&self, prefix: &str) -> Result<usize>;

    /// Liveness probe.
    async fn ping(&self) -> Result<bool>;

    /// Number of live keys.
    async fn key_count(&self) -> Result<usize>;
}
