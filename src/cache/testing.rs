//! Test backends for exercising fail-open paths and call sequencing, and a
//! clock that tests move by hand.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::cache::backend::{BackendKind, CacheBackend};
use crate::cache::clock::Clock;
use crate::cache::memory::InMemoryBackend;
use crate::error::{CacheError, Result};

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start_ms)),
        }
    }

    pub fn advance_ms(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn advance_secs(&self, secs: u64) {
        self.advance_ms(secs * 1000);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Backend whose every operation fails, as if the remote host were down.
#[derive(Debug, Default)]
pub struct FailingBackend;

#[async_trait]
impl CacheBackend for FailingBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Remote
    }

    async fn get(&self, _key: &str) -> Result<Option<Value>> {
        Err(CacheError::Timeout(2000))
    }

    async fn set(&self, _key: &str, _value: Value, _ttl_secs: u64) -> Result<()> {
        Err(CacheError::Backend("connection refused".into()))
    }

    async fn delete(&self, _key: &str) -> Result<()> {
        Err(CacheError::Backend("connection refused".into()))
    }

    async fn invalidate_prefix(&self, _prefix: &str) -> Result<usize> {
        Err(CacheError::Backend("connection refused".into()))
    }

    async fn ping(&self) -> Result<bool> {
        Err(CacheError::Timeout(2000))
    }

    async fn key_count(&self) -> Result<usize> {
        Err(CacheError::Timeout(2000))
    }
}

/// Backend that reads as empty but rejects every write.
#[derive(Debug, Default)]
pub struct ReadOnlyBackend;

#[async_trait]
impl CacheBackend for ReadOnlyBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Remote
    }

    async fn get(&self, _key: &str) -> Result<Option<Value>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: Value, _ttl_secs: u64) -> Result<()> {
        Err(CacheError::Backend("READONLY replica".into()))
    }

    async fn delete(&self, _key: &str) -> Result<()> {
        Err(CacheError::Backend("READONLY replica".into()))
    }

    async fn invalidate_prefix(&self, _prefix: &str) -> Result<usize> {
        Err(CacheError::Backend("READONLY replica".into()))
    }

    async fn ping(&self) -> Result<bool> {
        Ok(true)
    }

    async fn key_count(&self) -> Result<usize> {
        Ok(0)
    }
}

/// A call observed by [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Get(String),
    Set(String, u64),
    Delete(String),
    InvalidatePrefix(String),
}

/// In-memory backend that records every call it receives.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    inner: InMemoryBackend,
    calls: Mutex<Vec<Call>>,
}

impl RecordingBackend {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl CacheBackend for RecordingBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Memory
    }

    async fn get(&self, key: &str) -> Result<Option<Value>> {
        self.record(Call::Get(key.to_string()));
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Value, ttl_secs: u64) -> Result<()> {
        self.record(Call::Set(key.to_string(), ttl_secs));
        self.inner.set(key, value, ttl_secs).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.record(Call::Delete(key.to_string()));
        self.inner.delete(key).await
    }

    async fn invalidate_prefix(&self, prefix: &str) -> Result<usize> {
        self.record(Call::InvalidatePrefix(prefix.to_string()));
        self.inner.invalidate_prefix(prefix).await
    }

    async fn ping(&self) -> Result<bool> {
        self.inner.ping().await
    }

    async fn key_count(&self) -> Result<usize> {
        self.inner.key_count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::new(1_000);
        assert_eq!(clock.now_ms(), 1_000);

        clock.advance_secs(2);
        assert_eq!(clock.now_ms(), 3_000);
    }

    #[test]
    fn test_manual_clock_clones_share_time() {
        let clock = ManualClock::new(0);
        let other = clock.clone();
        other.advance_ms(250);
        assert_eq!(clock.now_ms(), 250);
    }
}
