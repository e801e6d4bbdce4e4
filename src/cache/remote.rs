//! Remote Backend
//!
//! Talks to a Redis-compatible REST service (Upstash wire format): each
//! command is POSTed as a JSON array with a bearer token and answered with
//! `{"result": ...}` or `{"error": "..."}`. Expiry is delegated to the
//! server's native per-key TTL.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::cache::backend::{BackendKind, CacheBackend};
use crate::config::RemoteCredentials;
use crate::error::{CacheError, Result};

/// Reply envelope of the REST protocol.
#[derive(Debug, Deserialize)]
struct RestReply {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

// == Remote Backend ==
/// REST client bound to one remote database.
#[derive(Debug, Clone)]
pub struct RemoteBackend {
    client: reqwest::Client,
    url: String,
    token: String,
    timeout: Duration,
}

impl RemoteBackend {
    // == Constructor ==
    /// Creates a client for `credentials`; every call is bounded by `timeout`.
    pub fn new(credentials: RemoteCredentials, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: credentials.url,
            token: credentials.token,
            timeout,
        }
    }

    // == Command ==
    /// Sends one command and returns its `result` field.
    async fn command(&self, args: Vec<String>) -> Result<Value> {
        let name = args.first().cloned().unwrap_or_default();
        let call = async {
            let response = self
                .client
                .post(&self.url)
                .bearer_auth(&self.token)
                .json(&args)
                .send()
                .await?;
            let reply: RestReply = response.json().await?;
            Ok::<_, CacheError>(reply)
        };

        let reply = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| CacheError::Timeout(self.timeout.as_millis() as u64))??;

        debug!("remote {} answered", name);
        match reply {
            RestReply {
                error: Some(message),
                ..
            } => Err(CacheError::Backend(format!("{}: {}", name, message))),
            RestReply { result, .. } => Ok(result.unwrap_or(Value::Null)),
        }
    }

    /// Enumerates keys matching `pattern`.
    async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        let result = self.command(vec!["KEYS".into(), pattern.into()]).await?;
        Ok(serde_json::from_value(result)?)
    }
}

/// Builds the `KEYS` pattern for a literal prefix.
///
/// Glob metacharacters inside the prefix are escaped so only the trailing
/// wildcard is interpreted.
pub(crate) fn prefix_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('*');
    pattern
}

#[async_trait]
impl CacheBackend for RemoteBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Remote
    }

    async fn get(&self, key: &str) -> Result<Option<Value>> {
        match self.command(vec!["GET".into(), key.into()]).await? {
            Value::Null => Ok(None),
            Value::String(text) => Ok(Some(serde_json::from_str(&text)?)),
            other => Err(CacheError::Backend(format!(
                "GET returned non-string payload: {}",
                other
            ))),
        }
    }

    async fn set(&self, key: &str, value: Value, ttl_secs: u64) -> Result<()> {
        if ttl_secs == 0 {
            // EX 0 is rejected by the server; an already-expired entry is a delete
            return self.delete(key).await;
        }
        let payload = serde_json::to_string(&value)?;
        self.command(vec![
            "SET".into(),
            key.into(),
            payload,
            "EX".into(),
            ttl_secs.to_string(),
        ])
        .await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.command(vec!["DEL".into(), key.into()]).await?;
        Ok(())
    }

    async fn invalidate_prefix(&self, prefix: &str) -> Result<usize> {
        let keys = self.keys(&prefix_pattern(prefix)).await?;
        if keys.is_empty() {
            return Ok(0);
        }

        let mut args = Vec::with_capacity(keys.len() + 1);
        args.push("DEL".to_string());
        args.extend(keys);
        let removed = self.command(args).await?;
        removed
            .as_u64()
            .map(|n| n as usize)
            .ok_or_else(|| CacheError::Backend(format!("DEL returned {}", removed)))
    }

    async fn ping(&self) -> Result<bool> {
        let reply = self.command(vec!["PING".into()]).await?;
        Ok(reply.as_str() == Some("PONG"))
    }

    async fn key_count(&self) -> Result<usize> {
        Ok(self.keys("*").await?.len())
    }
}
