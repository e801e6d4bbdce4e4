//! Request DTOs for the cache admin API

use serde::Deserialize;
use serde_json::Value;

use crate::cache::MAX_KEY_LENGTH;

/// Request body for PUT /keys
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// Full cache key, including its family prefix
    pub key: String,
    /// Any JSON value
    pub value: Value,
    /// Optional TTL in seconds (uses the configured default if absent)
    #[serde(default)]
    pub ttl: Option<u64>,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        if self.key.len() > MAX_KEY_LENGTH {
            return Some(format!(
                "Key exceeds maximum length of {} characters",
                MAX_KEY_LENGTH
            ));
        }
        if self.key.contains('*') {
            return Some("Key cannot contain '*'".to_string());
        }
        None
    }
}
