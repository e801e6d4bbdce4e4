//! Backend Selector
//!
//! Binds exactly one backend for the lifetime of the process, based solely on
//! whether remote credentials are configured.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::cache::backend::CacheBackend;
use crate::cache::memory::InMemoryBackend;
use crate::cache::remote::RemoteBackend;
use crate::config::Config;

/// Backend chosen at startup.
///
/// The memory handle is kept separately so the expiry sweeper can reach it.
#[derive(Debug, Clone)]
pub enum SelectedBackend {
    Remote(Arc<RemoteBackend>),
    Memory(Arc<InMemoryBackend>),
}

impl SelectedBackend {
    /// The backend as a trait object for the cache manager.
    pub fn as_backend(&self) -> Arc<dyn CacheBackend> {
        match self {
            SelectedBackend::Remote(remote) => remote.clone(),
            SelectedBackend::Memory(memory) => memory.clone(),
        }
    }

    /// The in-memory backend, if that is what was bound.
    pub fn memory(&self) -> Option<Arc<InMemoryBackend>> {
        match self {
            SelectedBackend::Memory(memory) => Some(memory.clone()),
            SelectedBackend::Remote(_) => None,
        }
    }
}

// == Select Backend ==
/// Evaluates `config` once and binds the remote backend if credentials are
/// present, the in-memory backend otherwise. There is no later re-selection.
pub fn select_backend(config: &Config) -> SelectedBackend {
    match config.remote_credentials() {
        Some(credentials) => {
            info!("Remote cache backend selected ({})", credentials.url);
            SelectedBackend::Remote(Arc::new(RemoteBackend::new(
                credentials,
                Duration::from_millis(config.remote_timeout_ms),
            )))
        }
        None => {
            info!("No remote cache credentials, using in-memory backend");
            SelectedBackend::Memory(Arc::new(InMemoryBackend::new()))
        }
    }
}
