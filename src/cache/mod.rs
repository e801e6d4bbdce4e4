//! Cache Module
//!
//! Multi-backend cache layer: a remote REST key-value store or an in-memory
//! fallback behind one fail-open manager, with namespaced families on top.

mod backend;
mod clock;
mod entry;
mod families;
mod manager;
mod memory;
mod metrics;
mod remote;
mod selector;

#[cfg(test)]
mod property_tests;
#[cfg(test)]
pub(crate) mod testing;

// Re-export public types
pub use backend::{BackendKind, CacheBackend};
pub use clock::{Clock, SystemClock};
#[cfg(test)]
pub(crate) use testing::ManualClock;
pub use entry::CacheEntry;
pub use families::{
    AnalyticsCache, ArtworkCache, ArtworkInvalidation, CacheDurations, CacheFamilies,
    CacheFamily, CommentsCache, FamilyCache, GalleryCache, ReactionsCache, SearchCache,
};
pub use manager::{CacheManager, HealthReport};
pub use memory::InMemoryBackend;
pub use metrics::{CacheMetrics, MetricsSnapshot};
pub use remote::RemoteBackend;
pub use selector::{select_backend, SelectedBackend};

// == Public Constants ==
/// TTL applied when a caller does not pass one
pub const DEFAULT_TTL_SECS: u64 = 3600;

/// Maximum accepted key length in bytes on the admin API
pub const MAX_KEY_LENGTH: usize = 256;
