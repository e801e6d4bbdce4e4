//! Gallery Cache - Multi-backend cache layer for the gallery storefront
//!
//! Binds a remote REST key-value store or an in-memory fallback once at
//! startup, and exposes fail-open reads and writes, namespaced families with
//! cascading artwork invalidation, hit/miss metrics and cache warming.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheFamilies, CacheManager};
pub use config::Config;
pub use tasks::{spawn_cleanup_task, spawn_warming_task};
