//! API Module
//!
//! HTTP administration surface for the cache layer: health, metrics,
//! ad-hoc key access and family invalidation.

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
