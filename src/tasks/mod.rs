//! Background Tasks Module
//!
//! # Tasks
//! - Expiry sweep: drops expired in-memory entries at configured intervals
//! - Cache warming: populates hot artwork and gallery keys

mod cleanup;
mod warming;

pub use cleanup::spawn_cleanup_task;
pub use warming::{
    spawn_warming_task, warm_all, warm_artwork_cache, warm_gallery_cache, WarmReport, WarmSource,
    GALLERY_CATEGORIES, LAST_WARM_KEY,
};
