//! Cache Warming
//!
//! Best-effort population of hot keys from the application's data source.
//! Per-item failures are logged and skipped; a run always completes.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::cache::{ArtworkCache, CacheFamilies, GalleryCache};

/// Gallery categories warmed on every run.
pub const GALLERY_CATEGORIES: [&str; 6] = [
    "all",
    "paintings",
    "photography",
    "digital",
    "prints",
    "sculpture",
];

/// Key in the meta family recording the last completed warm run.
pub const LAST_WARM_KEY: &str = "last_warm";

/// Canonical data the warming jobs copy into the cache.
#[async_trait]
pub trait WarmSource: Send + Sync {
    /// Ids of the artworks worth keeping hot.
    async fn popular_artwork_ids(&self) -> anyhow::Result<Vec<String>>;

    async fn fetch_artwork(&self, id: &str) -> anyhow::Result<Value>;

    async fn fetch_gallery(&self, category: &str) -> anyhow::Result<Value>;
}

// == Warm Report ==
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WarmReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub skipped: usize,
}

impl WarmReport {
    fn record(&mut self, ok: bool) {
        self.attempted += 1;
        if ok {
            self.succeeded += 1;
        } else {
            self.skipped += 1;
        }
    }

    fn merge(self, other: WarmReport) -> WarmReport {
        WarmReport {
            attempted: self.attempted + other.attempted,
            succeeded: self.succeeded + other.succeeded,
            skipped: self.skipped + other.skipped,
        }
    }
}

// == Warm Artworks ==
/// Fetches and caches each artwork in `ids`.
pub async fn warm_artwork_cache(
    cache: &ArtworkCache,
    source: &dyn WarmSource,
    ids: &[String],
) -> WarmReport {
    let mut report = WarmReport::default();

    for id in ids {
        let ok = match source.fetch_artwork(id).await {
            Ok(artwork) => cache.set_artwork(id, &artwork).await,
            Err(e) => {
                warn!("warming artwork {} failed: {:#}", id, e);
                false
            }
        };
        report.record(ok);
    }

    info!(
        "artwork warming: {}/{} cached",
        report.succeeded, report.attempted
    );
    report
}

// == Warm Gallery ==
/// Fetches and caches the listing for every category in [`GALLERY_CATEGORIES`].
pub async fn warm_gallery_cache(cache: &GalleryCache, source: &dyn WarmSource) -> WarmReport {
    let mut report = WarmReport::default();

    for category in GALLERY_CATEGORIES {
        let ok = match source.fetch_gallery(category).await {
            Ok(listing) => cache.set_gallery(category, &listing).await,
            Err(e) => {
                warn!("warming gallery {} failed: {:#}", category, e);
                false
            }
        };
        report.record(ok);
    }

    info!(
        "gallery warming: {}/{} cached",
        report.succeeded, report.attempted
    );
    report
}

// == Warm All ==
/// Warms popular artworks and every gallery category, then records the run
/// under `meta:last_warm`.
pub async fn warm_all(families: &CacheFamilies, source: &dyn WarmSource) -> WarmReport {
    let ids = source.popular_artwork_ids().await.unwrap_or_else(|e| {
        warn!("could not load popular artworks: {:#}", e);
        Vec::new()
    });

    let report = warm_artwork_cache(&families.artwork, source, &ids)
        .await
        .merge(warm_gallery_cache(&families.gallery, source).await);

    families
        .meta
        .set(
            LAST_WARM_KEY,
            &json!({
                "completed_at": chrono::Utc::now().to_rfc3339(),
                "report": report,
            }),
        )
        .await;

    report
}

/// Spawns a task that runs [`warm_all`] immediately and then every
/// `interval_secs` seconds, off the request path.
pub fn spawn_warming_task(
    families: CacheFamilies,
    source: Arc<dyn WarmSource>,
    interval_secs: u64,
) -> JoinHandle<()> {
    let period = Duration::from_secs(interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting cache warming task with interval of {} seconds",
            period.as_secs()
        );
        let mut ticker = tokio::time::interval(period);

        loop {
            ticker.tick().await;
            let report = warm_all(&families, source.as_ref()).await;
            info!(
                "Cache warming run: {} succeeded, {} skipped",
                report.succeeded, report.skipped
            );
        }
    })
}
