//! API Handlers
//!
//! HTTP handlers for the cache admin endpoints. They go through the same
//! manager and families as application code, so fail-open behavior applies.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::cache::{
    select_backend, ArtworkInvalidation, CacheDurations, CacheFamilies, CacheFamily,
    CacheManager, CacheMetrics, MetricsSnapshot,
};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    DeleteResponse, GetResponse, HealthResponse, InvalidateResponse, SetRequest, SetResponse,
    StatsResponse,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub families: CacheFamilies,
}

impl AppState {
    /// Creates a new AppState around an existing set of families.
    pub fn new(families: CacheFamilies) -> Self {
        Self { families }
    }

    /// Creates a new AppState from configuration, selecting the backend.
    pub fn from_config(config: &Config) -> Self {
        let selected = select_backend(config);
        let manager = CacheManager::new(selected.as_backend(), Arc::new(CacheMetrics::new()))
            .with_default_ttl(config.default_ttl);
        Self::new(CacheFamilies::new(
            Arc::new(manager),
            CacheDurations::default(),
        ))
    }

    pub fn manager(&self) -> &CacheManager {
        self.families.manager()
    }
}

/// Handler for PUT /keys
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let manager = state.manager();
    let ttl = req.ttl.unwrap_or_else(|| manager.default_ttl());
    if !manager.set(&req.key, &req.value, ttl).await {
        return Err(CacheError::Backend(format!("failed to store '{}'", req.key)));
    }

    Ok(Json(SetResponse::new(req.key, ttl)))
}

/// Handler for GET /keys/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    let value: Value = state
        .manager()
        .get(&key)
        .await
        .ok_or_else(|| CacheError::NotFound(key.clone()))?;

    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for DELETE /keys/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    if !state.manager().delete(&key).await {
        return Err(CacheError::Backend(format!("failed to delete '{}'", key)));
    }

    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for DELETE /families/:family
pub async fn invalidate_family_handler(
    State(state): State<AppState>,
    Path(family): Path<String>,
) -> Result<Json<InvalidateResponse>> {
    let family: CacheFamily = family.parse()?;
    let removed = state.families.family(family).invalidate_all().await;

    Ok(Json(InvalidateResponse {
        pattern: family.pattern(),
        removed,
    }))
}

/// Handler for DELETE /artworks/:id
pub async fn invalidate_artwork_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<ArtworkInvalidation> {
    Json(state.families.artwork.invalidate_artwork(&id).await)
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let manager = state.manager();
    let report = manager.health().await;

    Json(StatsResponse {
        backend: manager.backend_kind(),
        metrics: manager.metrics().stats(),
        key_count: report.key_count,
    })
}

/// Handler for POST /stats/reset
pub async fn reset_stats_handler(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    let metrics = state.manager().metrics();
    metrics.reset();
    Json(metrics.stats())
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let manager = state.manager();
    let report = manager.health().await;
    Json(HealthResponse::new(manager.backend_kind(), report))
}
