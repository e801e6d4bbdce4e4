//! API Routes
//!
//! Configures the Axum router with all cache admin endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    delete_handler, get_handler, health_handler, invalidate_artwork_handler,
    invalidate_family_handler, reset_stats_handler, set_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Backend health report
/// - `GET /stats` - Hit/miss metrics and key count
/// - `POST /stats/reset` - Zero the metrics
/// - `PUT /keys` - Store a JSON value
/// - `GET /keys/:key` - Retrieve a value
/// - `DELETE /keys/:key` - Delete a key
/// - `DELETE /families/:family` - Invalidate a whole family
/// - `DELETE /artworks/:id` - Invalidate an artwork and cascade
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .route("/stats/reset", post(reset_stats_handler))
        .route("/keys", put(set_handler))
        .route("/keys/:key", get(get_handler).delete(delete_handler))
        .route("/families/:family", delete(invalidate_family_handler))
        .route("/artworks/:id", delete(invalidate_artwork_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
