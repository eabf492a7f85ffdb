use std::sync::Arc;
use axum::{Extension, Json, Router};
use axum::routing::get;
use serde_json::{json, Value};
use crate::controller::AppState;
use crate::services::places_service::PlacesService;

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(get_health_check))
        .route_layer(Extension(app_state.places_service))
}

/// Liveness plus the number of geo buckets currently held.
async fn get_health_check(
    Extension(places_service): Extension<Arc<PlacesService>>,
) -> Json<Value> {
    Json(json!({ "ok": true, "cached_buckets": places_service.cache().len() }))
}
