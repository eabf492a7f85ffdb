use std::sync::Arc;
use axum::{Extension, Json, Router};
use axum::response::IntoResponse;
use axum::routing::get;
use serde_json::json;
use crate::controller::AppState;
use crate::models::menu_index::MenuIndex;

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/categories", get(retrieve_categories))
        .route_layer(Extension(app_state.menu_index))
}

/// The whole menu index, as loaded at startup.
pub async fn retrieve_categories(
    Extension(menu_index): Extension<Arc<MenuIndex>>,
) -> impl IntoResponse {
    Json(json!({ "ok": true, "data": menu_index.as_ref() }))
}
