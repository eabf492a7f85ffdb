use axum::response::IntoResponse;
use crate::errors::AppError;

pub async fn page_not_found_handler() -> impl IntoResponse {
    AppError::NotFound
}
