use std::net::SocketAddr;
use std::sync::Arc;
use anyhow::Context;
use axum::http::HeaderValue;
use axum::Router;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use crate::config::Config;
use crate::helpers::handler_404::page_not_found_handler;
use crate::models::menu_index::MenuIndex;
use crate::services::places_service::PlacesService;

pub mod categories_controller;
pub mod health_check;
pub mod places_controller;

/// Everything a handler may touch. The menu index is read-only; the places
/// service owns the geo cache and the upstream client.
#[derive(Clone)]
pub struct AppState {
    pub menu_index: Arc<MenuIndex>,
    pub places_service: Arc<PlacesService>,
}

pub async fn serve(
    app_state: AppState,
    config: &Config,
) -> anyhow::Result<()> {
    let origins: Vec<HeaderValue> = config
        .origin_urls
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| match s.parse() {
            Ok(origin) => Some(origin),
            Err(e) => {
                warn!("Ignoring invalid CORS origin {}: {}", s, e);
                None
            }
        })
        .collect();

    let application = router_endpoints(app_state)
        .layer(
            ServiceBuilder::new()
                .layer(
                    CorsLayer::new()
                        .allow_methods([Method::GET, Method::OPTIONS])
                        .allow_origin(origins)
                        .allow_headers([CONTENT_TYPE])
                )
                .layer(CompressionLayer::new())
        );

    let address: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", config.host, config.port))?;
    info!("API server listening on: {}", address);
    axum::Server::try_bind(&address)
        .with_context(|| format!("Failed to bind {}", address))?
        .serve(application.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Error spinning up the API server")
}

pub fn router_endpoints(app_state: AppState) -> Router {
    Router::new()
        .nest(
            "/api",
            categories_controller::router(app_state.clone())
                .merge(places_controller::router(app_state.clone())),
        )
        .merge(health_check::router(app_state))
        .fallback(page_not_found_handler)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutting down API server");
}
