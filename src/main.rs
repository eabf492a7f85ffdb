use std::sync::Arc;
use std::time::Duration;
use clap::Parser;
use dotenv::dotenv;
use tracing::info;
use nearby_menu_backend::config::Config;
use nearby_menu_backend::controller::{self, AppState};
use nearby_menu_backend::models::menu_index::MenuIndex;
use nearby_menu_backend::repositories::geo_cache::{GeoCache, SystemClock};
use nearby_menu_backend::repositories::kakao_repo::KakaoLocalRepo;
use nearby_menu_backend::services::places_service::PlacesService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::parse();

    let menu_index = Arc::new(MenuIndex::load(&config.menu_index_path)?);
    info!(
        "Loaded menu index with {} categories and {} menus",
        menu_index.categories().count(),
        menu_index.menu_count()
    );

    let kakao_repo = KakaoLocalRepo::new(
        &config.kakao_base_url,
        &config.kakao_rest_key,
        Duration::from_secs(config.upstream_timeout_secs),
    )?;
    let geo_cache = GeoCache::new(
        time::Duration::seconds(config.cache_ttl_secs as i64),
        Arc::new(SystemClock),
    );

    let places_service = Arc::new(PlacesService::new(
        Arc::new(kakao_repo),
        geo_cache,
        menu_index.clone(),
        config.max_pages,
        config.page_size,
    ));

    controller::serve(
        AppState {
            menu_index,
            places_service,
        },
        &config,
    ).await
}
