use clap::Parser;
use crate::repositories::geo_cache::DEFAULT_TTL;
use crate::repositories::kakao_repo::DEFAULT_TIMEOUT_SECS;
use crate::services::places_service::{DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE};

#[derive(Parser, Clone, Debug)]
#[command(about = "Nearby restaurant lookup filtered by menu")]
pub struct Config {
    /// REST API key for the Kakao Local search API
    #[clap(env, long)]
    pub kakao_rest_key: String,

    #[clap(env, long, default_value = "https://dapi.kakao.com")]
    pub kakao_base_url: String,

    /// Pre-built category -> menu -> brand names index
    #[clap(env, long, default_value = "menu_index.json")]
    pub menu_index_path: String,

    #[clap(env, long, default_value = "127.0.0.1")]
    pub host: String,

    #[clap(env, long, default_value_t = 5000)]
    pub port: u16,

    /// Comma separated list of allowed CORS origins
    #[clap(env, long, default_value = "http://localhost:5173")]
    pub origin_urls: String,

    #[clap(env, long, default_value_t = DEFAULT_TTL.whole_seconds() as u64)]
    pub cache_ttl_secs: u64,

    #[clap(env, long, default_value_t = DEFAULT_MAX_PAGES)]
    pub max_pages: u32,

    #[clap(env, long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,

    #[clap(env, long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub upstream_timeout_secs: u64,
}
