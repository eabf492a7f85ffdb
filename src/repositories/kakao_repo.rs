use std::time::Duration;
use anyhow::Context;
use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::models::place::{PlaceDocument, SearchArea, SearchPage};

/// Kakao category group for restaurants.
pub const RESTAURANT_CATEGORY: &str = "FD6";
pub const CATEGORY_SEARCH_PATH: &str = "/v2/local/search/category.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 3;

/// A paginated nearby place search.
pub trait PlaceSearch: Send + Sync {
    fn search_page<'a>(
        &'a self,
        area: &'a SearchArea,
        page: u32,
        size: u32,
    ) -> BoxFuture<'a, anyhow::Result<SearchPage>>;
}

#[derive(Clone, Serialize, Debug)]
struct KakaoCategoryParams<'a> {
    category_group_code: &'a str,
    x: f64,
    y: f64,
    radius: u32,
    page: u32,
    size: u32,
    sort: &'a str,
}

#[derive(Deserialize, Debug, Default)]
struct KakaoMeta {
    #[serde(default)]
    is_end: bool,
}

#[derive(Deserialize, Debug)]
struct KakaoCategoryResponse {
    #[serde(default)]
    documents: Vec<PlaceDocument>,
    #[serde(default)]
    meta: KakaoMeta,
}

pub struct KakaoLocalRepo {
    client: Client,
    base_url: String,
    rest_key: String,
}

impl KakaoLocalRepo {
    pub fn new(
        base_url: &str,
        rest_key: &str,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build the Kakao HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            rest_key: rest_key.to_string(),
        })
    }

    async fn fetch_category_page(
        &self,
        area: &SearchArea,
        page: u32,
        size: u32,
    ) -> anyhow::Result<SearchPage> {
        let params = KakaoCategoryParams {
            category_group_code: RESTAURANT_CATEGORY,
            x: area.lng,
            y: area.lat,
            radius: area.radius,
            page,
            size,
            sort: "accuracy",
        };

        debug!("Fetching Kakao category page {} for {:?}", page, area);
        let response: KakaoCategoryResponse = self
            .client
            .get(format!("{}{}", self.base_url, CATEGORY_SEARCH_PATH))
            .header(AUTHORIZATION, format!("KakaoAK {}", self.rest_key))
            .query(&params)
            .send()
            .await
            .with_context(|| format!("Kakao request for page {} failed", page))?
            .error_for_status()
            .with_context(|| format!("Kakao rejected page {}", page))?
            .json()
            .await
            .with_context(|| format!("Kakao returned an unreadable page {}", page))?;

        Ok(SearchPage {
            documents: response.documents,
            is_end: response.meta.is_end,
        })
    }
}

impl PlaceSearch for KakaoLocalRepo {
    fn search_page<'a>(
        &'a self,
        area: &'a SearchArea,
        page: u32,
        size: u32,
    ) -> BoxFuture<'a, anyhow::Result<SearchPage>> {
        self.fetch_category_page(area, page, size).boxed()
    }
}
