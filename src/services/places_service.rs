use std::sync::Arc;
use serde::Serialize;
use tracing::info;
use crate::helpers::geo::geo_key;
use crate::models::menu_index::MenuIndex;
use crate::models::place::{PlaceItem, SearchArea};
use crate::repositories::geo_cache::{CachePayload, GeoCache};
use crate::repositories::kakao_repo::PlaceSearch;
use crate::services::matching::{dedup_places, match_and_rank};

pub const DEFAULT_RADIUS_M: u32 = 2000;
pub const DEFAULT_MAX_PAGES: u32 = 10;
pub const DEFAULT_PAGE_SIZE: u32 = 15;

/// A validated places lookup.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacesQuery {
    pub menu: Option<String>,
    pub menu_id: Option<String>,
    pub category: Option<String>,
    pub area: SearchArea,
}

#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct PlacesResponse {
    pub ok: bool,
    pub count: usize,
    pub cat: String,
    pub menu: Option<String>,
    #[serde(rename = "menuId")]
    pub menu_id: Option<String>,
    pub places: Vec<PlaceItem>,
    pub kakao_pages_loaded: u32,
    pub kakao_raw_count: usize,
}

pub struct PlacesService {
    search: Arc<dyn PlaceSearch>,
    cache: GeoCache,
    menu_index: Arc<MenuIndex>,
    max_pages: u32,
    page_size: u32,
}

impl PlacesService {
    pub fn new(
        search: Arc<dyn PlaceSearch>,
        cache: GeoCache,
        menu_index: Arc<MenuIndex>,
        max_pages: u32,
        page_size: u32,
    ) -> Self {
        Self {
            search,
            cache,
            menu_index,
            max_pages: max_pages.max(1),
            page_size,
        }
    }

    pub fn cache(&self) -> &GeoCache {
        &self.cache
    }

    pub async fn find_places(&self, query: PlacesQuery) -> anyhow::Result<PlacesResponse> {
        let key = geo_key(query.area.lng, query.area.lat, query.area.radius);
        let entry = self
            .cache
            .get_or_load(&key, || self.load_area(&query.area))
            .await?;

        let resolved = self
            .menu_index
            .resolve(query.category.as_deref(), query.menu_id.as_deref());

        let places = match_and_rank(&entry.places, &resolved.brands, query.area.lng, query.area.lat);

        Ok(PlacesResponse {
            ok: true,
            count: places.len(),
            cat: resolved.category,
            menu: query.menu,
            menu_id: query.menu_id,
            places,
            kakao_pages_loaded: entry.pages_loaded,
            kakao_raw_count: entry.raw_count,
        })
    }

    /// Pages through the provider until it reports the last page or the cap
    /// is hit. Any page failing fails the whole load.
    async fn load_area(&self, area: &SearchArea) -> anyhow::Result<CachePayload> {
        let mut documents = Vec::new();
        let mut pages_loaded = 0;

        for page in 1..=self.max_pages {
            let result = self.search.search_page(area, page, self.page_size).await?;
            documents.extend(result.documents);
            pages_loaded = page;

            if result.is_end {
                break;
            }
        }

        let raw_count = documents.len();
        let places = dedup_places(documents);
        info!(
            "Loaded {} places ({} raw, {} pages) around {:?}",
            places.len(),
            raw_count,
            pages_loaded,
            area
        );

        Ok(CachePayload {
            places,
            pages_loaded,
            raw_count,
        })
    }

    #[cfg(test)]
    fn cached_entry(&self, area: &SearchArea) -> Option<crate::repositories::geo_cache::CacheEntry> {
        self.cache.get(&geo_key(area.lng, area.lat, area.radius))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use serde_json::json;
    use crate::models::place::{PlaceDocument, SearchPage};
    use crate::repositories::geo_cache::tests::ManualClock;
    use crate::repositories::geo_cache::DEFAULT_TTL;

    /// Serves pre-baked pages; `fail_on` makes that page error out.
    struct FakeSearch {
        pages: Vec<SearchPage>,
        fail_on: Option<u32>,
        calls: AtomicU32,
    }

    impl FakeSearch {
        fn new(pages: Vec<SearchPage>) -> Self {
            Self { pages, fail_on: None, calls: AtomicU32::new(0) }
        }
    }

    impl PlaceSearch for FakeSearch {
        fn search_page<'a>(
            &'a self,
            _area: &'a SearchArea,
            page: u32,
            _size: u32,
        ) -> BoxFuture<'a, anyhow::Result<SearchPage>> {
            async move {
                self.calls.fetch_add(1, Ordering::SeqCst);
                if self.fail_on == Some(page) {
                    anyhow::bail!("provider returned 500 on page {}", page);
                }
                Ok(self.pages.get(page as usize - 1).cloned().unwrap_or(SearchPage {
                    documents: Vec::new(),
                    is_end: false,
                }))
            }
            .boxed()
        }
    }

    fn doc(name: &str, x: &str, y: &str) -> PlaceDocument {
        PlaceDocument {
            place_name: name.to_string(),
            x: x.to_string(),
            y: y.to_string(),
            ..Default::default()
        }
    }

    fn menu_index() -> Arc<MenuIndex> {
        Arc::new(
            serde_json::from_value(json!({
                "korean": { "국밥": ["돼지국밥"] },
                "western": { "스타벅스": ["스타벅스"] },
            }))
            .unwrap(),
        )
    }

    fn service(search: Arc<FakeSearch>, max_pages: u32) -> PlacesService {
        PlacesService::new(
            search,
            GeoCache::new(DEFAULT_TTL, Arc::new(ManualClock::new())),
            menu_index(),
            max_pages,
            DEFAULT_PAGE_SIZE,
        )
    }

    fn area(radius: u32) -> SearchArea {
        SearchArea { lng: 127.0, lat: 37.5, radius }
    }

    fn query(menu: &str, cat: Option<&str>, radius: u32) -> PlacesQuery {
        PlacesQuery {
            menu: Some(menu.to_string()),
            menu_id: Some(menu.to_string()),
            category: cat.map(str::to_string),
            area: area(radius),
        }
    }

    #[tokio::test]
    async fn returns_single_substring_match() {
        let search = Arc::new(FakeSearch::new(vec![SearchPage {
            documents: vec![
                doc("스타벅스 강남역점", "127.01", "37.5"),
                doc("돼지국밥 본점", "127.002", "37.5"),
                doc("김밥천국", "127.003", "37.5"),
            ],
            is_end: true,
        }]));
        let service = service(search.clone(), DEFAULT_MAX_PAGES);

        let response = service.find_places(query("스타벅스", Some("western"), 1000)).await.unwrap();

        assert_eq!(response.count, 1);
        assert_eq!(response.cat, "western");
        assert_eq!(response.places[0].name, "스타벅스 강남역점");
        let distance = response.places[0].distance.unwrap();
        assert!((880..=884).contains(&distance));
        assert_eq!(response.kakao_pages_loaded, 1);
        assert_eq!(response.kakao_raw_count, 3);
    }

    #[tokio::test]
    async fn unknown_menu_yields_no_places() {
        let search = Arc::new(FakeSearch::new(vec![SearchPage {
            documents: vec![doc("스타벅스", "127.0", "37.5")],
            is_end: true,
        }]));
        let service = service(search, DEFAULT_MAX_PAGES);

        let response = service.find_places(query("마라탕", None, 1000)).await.unwrap();

        assert_eq!(response.count, 0);
        assert!(response.places.is_empty());
        assert_eq!(response.cat, "");
    }

    #[tokio::test]
    async fn category_is_inferred_when_omitted() {
        let search = Arc::new(FakeSearch::new(vec![SearchPage {
            documents: vec![doc("돼지국밥 본점", "127.0", "37.5")],
            is_end: true,
        }]));
        let service = service(search, DEFAULT_MAX_PAGES);

        let response = service.find_places(query("국밥", None, 1000)).await.unwrap();

        assert_eq!(response.cat, "korean");
        assert_eq!(response.count, 1);
    }

    #[tokio::test]
    async fn pagination_stops_at_is_end_and_dedups() {
        let search = Arc::new(FakeSearch::new(vec![
            SearchPage { documents: vec![doc("a", "1", "1"), doc("b", "1", "1")], is_end: false },
            SearchPage { documents: vec![doc("a", "1", "1")], is_end: true },
            SearchPage { documents: vec![doc("never", "1", "1")], is_end: true },
        ]));
        let service = service(search.clone(), DEFAULT_MAX_PAGES);

        let response = service.find_places(query("스타벅스", None, 500)).await.unwrap();
        let entry = service.cached_entry(&area(500)).unwrap();

        assert_eq!(search.calls.load(Ordering::SeqCst), 2);
        assert_eq!(response.kakao_pages_loaded, 2);
        assert_eq!(response.kakao_raw_count, 3);
        assert_eq!(entry.places.len(), 2);
    }

    #[tokio::test]
    async fn pagination_stops_at_page_cap() {
        let search = Arc::new(FakeSearch::new(Vec::new()));
        let service = service(search.clone(), 3);

        let response = service.find_places(query("스타벅스", None, 500)).await.unwrap();

        assert_eq!(search.calls.load(Ordering::SeqCst), 3);
        assert_eq!(response.kakao_pages_loaded, 3);
    }

    #[tokio::test]
    async fn failure_mid_pagination_aborts_and_caches_nothing() {
        let search = Arc::new(FakeSearch {
            pages: Vec::new(),
            fail_on: Some(2),
            calls: AtomicU32::new(0),
        });
        let service = service(search, DEFAULT_MAX_PAGES);

        let result = service.find_places(query("스타벅스", None, 500)).await;

        assert!(result.is_err());
        assert!(service.cache().is_empty());
    }

    #[tokio::test]
    async fn second_lookup_in_same_bucket_hits_cache() {
        let search = Arc::new(FakeSearch::new(vec![SearchPage {
            documents: vec![doc("스타벅스", "127.0", "37.5")],
            is_end: true,
        }]));
        let service = service(search.clone(), DEFAULT_MAX_PAGES);

        service.find_places(query("스타벅스", None, 1000)).await.unwrap();
        let mut nearby = query("국밥", None, 1000);
        nearby.area.lng += 0.0001;
        service.find_places(nearby).await.unwrap();

        assert_eq!(search.calls.load(Ordering::SeqCst), 1);
    }
}
