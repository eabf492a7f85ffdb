use serde::{Deserialize, Serialize};
use serde_with::{serde_as, NoneAsEmptyString};
use crate::helpers::geo::haversine_m;

const KAKAO_MAP_SEARCH_LINK: &str = "https://map.kakao.com/link/search/";

/// The fields of a provider document this service consumes. Anything
/// missing decodes to an empty value instead of failing the page.
#[serde_as]
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct PlaceDocument {
    #[serde(default)]
    pub place_name: String,
    #[serde(default)]
    pub road_address_name: String,
    #[serde(default)]
    pub address_name: String,
    #[serde(default)]
    pub phone: String,
    /// Longitude, kept as the provider sent it.
    #[serde(default)]
    pub x: String,
    /// Latitude, kept as the provider sent it.
    #[serde(default)]
    pub y: String,
    /// Meters from the requested point, only sent when the request had one.
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub distance: Option<f64>,
}

impl PlaceDocument {
    pub fn lng(&self) -> Option<f64> {
        self.x.trim().parse().ok()
    }

    pub fn lat(&self) -> Option<f64> {
        self.y.trim().parse().ok()
    }

    pub fn address(&self) -> &str {
        if !self.road_address_name.is_empty() {
            &self.road_address_name
        } else {
            &self.address_name
        }
    }

    /// Provider distance when present, else great-circle distance from the
    /// given point.
    pub fn distance_from(&self, lng: f64, lat: f64) -> Option<u64> {
        if let Some(distance) = self.distance.filter(|d| d.is_finite() && *d >= 0.0) {
            return Some(distance as u64);
        }

        match (self.lat(), self.lng()) {
            (Some(place_lat), Some(place_lng)) => Some(haversine_m(lat, lng, place_lat, place_lng)),
            _ => None,
        }
    }

    pub fn to_place_item(&self, base_lng: f64, base_lat: f64) -> PlaceItem {
        PlaceItem {
            name: self.place_name.clone(),
            address: self.address().to_string(),
            tel: self.phone.clone(),
            lat: self.lat(),
            lng: self.lng(),
            distance: self.distance_from(base_lng, base_lat),
            kakaomap_link: format!(
                "{}{}",
                KAKAO_MAP_SEARCH_LINK,
                urlencoding::encode(&self.place_name)
            ),
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct PlaceItem {
    pub name: String,
    pub address: String,
    pub tel: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub distance: Option<u64>,
    pub kakaomap_link: String,
}

/// Center and radius (meters) of a category search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchArea {
    pub lng: f64,
    pub lat: f64,
    pub radius: u32,
}

/// One page of provider results.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchPage {
    pub documents: Vec<PlaceDocument>,
    pub is_end: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_provider_document_with_defaults() {
        let doc: PlaceDocument = serde_json::from_value(json!({
            "place_name": "스타벅스 강남점",
            "x": "127.0276",
            "y": "37.4979",
            "distance": "",
            "category_name": "음식점 > 카페",
        }))
        .unwrap();

        assert_eq!(doc.place_name, "스타벅스 강남점");
        assert_eq!(doc.distance, None);
        assert_eq!(doc.phone, "");
        assert_eq!(doc.lng(), Some(127.0276));
    }

    #[test]
    fn provider_distance_wins_over_haversine() {
        let doc: PlaceDocument = serde_json::from_value(json!({
            "place_name": "a", "x": "127.01", "y": "37.5", "distance": "120.9",
        }))
        .unwrap();

        assert_eq!(doc.distance_from(127.0, 37.5), Some(120));
    }

    #[test]
    fn falls_back_to_haversine_and_then_to_none() {
        let mut doc = PlaceDocument {
            place_name: "a".to_string(),
            x: "127.01".to_string(),
            y: "37.5".to_string(),
            ..Default::default()
        };
        let d = doc.distance_from(127.0, 37.5).unwrap();
        assert!((880..=884).contains(&d));

        doc.x = String::new();
        assert_eq!(doc.distance_from(127.0, 37.5), None);
    }

    #[test]
    fn place_item_prefers_road_address_and_encodes_link() {
        let doc = PlaceDocument {
            place_name: "버거 킹".to_string(),
            road_address_name: "서울 강남구 테헤란로 1".to_string(),
            address_name: "서울 강남구 역삼동 1".to_string(),
            phone: "02-000-0000".to_string(),
            x: "127.0".to_string(),
            y: "37.5".to_string(),
            distance: Some(42.0),
        };

        let item = doc.to_place_item(127.0, 37.5);
        assert_eq!(item.address, "서울 강남구 테헤란로 1");
        assert_eq!(item.tel, "02-000-0000");
        assert_eq!(item.distance, Some(42));
        assert_eq!(
            item.kakaomap_link,
            "https://map.kakao.com/link/search/%EB%B2%84%EA%B1%B0%20%ED%82%B9"
        );
    }
}
