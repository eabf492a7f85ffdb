use std::collections::HashSet;
use crate::helpers::text::normalize;
use crate::models::place::{PlaceDocument, PlaceItem};

/// Drops repeated documents, keyed on normalized name plus the raw
/// coordinates. First occurrence wins and order is kept.
pub fn dedup_places(documents: Vec<PlaceDocument>) -> Vec<PlaceDocument> {
    let mut seen = HashSet::new();

    documents
        .into_iter()
        .filter(|doc| seen.insert((normalize(&doc.place_name), doc.x.clone(), doc.y.clone())))
        .collect()
}

/// Either name containing the other counts as a match. Both sides must
/// already be normalized; an empty side never matches.
pub fn names_match(place: &str, brand: &str) -> bool {
    !place.is_empty() && !brand.is_empty() && (place.contains(brand) || brand.contains(place))
}

/// Places whose names match any of `brands`, projected relative to the
/// requested point and ordered nearest first. Places without a known
/// distance go last.
pub fn match_and_rank(
    places: &[PlaceDocument],
    brands: &[String],
    base_lng: f64,
    base_lat: f64,
) -> Vec<PlaceItem> {
    let brand_keys: Vec<String> = brands.iter().map(|brand| normalize(brand)).collect();
    if brand_keys.iter().all(String::is_empty) {
        return Vec::new();
    }

    let mut matched: Vec<PlaceItem> = places
        .iter()
        .filter(|doc| {
            let place_key = normalize(&doc.place_name);
            brand_keys.iter().any(|brand| names_match(&place_key, brand))
        })
        .map(|doc| doc.to_place_item(base_lng, base_lat))
        .collect();

    // stable, None after every Some
    matched.sort_by_key(|item| (item.distance.is_none(), item.distance));
    matched
}
