use std::str::FromStr;
use std::sync::Arc;
use axum::{Extension, Json, Router};
use axum::extract::Query;
use axum::routing::get;
use serde::{Deserialize, Serialize};
use tracing::warn;
use crate::controller::AppState;
use crate::errors::AppError;
use crate::models::place::SearchArea;
use crate::services::places_service::{PlacesQuery, PlacesResponse, PlacesService, DEFAULT_RADIUS_M};

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/places", get(search_places))
        .route_layer(Extension(app_state.places_service))
}

/// Raw query string; everything is optional here and validated in
/// [`PlacesParam::into_query`].
#[derive(Clone, Serialize, Deserialize, Debug, Default)]
pub struct PlacesParam {
    pub menu: Option<String>,
    #[serde(rename = "menuId")]
    pub menu_id: Option<String>,
    pub cat: Option<String>,
    pub x: Option<String>,
    pub y: Option<String>,
    pub radius: Option<String>,
}

impl PlacesParam {
    pub fn into_query(self) -> Result<PlacesQuery, AppError> {
        let lng: f64 = parse_required("x", self.x.as_deref())?;
        let lat: f64 = parse_required("y", self.y.as_deref())?;
        if !lng.is_finite() || !lat.is_finite() {
            return Err(AppError::InvalidQuery("x and y must be finite".to_string()));
        }

        let radius = match non_empty(self.radius) {
            Some(radius) => parse_required("radius", Some(radius.as_str()))?,
            None => DEFAULT_RADIUS_M,
        };

        let menu = non_empty(self.menu);
        let menu_id = non_empty(self.menu_id).or_else(|| menu.clone());

        Ok(PlacesQuery {
            menu,
            menu_id,
            category: non_empty(self.cat),
            area: SearchArea { lng, lat, radius },
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_required<T: FromStr>(name: &str, value: Option<&str>) -> Result<T, AppError> {
    let value = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::InvalidQuery(format!("{} is required", name)))?;

    value
        .parse()
        .map_err(|_| AppError::InvalidQuery(format!("{} has an invalid value: {}", name, value)))
}

pub async fn search_places(
    Extension(places_service): Extension<Arc<PlacesService>>,
    Query(params): Query<PlacesParam>,
) -> Result<Json<PlacesResponse>, AppError> {
    let query = params.into_query().map_err(|e| {
        warn!("Rejected places request: {}", e);
        e
    })?;

    match places_service.find_places(query).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            warn!("Something went wrong searching nearby places due to: {:#}", e);
            Err(AppError::Upstream(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(x: &str, y: &str) -> PlacesParam {
        PlacesParam {
            x: Some(x.to_string()),
            y: Some(y.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn radius_defaults_and_menu_id_falls_back_to_label() {
        let mut p = params("127.0", "37.5");
        p.menu = Some("스타벅스".to_string());
        p.cat = Some(String::new());

        let query = p.into_query().unwrap();
        assert_eq!(query.area.radius, 2000);
        assert_eq!(query.menu_id.as_deref(), Some("스타벅스"));
        assert_eq!(query.category, None);
    }

    #[test]
    fn missing_or_garbled_coordinates_are_rejected() {
        assert!(matches!(
            PlacesParam::default().into_query(),
            Err(AppError::InvalidQuery(_))
        ));
        assert!(matches!(params("abc", "37.5").into_query(), Err(AppError::InvalidQuery(_))));
        assert!(matches!(params("NaN", "37.5").into_query(), Err(AppError::InvalidQuery(_))));

        let mut p = params("127.0", "37.5");
        p.radius = Some("-5".to_string());
        assert!(matches!(p.into_query(), Err(AppError::InvalidQuery(_))));
    }
}
