//! Nearby restaurant lookup filtered by menu.
//!
//! A request names a point, a radius and a menu. Restaurants around the
//! point come from the Kakao Local category search and are cached per
//! rounded geo bucket; the menu resolves to a list of brand names through a
//! static index, and only places whose names match one of those brands are
//! returned, nearest first.
//!
//! # Endpoints
//! - `GET /api/categories`: the menu index
//! - `GET /api/places?menu=&menuId=&cat=&x=&y=&radius=`: matching places
//! - `GET /health`

pub mod config;
pub mod controller;
pub mod errors;
pub mod helpers;
pub mod models;
pub mod repositories;
pub mod services;
