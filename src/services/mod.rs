pub mod matching;
pub mod places_service;
