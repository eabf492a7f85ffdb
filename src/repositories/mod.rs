pub mod geo_cache;
pub mod kakao_repo;
