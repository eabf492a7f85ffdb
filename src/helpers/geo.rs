/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Cache bucket for a query area. Coordinates are rounded to 3 decimals
/// (roughly a hundred meters), so nearby queries share one bucket.
pub fn geo_key(lng: f64, lat: f64, radius: u32) -> String {
    format!("{:.3}:{:.3}:{}", round3(lng), round3(lat), radius)
}

fn round3(value: f64) -> f64 {
    let rounded = (value * 1000.0).round() / 1000.0;
    // avoid "-0.000" and "0.000" landing in different buckets
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Great-circle distance in whole meters, truncated.
pub fn haversine_m(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> u64 {
    let p1 = lat1.to_radians();
    let p2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lng2 - lng1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + p1.cos() * p2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    (EARTH_RADIUS_M * c) as u64
}
