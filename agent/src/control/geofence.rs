//! Great-circle distance and home-zone membership

/// Earth radius used for all distance computations, in meters
pub const EARTH_RADIUS_METERS: f64 = 6_371_230.0;

/// Haversine distance between two coordinates, in meters
pub fn distance_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    // a can drift a hair past 1.0 for antipodal points
    let c = 2.0 * a.sqrt().atan2((1.0 - a).max(0.0).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Strictly inside the radius; a point on the boundary is outside
pub fn is_within(distance: f64, radius_meters: f64) -> bool {
    distance < radius_meters
}
