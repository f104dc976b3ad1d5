//! Great-circle geodesy: distance, bearing, and displacement on a spherical Earth.
//!
//! All functions here are total on valid `(lat, lon)` inputs and never fail;
//! they operate in decimal degrees (WGS-84 convention) and kilometers.

/// Mean Earth radius in kilometers, per `spec.md` §4.1.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS-84 coordinate, ordered `(lat, lon)` in decimal degrees.
pub type Coordinate = (f64, f64);

/// Great-circle distance between two coordinates, in kilometers.
pub fn haversine(a: Coordinate, b: Coordinate) -> f64 {
    let (lat1, lon1) = a;
    let (lat2, lon2) = b;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Initial bearing from `a` to `b`, in degrees, normalized to `[0, 360)`.
pub fn bearing(a: Coordinate, b: Coordinate) -> f64 {
    let (lat1, lon1) = a;
    let (lat2, lon2) = b;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let x = delta_lon.sin() * lat2_rad.cos();
    let y = lat1_rad.cos() * lat2_rad.sin() - lat1_rad.sin() * lat2_rad.cos() * delta_lon.cos();

    let deg = x.atan2(y).to_degrees();
    (deg + 360.0) % 360.0
}

/// Displaces `origin` by `distance_km` along `bearing_deg`, using the direct
/// spherical formulation.
pub fn move_point(origin: Coordinate, bearing_deg: f64, distance_km: f64) -> Coordinate {
    let (lat, lon) = origin;

    let lat_rad = lat.to_radians();
    let lon_rad = lon.to_radians();
    let bearing_rad = bearing_deg.to_radians();
    let angular_distance = distance_km / EARTH_RADIUS_KM;

    let new_lat_rad = (lat_rad.sin() * angular_distance.cos()
        + lat_rad.cos() * angular_distance.sin() * bearing_rad.cos())
    .asin();

    let new_lon_rad = lon_rad
        + (bearing_rad.sin() * angular_distance.sin() * lat_rad.cos())
            .atan2(angular_distance.cos() - lat_rad.sin() * new_lat_rad.sin());

    (new_lat_rad.to_degrees(), new_lon_rad.to_degrees())
}
