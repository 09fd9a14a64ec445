//! Geospatial primitives used while building the road graph and scoring
//! turns. Distances are great-circle distances on a spherical Earth, bearings
//! are compass headings measured clockwise from true north.

use geo::{Bearing, Haversine, Point};

/// Radius of the Earth in metres, as used for all distance calculations
pub const EARTH_RADIUS: f64 = 6_371_000.0;

/// Great-circle distance in metres between two latitude/longitude pairs,
/// using the haversine formula
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos()
            * lat2.to_radians().cos()
            * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS * c
}

/// Initial bearing in degrees for travel from the first point to the second,
/// normalised into [0, 360)
pub fn forward_bearing(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let origin = Point::new(lon1, lat1);
    let destination = Point::new(lon2, lat2);
    normalize_bearing(Haversine::bearing(origin, destination))
}

/// Wrap an arbitrary angle in degrees into [0, 360)
pub fn normalize_bearing(bearing: f64) -> f64 {
    let wrapped = bearing.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Bearing of the same street travelled in the opposite direction
pub fn reverse_bearing(bearing: f64) -> f64 {
    normalize_bearing(bearing + 180.0)
}

/// Signed change in heading when moving from the incoming bearing onto the
/// outgoing one, normalised into (-180, 180]. Positive values are clockwise
/// (right hand) turns.
pub fn turn_angle(incoming: f64, outgoing: f64) -> f64 {
    let angle = (outgoing - incoming).rem_euclid(360.0);
    if angle > 180.0 { angle - 360.0 } else { angle }
}
