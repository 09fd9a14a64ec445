//! Defines a struct to represent a bounding box, which is used to represent
//! a 2d square(ish) on the planet's surface. This is returned alongside a
//! completed route, as it can be used to set the viewport on a map
//! visualization

use serde::Serialize;

/// A bounding box for geographical data. Contains the minimum and maximum
/// latitudes & longitudes, defining a 'rectangle' on the surface of the Earth
#[derive(Debug, Serialize, PartialEq)]
pub struct BBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BBox {
    /// Create the smallest bounding box which contains every one of the
    /// provided (lat, lon) pairs. Returns None if no coordinates are given.
    pub fn from_coords(coords: &[(f64, f64)]) -> Option<Self> {
        let (first_lat, first_lon) = *coords.first()?;

        let seed = BBox {
            min_lat: first_lat,
            min_lon: first_lon,
            max_lat: first_lat,
            max_lon: first_lon,
        };

        let bbox = coords.iter().fold(seed, |bbox, (lat, lon)| BBox {
            min_lat: bbox.min_lat.min(*lat),
            min_lon: bbox.min_lon.min(*lon),
            max_lat: bbox.max_lat.max(*lat),
            max_lon: bbox.max_lon.max(*lon),
        });

        Some(bbox)
    }

    /// Determine the latitude and longitude which form the centre point of
    /// the bounding box
    pub fn get_centre(&self) -> (f64, f64) {
        let lat_delta = self.max_lat - self.min_lat;
        let lon_delta = self.max_lon - self.min_lon;
        (
            self.min_lat + (lat_delta / 2.0),
            self.min_lon + (lon_delta / 2.0),
        )
    }
}
