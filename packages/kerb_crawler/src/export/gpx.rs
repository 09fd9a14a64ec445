//! Serialisation of a finished route to GPX 1.1, so that it can be loaded onto
//! a navigation device. The document holds a single track with a single
//! segment, with one trackpoint per vertex in the order they are visited.

use crate::common::error::RouteError;
use geo::Point;
use gpx::{Gpx, GpxVersion, Metadata, Track, TrackSegment, Waypoint};
use time::OffsetDateTime;

pub const TRACK_NAME: &str = "Kerbside collection route";
pub const TRACK_DESCRIPTION: &str =
    "Closed route covering every street in the network, favouring right turns";

/// Build a GPX document containing the provided (lat, lon) pairs as a single
/// track, stamped with the provided time
pub fn build_gpx(coords: &[(f64, f64)], time: OffsetDateTime) -> Gpx {
    let mut metadata = Metadata::default();
    metadata.name = Some(TRACK_NAME.to_string());
    metadata.description = Some(TRACK_DESCRIPTION.to_string());
    metadata.time = Some(time.into());

    let mut segment = TrackSegment::new();
    segment.points = coords
        .iter()
        .map(|(lat, lon)| Waypoint::new(Point::new(*lon, *lat)))
        .collect();

    let mut track = Track::new();
    track.name = Some(TRACK_NAME.to_string());
    track.segments.push(segment);

    let mut gpx = Gpx::default();
    gpx.version = GpxVersion::Gpx11;
    gpx.creator = Some(env!("CARGO_PKG_NAME").to_string());
    gpx.metadata = Some(metadata);
    gpx.tracks.push(track);

    gpx
}

/// Write the provided (lat, lon) pairs out as a GPX document
pub fn to_gpx_string(coords: &[(f64, f64)]) -> Result<String, RouteError> {
    let gpx = build_gpx(coords, OffsetDateTime::now_utc());

    let mut buffer = Vec::new();
    gpx::write(&gpx, &mut buffer)?;

    Ok(String::from_utf8(buffer)?)
}

/// Read the trackpoints back out of a GPX document as (lat, lon) pairs, in
/// the order they appear
pub fn read_track_coords(document: &str) -> Result<Vec<(f64, f64)>, RouteError> {
    let gpx = gpx::read(document.as_bytes())?;

    let coords = gpx
        .tracks
        .iter()
        .flat_map(|track| track.segments.iter())
        .flat_map(|segment| segment.points.iter())
        .map(|waypoint| {
            let point = waypoint.point();
            (point.y(), point.x())
        })
        .collect();

    Ok(coords)
}
