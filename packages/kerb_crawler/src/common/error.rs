//! Errors which can bring a route planning run to a halt. Anything which can
//! be worked around (unmatched odd vertices, references to unknown nodes) is
//! logged instead of being raised here.

use std::string::FromUtf8Error;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RouteError {
    #[error("no street segments were provided after filtering")]
    NoSegments,

    #[error("no routable network remains after connectivity reduction")]
    NoRoutableNetwork,

    #[error("invalid route configuration: {0}")]
    InvalidConfig(String),

    #[error("GPX error: {0}")]
    Gpx(#[from] gpx::errors::GpxError),

    #[error("generated GPX document is not valid UTF-8: {0}")]
    GpxEncoding(#[from] FromUtf8Error),
}
