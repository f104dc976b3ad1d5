//! Structured errors for the routing engine, per `spec.md` §7.
//!
//! Cache-loading failures (`CacheInvalid`) and individual malformed
//! polygons (`BadPolygon`-shaped cases) are handled internally and never
//! escape as this error type to a caller (see `coastline::cache` and
//! `coastline::store`), but the variants stay here so the internal
//! plumbing has a single error type to propagate with `?`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeaRouteError {
    #[error("Configuration missing: {0}")]
    ConfigMissing(&'static str),

    #[error("Polygon source not found: {0}")]
    SourceMissing(PathBuf),

    #[error("Coastline cache invalid: {0}")]
    CacheInvalid(String),

    #[error("Land/water predicate invoked before the coastline store has geometry")]
    StoreNotReady,

    #[error("No route found - destination unreachable")]
    Unreachable,

    #[error("Start point is not in safe water")]
    StartOnLand,

    #[error("End point is not in safe water")]
    EndOnLand,

    #[error("Invalid bounding box: {0}")]
    InvalidBbox(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cache (de)serialization error: {0}")]
    Cache(#[from] Box<bincode::ErrorKind>),

    #[error("GeoJSON parse error: {0}")]
    GeojsonParse(String),

    #[error("Shapefile error: {0}")]
    Shapefile(String),

    #[cfg(feature = "geocode")]
    #[error("Geocoding request failed: {0}")]
    Geocode(String),
}

pub type Result<T> = std::result::Result<T, SeaRouteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_on_land_message() {
        let err = SeaRouteError::StartOnLand;
        assert_eq!(err.to_string(), "Start point is not in safe water");
    }

    #[test]
    fn end_on_land_message() {
        let err = SeaRouteError::EndOnLand;
        assert_eq!(err.to_string(), "End point is not in safe water");
    }

    #[test]
    fn unreachable_message() {
        let err = SeaRouteError::Unreachable;
        assert_eq!(err.to_string(), "No route found - destination unreachable");
    }
}
