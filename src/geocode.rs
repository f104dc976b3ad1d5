//! Optional reverse-geocoding corroborator (`spec.md` §6, §9 Open
//! Questions). Gated behind the `geocode` feature and the
//! `GOOGLE_MAPS_API_KEY` environment variable, advisory only, and never
//! called by `planner::find_sea_route` itself.
//!
//! Reverse-geocodes a coordinate via the Google Maps Geocoding API and
//! treats a handful of street-level result types as land indicators.

use serde::Deserialize;

use crate::error::{Result, SeaRouteError};

const GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Result types that, per the python original, strongly indicate a
/// land-based location.
const LAND_INDICATORS: [&str; 4] = ["route", "street_address", "premise", "intersection"];

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    #[serde(default)]
    types: Vec<String>,
}

/// Reverse-geocodes `(lat, lon)` via the Google Maps Geocoding API and
/// reports whether any result carries a land-indicating type. Fails with
/// `ConfigMissing` if `GOOGLE_MAPS_API_KEY` is not set (`spec.md` §7).
pub fn corroborate_is_land(lat: f64, lon: f64) -> Result<bool> {
    let api_key = std::env::var("GOOGLE_MAPS_API_KEY")
        .map_err(|_| SeaRouteError::ConfigMissing("GOOGLE_MAPS_API_KEY"))?;

    let client = reqwest::blocking::Client::new();
    let response = client
        .get(GEOCODE_URL)
        .query(&[("latlng", format!("{lat},{lon}")), ("key", api_key)])
        .send()
        .map_err(|e| SeaRouteError::Geocode(e.to_string()))?;

    let body: GeocodeResponse = response.json().map_err(|e| SeaRouteError::Geocode(e.to_string()))?;

    Ok(body
        .results
        .iter()
        .any(|result| result.types.iter().any(|t| LAND_INDICATORS.contains(&t.as_str()))))
}
