//! Planner façade: the public routing API (`spec.md` §4.7, §6, C7).
//!
//! Owns the process-wide coastline store singleton (§5, §9 option (b)):
//! a lazily-initialized, mutex-guarded `Arc<CoastlineStore>` that is
//! replaced wholesale when the caller's bbox requirement changes, and is
//! immutable once installed.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock};

use crate::coastline::cache::{self, Cache, CacheEntry};
use crate::coastline::predicate;
use crate::coastline::source::{GeoJsonSource, PolygonSource, ShapefileSource};
use crate::coastline::{BoundingBox, CoastlineStore, RegionMeta, DEFAULT_BBOX, YELLOW_SEA_BBOX};
use crate::error::{Result, SeaRouteError};
use crate::grid::KM_PER_DEGREE;
use crate::logger;
use crate::router::{self, RouteSearch};

/// Default margin applied around both endpoints' bbox when a custom
/// region is needed, per `spec.md` §4.7 and §8's S6.
const MIN_MARGIN_KM: f64 = 200.0;
const MARGIN_CLEARANCE_FACTOR: f64 = 5.0;

const DEFAULT_STEP_KM: f64 = 10.0;
const DEFAULT_CLEARANCE_KM: f64 = 10.0;
/// Accepted for API compatibility but not forwarded to the router, which
/// uses its own 1,000,000 cap (`spec.md` §4.6).
const DEFAULT_MAX_ITERATIONS: u64 = 1000;

/// Where the coastline store's polygons come from, configured once via
/// `set_source` before the first routing call.
#[derive(Debug, Clone)]
pub enum DataSource {
    Shapefile(PathBuf),
    GeoJson(PathBuf),
}

impl DataSource {
    fn open(&self) -> Box<dyn PolygonSource> {
        match self {
            DataSource::Shapefile(path) => Box::new(ShapefileSource::new(path)),
            DataSource::GeoJson(path) => Box::new(GeoJsonSource::new(path)),
        }
    }
}

struct StoreHandle {
    bbox: BoundingBox,
    is_yellow_sea: bool,
    store: Arc<CoastlineStore>,
}

static SOURCE: OnceLock<Mutex<Option<DataSource>>> = OnceLock::new();
static CACHE_DIR: OnceLock<Mutex<PathBuf>> = OnceLock::new();
static STORE: OnceLock<Mutex<Option<StoreHandle>>> = OnceLock::new();

fn source_slot() -> &'static Mutex<Option<DataSource>> {
    SOURCE.get_or_init(|| Mutex::new(None))
}

fn cache_dir_slot() -> &'static Mutex<PathBuf> {
    CACHE_DIR.get_or_init(|| Mutex::new(cache::default_cache_dir()))
}

fn store_slot() -> &'static Mutex<Option<StoreHandle>> {
    STORE.get_or_init(|| Mutex::new(None))
}

/// Configures where the coastline store's polygons are read from.
/// Must be called before the first routing call; replacing it does not
/// retroactively invalidate an already-installed store.
pub fn set_source(source: DataSource) {
    *source_slot().lock().expect("source mutex poisoned") = Some(source);
}

/// Overrides the persistent cache directory (default:
/// `std::env::temp_dir()/sea-route-cache/`).
pub fn set_cache_dir(dir: PathBuf) {
    *cache_dir_slot().lock().expect("cache dir mutex poisoned") = dir;
}

/// Installs the Yellow Sea store if it is not already the active store.
pub fn init_yellow_sea() -> Result<()> {
    ensure_store(YELLOW_SEA_BBOX, true, Some(RegionMeta::yellow_sea())).map(|_| ())
}

/// Installs a store covering `bbox` if it is not already the active one.
pub fn init_for_route(bbox: BoundingBox) -> Result<()> {
    ensure_store(bbox, false, None).map(|_| ())
}

fn ensure_store(bbox: BoundingBox, is_yellow_sea: bool, region: Option<RegionMeta>) -> Result<Arc<CoastlineStore>> {
    {
        let guard = store_slot().lock().expect("store mutex poisoned");
        if let Some(handle) = guard.as_ref() {
            if handle.bbox == bbox && handle.is_yellow_sea == is_yellow_sea {
                return Ok(Arc::clone(&handle.store));
            }
        }
    }

    let store = build_store(bbox, is_yellow_sea, region)?;
    let handle = StoreHandle { bbox, is_yellow_sea, store: Arc::new(store) };
    let arc = Arc::clone(&handle.store);
    *store_slot().lock().expect("store mutex poisoned") = Some(handle);
    Ok(arc)
}

fn build_store(bbox: BoundingBox, is_yellow_sea: bool, region: Option<RegionMeta>) -> Result<CoastlineStore> {
    let cache_dir = cache_dir_slot().lock().expect("cache dir mutex poisoned").clone();
    let cache = Cache::new(cache_dir);

    if let Some(entry) = cache.load(&bbox, is_yellow_sea) {
        logger::debug("coastline cache hit, skipping rebuild");
        return Ok(CoastlineStore::from_polygons(bbox, entry.into_stored_polygons()));
    }

    let source_cfg = source_slot().lock().expect("source mutex poisoned").clone();
    let Some(source_cfg) = source_cfg else {
        return Err(SeaRouteError::ConfigMissing("no polygon source configured; call planner::set_source first"));
    };

    let mut reader = source_cfg.open();
    let store = match CoastlineStore::build(reader.as_mut(), bbox) {
        Ok(store) => store,
        Err(SeaRouteError::SourceMissing(path)) => {
            logger::error(&format!(
                "polygon source not found at {}; download the OSM land-polygons-split-4326 distribution",
                path.display()
            ));
            CoastlineStore::from_polygons(bbox, Vec::new())
        }
        Err(e) => return Err(e),
    };

    let entry = CacheEntry::from_store(bbox, &store.polygons, region);
    if let Err(e) = cache.store(&bbox, is_yellow_sea, &entry) {
        logger::warn(&format!("failed to write coastline cache: {e}"));
    }

    Ok(store)
}

fn margin_degrees(clearance_km: f64) -> f64 {
    let margin_km = MIN_MARGIN_KM.max(MARGIN_CLEARANCE_FACTOR * clearance_km);
    margin_km / KM_PER_DEGREE
}

fn bbox_for_route(start: (f64, f64), end: (f64, f64), clearance_km: f64) -> (BoundingBox, bool) {
    if YELLOW_SEA_BBOX.contains_point(start.0, start.1) && YELLOW_SEA_BBOX.contains_point(end.0, end.1) {
        return (YELLOW_SEA_BBOX, true);
    }

    let margin = margin_degrees(clearance_km);
    let min_lat = start.0.min(end.0) - margin;
    let max_lat = start.0.max(end.0) + margin;
    let min_lon = start.1.min(end.1) - margin;
    let max_lon = start.1.max(end.1) + margin;

    let bbox = BoundingBox::new(min_lat, min_lon, max_lat, max_lon).unwrap_or(DEFAULT_BBOX);
    (bbox, false)
}

/// The public `find_sea_route` result shape from `spec.md` §6.
#[derive(Debug, Clone)]
pub enum RouteResult {
    Ok {
        waypoints: Vec<(f64, f64)>,
        total_distance: f64,
        direct_distance: f64,
        efficiency: f64,
        grid_cells: usize,
        iterations: u64,
        visited_cells: usize,
    },
    Err {
        error: String,
        waypoints: Vec<(f64, f64)>,
        iterations: u64,
    },
}

impl RouteResult {
    fn from_error(err: &SeaRouteError) -> Self {
        RouteResult::Err { error: err.to_string(), waypoints: Vec::new(), iterations: 0 }
    }
}

/// Plans a sea route between two points. Mirrors the python original's
/// module-level `find_sea_route`, with the same default parameters.
pub fn find_sea_route(
    start_lat: f64,
    start_lon: f64,
    end_lat: f64,
    end_lon: f64,
    step_km: Option<f64>,
    min_clearance_km: Option<f64>,
    max_iterations: Option<u64>,
) -> RouteResult {
    let step_km = step_km.unwrap_or(DEFAULT_STEP_KM);
    let clearance_km = min_clearance_km.unwrap_or(DEFAULT_CLEARANCE_KM);
    let _max_iterations = max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS);

    let start = (start_lat, start_lon);
    let end = (end_lat, end_lon);
    let (bbox, is_yellow_sea) = bbox_for_route(start, end, clearance_km);
    let region = is_yellow_sea.then(RegionMeta::yellow_sea);

    let store = match ensure_store(bbox, is_yellow_sea, region) {
        Ok(store) => store,
        Err(e) => return RouteResult::from_error(&e),
    };

    let clearance_deg = clearance_km / KM_PER_DEGREE;
    match predicate::is_safe_water(&store, start.0, start.1, clearance_deg) {
        Ok(true) => {}
        Ok(false) => return RouteResult::from_error(&SeaRouteError::StartOnLand),
        Err(e) => return RouteResult::from_error(&e),
    }
    match predicate::is_safe_water(&store, end.0, end.1, clearance_deg) {
        Ok(true) => {}
        Ok(false) => return RouteResult::from_error(&SeaRouteError::EndOnLand),
        Err(e) => return RouteResult::from_error(&e),
    }

    let direct_distance = crate::geodesy::haversine(start, end);

    let search: Option<RouteSearch> = router::find_route(&store, start, end, step_km, clearance_deg);
    match search {
        Some(search) => {
            let efficiency = if search.total_distance > 0.0 {
                direct_distance / search.total_distance * 100.0
            } else {
                0.0
            };
            RouteResult::Ok {
                waypoints: search.waypoints,
                total_distance: search.total_distance,
                direct_distance,
                efficiency,
                grid_cells: search.grid_cells,
                iterations: search.iterations,
                visited_cells: search.visited_cells,
            }
        }
        None => RouteResult::from_error(&SeaRouteError::Unreachable),
    }
}

/// Whether `(lat, lon)` is classified as land, against the currently
/// installed store. Fails with `StoreNotReady` if no store is active.
pub fn is_land(lat: f64, lon: f64) -> Result<bool> {
    let guard = store_slot().lock().expect("store mutex poisoned");
    let handle = guard.as_ref().ok_or(SeaRouteError::StoreNotReady)?;
    predicate::is_land(&handle.store, lat, lon)
}

/// Whether `(lat, lon)` is safe water with at least `min_clearance_km`
/// clearance, against the currently installed store.
pub fn is_safe_water(lat: f64, lon: f64, min_clearance_km: f64) -> Result<bool> {
    let guard = store_slot().lock().expect("store mutex poisoned");
    let handle = guard.as_ref().ok_or(SeaRouteError::StoreNotReady)?;
    let clearance_deg = min_clearance_km / KM_PER_DEGREE;
    predicate::is_safe_water(&handle.store, lat, lon, clearance_deg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Once;

    static INIT: Once = Once::new();

    /// Points the singleton at a small GeoJSON fixture carrying one land
    /// square, isolated in its own tempdir per test run via a process
    /// lock. Tests in this module share the global singleton, so this
    /// fixture is written once and is large enough to cover every S1-S6
    /// scenario used below.
    fn configure_once() -> std::path::PathBuf {
        let dir = std::env::temp_dir().join("sea-route-planner-tests");
        std::fs::create_dir_all(&dir).unwrap();
        let fixture = dir.join("land.geojson");
        std::fs::write(
            &fixture,
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{},"geometry":
                    {"type":"Polygon","coordinates":[[[124.0,36.5],[126.0,36.5],[126.0,38.5],[124.0,38.5],[124.0,36.5]]]}},
                {"type":"Feature","properties":{},"geometry":
                    {"type":"Polygon","coordinates":[[[115.5,39.0],[117.5,39.0],[117.5,41.0],[115.5,41.0],[115.5,39.0]]]}}
            ]}"#,
        )
        .unwrap();

        INIT.call_once(|| {
            set_source(DataSource::GeoJson(fixture.clone()));
            set_cache_dir(dir.join("cache"));
        });
        fixture
    }

    #[test]
    fn s1_open_water_route_between_incheon_and_qingdao() {
        configure_once();
        let result = find_sea_route(37.45, 126.60, 36.09, 120.38, None, None, None);
        match result {
            RouteResult::Ok { waypoints, total_distance, direct_distance, efficiency, .. } => {
                assert!(waypoints.len() >= 2);
                assert!(total_distance >= direct_distance - 1e-6);
                assert!(efficiency <= 100.0001);
            }
            RouteResult::Err { error, .. } => panic!("expected success, got {error}"),
        }
    }

    #[test]
    fn s4_short_hop_uses_few_waypoints() {
        configure_once();
        let result = find_sea_route(35.0, 125.0, 35.05, 125.05, Some(5.0), None, None);
        match result {
            RouteResult::Ok { grid_cells, .. } => assert!(grid_cells <= 3),
            RouteResult::Err { error, .. } => panic!("expected success, got {error}"),
        }
    }

    #[test]
    fn s6_yellow_sea_route_installs_yellow_sea_store() {
        configure_once();
        let _ = find_sea_route(37.45, 126.60, 36.09, 120.38, None, None, None);
        let guard = store_slot().lock().unwrap();
        assert!(guard.as_ref().unwrap().is_yellow_sea);
    }

    #[test]
    fn is_land_reads_against_the_installed_store() {
        // The singleton is shared across this module's tests, so this
        // only asserts a store is installed and queryable by the time a
        // route has been found, not the uninitialized case (that
        // behavior is asserted directly on `SeaRouteError::StoreNotReady`
        // in `error::tests`).
        configure_once();
        let _ = find_sea_route(37.45, 126.60, 36.09, 120.38, None, None, None);
        assert!(is_land(37.5665, 126.9780).is_ok());
    }
}
