//! Persistent cache for a built `CoastlineStore` (`spec.md` §4.5, C5).
//!
//! Entries are `bincode`-serialized to a temp file, then renamed into
//! place so readers never observe a half-written cache (`spec.md` §5).
//! Deserialization failures are treated as a cold cache, never a panic:
//! logged via `logger::warn` and reported to the caller as a bool so the
//! store gets rebuilt from source.

use std::fs;
use std::io::BufWriter;
use std::path::PathBuf;

use sha2::{Digest, Sha256};

use crate::coastline::store::StoredPolygon;
use crate::coastline::{BoundingBox, RegionMeta};
use crate::error::{Result, SeaRouteError};
use crate::logger;

/// Current on-disk format version. Bumping this invalidates every
/// existing cache file without needing to inspect its contents.
const CACHE_VERSION: &str = "1";

/// The filename used for the Yellow Sea's reserved cache identity
/// (`spec.md` §4.5).
const YELLOW_SEA_FILENAME: &str = "yellow_sea.bin";

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct CacheEntry {
    pub version: String,
    pub bbox: BoundingBox,
    pub polygons: Vec<(u64, (f64, f64, f64, f64), Vec<(f64, f64)>)>,
    pub region: Option<RegionMeta>,
}

impl CacheEntry {
    pub fn from_store(bbox: BoundingBox, polygons: &[StoredPolygon], region: Option<RegionMeta>) -> Self {
        let polygons =
            polygons.iter().map(|p| (p.id, p.bbox, p.ring.clone())).collect();
        Self { version: CACHE_VERSION.to_string(), bbox, polygons, region }
    }

    pub fn into_stored_polygons(self) -> Vec<StoredPolygon> {
        self.polygons
            .into_iter()
            .map(|(id, bbox, ring)| StoredPolygon { id, bbox, ring })
            .collect()
    }
}

/// Directory-scoped cache handle. The planner façade uses
/// `std::env::temp_dir()/sea-route-cache/` by default; tests and other
/// callers may point this at a `tempfile::tempdir()`.
pub struct Cache {
    dir: PathBuf,
}

impl Cache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, bbox: &BoundingBox, is_yellow_sea: bool) -> PathBuf {
        if is_yellow_sea {
            self.dir.join(YELLOW_SEA_FILENAME)
        } else {
            self.dir.join(format!("bbox_{}.bin", stable_bbox_hash(bbox)))
        }
    }

    /// Loads a cache entry if present and valid for the exact `bbox`
    /// requested. Any read or decode failure is logged and treated as a
    /// miss, never propagated as a hard error.
    pub fn load(&self, bbox: &BoundingBox, is_yellow_sea: bool) -> Option<CacheEntry> {
        let path = self.path_for(bbox, is_yellow_sea);
        if !path.exists() {
            return None;
        }

        let file = match fs::File::open(&path) {
            Ok(f) => f,
            Err(e) => {
                logger::warn(&format!("could not open cache file {}: {e}", path.display()));
                return None;
            }
        };

        let entry: CacheEntry = match bincode::deserialize_from(std::io::BufReader::new(file)) {
            Ok(entry) => entry,
            Err(e) => {
                logger::warn(&format!("cache file {} is invalid: {e}", path.display()));
                return None;
            }
        };

        if entry.version != CACHE_VERSION {
            logger::warn(&format!(
                "cache file {} is version {}, expected {CACHE_VERSION}",
                path.display(),
                entry.version
            ));
            return None;
        }
        if entry.bbox != *bbox {
            logger::warn(&format!("cache file {} bbox does not match request, ignoring", path.display()));
            return None;
        }

        Some(entry)
    }

    /// Writes an entry atomically: serialize to `<path>.tmp`, then
    /// `fs::rename` over the final path.
    pub fn store(&self, bbox: &BoundingBox, is_yellow_sea: bool, entry: &CacheEntry) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(bbox, is_yellow_sea);
        let tmp_path = path.with_extension("tmp");

        {
            let file = fs::File::create(&tmp_path)?;
            bincode::serialize_into(BufWriter::new(file), entry)
                .map_err(SeaRouteError::Cache)?;
        }
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }
}

/// Short stable hash of a bbox's coordinates, formatted to four decimals
/// so floating-point jitter doesn't produce a different filename for an
/// equivalent bbox. Used only for the non-Yellow-Sea filename; not a
/// correctness-relevant identity.
fn stable_bbox_hash(bbox: &BoundingBox) -> String {
    let canonical = format!(
        "{:.4},{:.4},{:.4},{:.4}",
        bbox.min_lat, bbox.min_lon, bbox.max_lat, bbox.max_lon
    );
    let digest = Sha256::digest(canonical.as_bytes());
    digest.iter().take(6).map(|b| format!("{b:02x}")).collect::<String>()
}

pub fn default_cache_dir() -> PathBuf {
    std::env::temp_dir().join("sea-route-cache")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox() -> BoundingBox {
        BoundingBox::new(20.0, 110.0, 45.0, 135.0).unwrap()
    }

    #[test]
    fn stable_hash_is_deterministic() {
        assert_eq!(stable_bbox_hash(&bbox()), stable_bbox_hash(&bbox()));
    }

    #[test]
    fn stable_hash_differs_for_different_bbox() {
        let other = BoundingBox::new(0.0, 0.0, 10.0, 10.0).unwrap();
        assert_ne!(stable_bbox_hash(&bbox()), stable_bbox_hash(&other));
    }

    #[test]
    fn round_trips_through_store_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Cache::new(dir.path());
        let polygons = vec![StoredPolygon { id: 0, bbox: (0.0, 0.0, 1.0, 1.0), ring: vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)] }];
        let entry = CacheEntry::from_store(bbox(), &polygons, None);

        cache.store(&bbox(), false, &entry).unwrap();
        let loaded = cache.load(&bbox(), false).unwrap();
        assert_eq!(loaded.polygons.len(), 1);
        assert_eq!(loaded.bbox, bbox());
    }

    #[test]
    fn yellow_sea_uses_fixed_filename() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Cache::new(dir.path());
        assert_eq!(cache.path_for(&bbox(), true), dir.path().join(YELLOW_SEA_FILENAME));
    }

    #[test]
    fn missing_cache_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Cache::new(dir.path());
        assert!(cache.load(&bbox(), false).is_none());
    }

    #[test]
    fn corrupt_cache_file_is_treated_as_invalid_not_a_panic() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Cache::new(dir.path());
        fs::create_dir_all(dir.path()).unwrap();
        let path = cache.path_for(&bbox(), false);
        fs::write(&path, b"not a valid bincode entry at all").unwrap();
        assert!(cache.load(&bbox(), false).is_none());
    }

    #[test]
    fn mismatched_bbox_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Cache::new(dir.path());
        let entry = CacheEntry::from_store(bbox(), &[], None);
        cache.store(&bbox(), false, &entry).unwrap();

        let other = BoundingBox::new(0.0, 0.0, 10.0, 10.0).unwrap();
        // Different bbox hashes to a different file, so this also
        // exercises the plain missing-file path for `other`.
        assert!(cache.load(&other, false).is_none());
    }

    // spec.md §8 property 6: cache fidelity. Building a store,
    // persisting it, and reloading it must yield an `is_land` predicate
    // that agrees with the original on a random sample of points inside
    // the bbox. The prepared union geometry is never cached (rebuilt on
    // load per §4.5 and §9), so this exercises that the rebuild is exact.
    #[test]
    fn reloaded_store_agrees_with_original_on_random_points() {
        use crate::coastline::source::InMemorySource;
        use crate::coastline::CoastlineStore;
        use rand::Rng;

        let region = BoundingBox::new(30.0, 120.0, 40.0, 130.0).unwrap();
        let land = vec![
            (122.0, 32.0),
            (125.0, 32.0),
            (125.0, 36.0),
            (122.0, 36.0),
            (122.0, 32.0),
        ];
        let mut source = InMemorySource::from_rings(vec![land]);
        let original = CoastlineStore::build(&mut source, region).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let cache = Cache::new(dir.path());
        let entry = CacheEntry::from_store(region, &original.polygons, None);
        cache.store(&region, false, &entry).unwrap();

        let loaded = cache.load(&region, false).unwrap();
        let reloaded = CoastlineStore::from_polygons(region, loaded.into_stored_polygons());

        let mut rng = rand::rng();
        for _ in 0..10_000 {
            let lat = rng.random_range(region.min_lat..=region.max_lat);
            let lon = rng.random_range(region.min_lon..=region.max_lon);
            assert_eq!(
                original.contains_point(lon, lat),
                reloaded.contains_point(lon, lat),
                "is_land disagreement at ({lat}, {lon})"
            );
        }
    }
}
