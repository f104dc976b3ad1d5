//! Coastline store: ingests polygon records from a `PolygonSource`,
//! filters to a bounding box, builds an `rstar` spatial index over their
//! envelopes, and collects the accepted polygons into a prepared
//! `geo::MultiPolygon` for fast containment tests (`spec.md` §4.3, C3).

use geo::{Contains, MultiPolygon, Polygon};
use rstar::{RTree, RTreeObject, AABB};

use crate::coastline::source::{PolygonSource, RawRecord};
use crate::coastline::BoundingBox;
use crate::error::Result;
use crate::logger;

/// One accepted polygon, keyed by its position in ingestion order
/// (`spec.md` §4.3 step 2, "ids assigned in iteration order").
#[derive(Debug, Clone)]
pub struct StoredPolygon {
    pub id: u64,
    pub bbox: (f64, f64, f64, f64),
    pub ring: Vec<(f64, f64)>,
}

impl StoredPolygon {
    pub(crate) fn to_geo_polygon(&self) -> Polygon<f64> {
        let coords: Vec<geo::Coord<f64>> =
            self.ring.iter().map(|&(x, y)| geo::coord! { x: x, y: y }).collect();
        Polygon::new(geo::LineString::new(coords), vec![])
    }
}

/// Wraps a `StoredPolygon`'s envelope so it can live in an `RTree`
/// without cloning the ring on every query.
#[derive(Debug, Clone)]
pub struct PolygonEnvelope {
    pub id: u64,
    bbox: (f64, f64, f64, f64),
}

impl RTreeObject for PolygonEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([self.bbox.0, self.bbox.1], [self.bbox.2, self.bbox.3])
    }
}

/// Coastline geometry for one bounding region: a spatial index over
/// candidate polygon envelopes plus one unified prepared geometry for
/// point-in-polygon tests (`spec.md` §3, §4.3).
pub struct CoastlineStore {
    pub bbox: BoundingBox,
    pub polygons: Vec<StoredPolygon>,
    index: RTree<PolygonEnvelope>,
    prepared: MultiPolygon<f64>,
}

impl CoastlineStore {
    /// Builds a store from a polygon source, filtering records to those
    /// whose bbox intersects `bbox` (`spec.md` §4.3 steps 1-3).
    pub fn build(source: &mut dyn PolygonSource, bbox: BoundingBox) -> Result<Self> {
        let records = source.read_records()?;
        logger::debug(&format!("{} raw polygon records read", records.len()));

        let progress = if logger::is_quiet() {
            None
        } else {
            let pb = indicatif::ProgressBar::new(records.len() as u64);
            pb.set_style(
                indicatif::ProgressStyle::with_template(
                    "{spinner:.green} filtering polygons [{bar:40.cyan/blue}] {pos}/{len}",
                )
                .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar()),
            );
            Some(pb)
        };

        let mut polygons = Vec::new();
        for (i, record) in records.into_iter().enumerate() {
            if let Some(pb) = &progress {
                pb.set_position(i as u64 + 1);
            }
            if accept_record(&record, &bbox) {
                polygons.push(StoredPolygon { id: polygons.len() as u64, bbox: record.bbox, ring: record.ring });
            }
        }
        if let Some(pb) = &progress {
            pb.finish_and_clear();
        }

        logger::debug(&format!("{} polygons accepted within bbox", polygons.len()));
        Ok(Self::from_polygons(bbox, polygons))
    }

    /// Rebuilds a store directly from already-filtered polygons, e.g. when
    /// restoring from a cache entry (`spec.md` §4.5).
    pub fn from_polygons(bbox: BoundingBox, polygons: Vec<StoredPolygon>) -> Self {
        let index = RTree::bulk_load(
            polygons.iter().map(|p| PolygonEnvelope { id: p.id, bbox: p.bbox }).collect(),
        );
        let prepared = build_prepared(&polygons);
        Self { bbox, polygons, index, prepared }
    }

    /// Candidate polygon ids whose envelope intersects the query bbox,
    /// per `spec.md` §4.4's "gather candidates near the point" step.
    pub fn candidates_within(&self, minx: f64, miny: f64, maxx: f64, maxy: f64) -> Vec<u64> {
        let envelope = AABB::from_corners([minx, miny], [maxx, maxy]);
        self.index.locate_in_envelope_intersecting(&envelope).map(|e| e.id).collect()
    }

    /// Whether `(lon, lat)` falls inside the unified land geometry.
    pub fn contains_point(&self, lon: f64, lat: f64) -> bool {
        self.prepared.contains(&geo::Point::new(lon, lat))
    }

    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    /// Whether this store has any unified geometry to query against. False
    /// when zero polygons were accepted during build (`spec.md` §4.3 step
    /// 4), in which case `is_land` must fail with `StoreNotReady` rather
    /// than silently reporting every point as water.
    pub fn has_geometry(&self) -> bool {
        !self.polygons.is_empty()
    }
}

fn accept_record(record: &RawRecord, bbox: &BoundingBox) -> bool {
    if record.ring.len() < 3 {
        return false;
    }
    if record.ring.iter().any(|&(x, y)| !x.is_finite() || !y.is_finite()) {
        return false;
    }
    let (minx, miny, maxx, maxy) = record.bbox;
    bbox.intersects_lon_lat(minx, miny, maxx, maxy)
}

/// Collects the accepted polygons into a single `MultiPolygon`, used
/// only as the containment oracle for `is_land`/`contains_point`. A
/// `MultiPolygon::contains` query is true iff the point lies in any
/// member polygon, so this plain collection gives the same answer as a
/// true unary union without paying the O(n^2) cost of folding
/// `BooleanOps::union` pairwise across the whole polygon set.
fn build_prepared(polygons: &[StoredPolygon]) -> MultiPolygon<f64> {
    MultiPolygon::new(polygons.iter().map(StoredPolygon::to_geo_polygon).collect())
}
