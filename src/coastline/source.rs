//! Polygon sources: anything that yields the three fields `spec.md` §6
//! requires, namely a shape-type tag, an axis-aligned bbox in `(lon, lat)`
//! order, and an ordered ring of `(lon, lat)` vertices.
//!
//! Two concrete readers are provided: `ShapefileSource` for the canonical
//! OSM "land-polygons-split-4326" distribution, and `GeoJsonSource` for
//! hand-authored fixtures. `InMemorySource` exists for tests and for
//! synthetic regions that don't come from a file at all.

use std::path::{Path, PathBuf};

use crate::error::{Result, SeaRouteError};

/// ESRI shapefile shape-type tag for a polygon, per `spec.md` §6.
pub const SHAPE_TYPE_POLYGON: u8 = 5;

/// A single candidate record read from a polygon source, before validity
/// filtering happens in `coastline::store`.
#[derive(Debug, Clone)]
pub struct RawRecord {
    pub shape_type: u8,
    /// `(minx, miny, maxx, maxy)` in `(lon, lat)` order.
    pub bbox: (f64, f64, f64, f64),
    /// Ordered `(lon, lat)` vertices of the outer ring.
    pub ring: Vec<(f64, f64)>,
}

/// Anything that can yield polygon records, per `spec.md` §6.
pub trait PolygonSource {
    fn read_records(&mut self) -> Result<Vec<RawRecord>>;
}

fn ring_bbox(ring: &[(f64, f64)]) -> (f64, f64, f64, f64) {
    let mut minx = f64::MAX;
    let mut miny = f64::MAX;
    let mut maxx = f64::MIN;
    let mut maxy = f64::MIN;
    for &(x, y) in ring {
        minx = minx.min(x);
        miny = miny.min(y);
        maxx = maxx.max(x);
        maxy = maxy.max(y);
    }
    (minx, miny, maxx, maxy)
}

/// Reads the OSM "land-polygons-split-4326" shapefile distribution (or any
/// other `.shp` carrying simple polygon shapes).
pub struct ShapefileSource {
    path: PathBuf,
}

impl ShapefileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }
}

impl PolygonSource for ShapefileSource {
    fn read_records(&mut self) -> Result<Vec<RawRecord>> {
        if !self.path.exists() {
            return Err(SeaRouteError::SourceMissing(self.path.clone()));
        }

        let mut reader = shapefile::Reader::from_path(&self.path)
            .map_err(|e| SeaRouteError::Shapefile(e.to_string()))?;

        let mut records = Vec::new();
        for shape_result in reader.iter_shapes() {
            let shape = shape_result.map_err(|e| SeaRouteError::Shapefile(e.to_string()))?;
            if let shapefile::Shape::Polygon(polygon) = shape {
                for ring in polygon.rings() {
                    if let shapefile::PolygonRing::Outer(points) = ring {
                        let ring: Vec<(f64, f64)> = points.iter().map(|p| (p.x, p.y)).collect();
                        if ring.len() < 3 {
                            continue;
                        }
                        let bbox = ring_bbox(&ring);
                        records.push(RawRecord { shape_type: SHAPE_TYPE_POLYGON, bbox, ring });
                    }
                }
            }
        }

        Ok(records)
    }
}

/// Reads land polygons from a GeoJSON `FeatureCollection`, `Feature`, or
/// bare `Geometry` of `Polygon`/`MultiPolygon` features. Interior rings
/// (holes) are not carried through, since `spec.md`'s polygon model is a
/// simple closed ring, matching the OSM land-polygon source which has no
/// holes of its own.
pub struct GeoJsonSource {
    path: PathBuf,
}

impl GeoJsonSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }
}

impl PolygonSource for GeoJsonSource {
    fn read_records(&mut self) -> Result<Vec<RawRecord>> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SeaRouteError::SourceMissing(self.path.clone())
            } else {
                SeaRouteError::Io(e)
            }
        })?;

        let geojson: geojson::GeoJson = content
            .parse()
            .map_err(|e: geojson::Error| SeaRouteError::GeojsonParse(e.to_string()))?;

        let mut records = Vec::new();
        collect_geometries(&geojson, &mut records);
        Ok(records)
    }
}

fn collect_geometries(geojson: &geojson::GeoJson, out: &mut Vec<RawRecord>) {
    match geojson {
        geojson::GeoJson::Geometry(geom) => push_geometry(geom, out),
        geojson::GeoJson::Feature(feature) => {
            if let Some(geom) = &feature.geometry {
                push_geometry(geom, out);
            }
        }
        geojson::GeoJson::FeatureCollection(collection) => {
            for feature in &collection.features {
                if let Some(geom) = &feature.geometry {
                    push_geometry(geom, out);
                }
            }
        }
    }
}

fn push_geometry(geom: &geojson::Geometry, out: &mut Vec<RawRecord>) {
    match &geom.value {
        geojson::Value::Polygon(rings) => {
            if let Some(exterior) = rings.first() {
                push_ring(exterior, out);
            }
        }
        geojson::Value::MultiPolygon(polygons) => {
            for rings in polygons {
                if let Some(exterior) = rings.first() {
                    push_ring(exterior, out);
                }
            }
        }
        _ => {}
    }
}

fn push_ring(raw_ring: &[Vec<f64>], out: &mut Vec<RawRecord>) {
    let ring: Vec<(f64, f64)> = raw_ring.iter().filter_map(|c| Some((*c.first()?, *c.get(1)?))).collect();
    if ring.len() < 3 {
        return;
    }
    let bbox = ring_bbox(&ring);
    out.push(RawRecord { shape_type: SHAPE_TYPE_POLYGON, bbox, ring });
}

/// An in-memory polygon source, for tests and synthetic regions.
pub struct InMemorySource {
    records: Vec<RawRecord>,
}

impl InMemorySource {
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self { records }
    }

    /// Builds a source from plain `(lon, lat)` rings, computing each
    /// record's bbox automatically.
    pub fn from_rings(rings: Vec<Vec<(f64, f64)>>) -> Self {
        let records = rings
            .into_iter()
            .filter(|r| r.len() >= 3)
            .map(|ring| {
                let bbox = ring_bbox(&ring);
                RawRecord { shape_type: SHAPE_TYPE_POLYGON, bbox, ring }
            })
            .collect();
        Self { records }
    }
}

impl PolygonSource for InMemorySource {
    fn read_records(&mut self) -> Result<Vec<RawRecord>> {
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_source_computes_bbox() {
        let mut source = InMemorySource::from_rings(vec![vec![
            (0.0, 0.0),
            (2.0, 0.0),
            (2.0, 1.0),
            (0.0, 1.0),
            (0.0, 0.0),
        ]]);
        let records = source.read_records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].bbox, (0.0, 0.0, 2.0, 1.0));
        assert_eq!(records[0].shape_type, SHAPE_TYPE_POLYGON);
    }

    #[test]
    fn in_memory_source_drops_degenerate_rings() {
        let mut source = InMemorySource::from_rings(vec![vec![(0.0, 0.0), (1.0, 1.0)]]);
        let records = source.read_records().unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn shapefile_source_reports_missing_file() {
        let mut source = ShapefileSource::new("/nonexistent/path/land.shp");
        let err = source.read_records().unwrap_err();
        assert!(matches!(err, SeaRouteError::SourceMissing(_)));
    }

    #[test]
    fn geojson_source_parses_feature_collection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("land.geojson");
        std::fs::write(
            &path,
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{},"geometry":
                    {"type":"Polygon","coordinates":[[[0,0],[2,0],[2,1],[0,1],[0,0]]]}}
            ]}"#,
        )
        .unwrap();

        let mut source = GeoJsonSource::new(&path);
        let records = source.read_records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].ring.len(), 5);
    }

    #[test]
    fn geojson_source_reports_missing_file() {
        let mut source = GeoJsonSource::new("/nonexistent/path/land.geojson");
        let err = source.read_records().unwrap_err();
        assert!(matches!(err, SeaRouteError::SourceMissing(_)));
    }
}
