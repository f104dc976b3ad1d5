//! Coastline geometry: polygon ingestion, spatial indexing, land/water
//! classification, and the persistent cache that backs them (`spec.md`
//! §3, §4.3–§4.5).

pub mod cache;
pub mod predicate;
pub mod source;
pub mod store;

pub use store::CoastlineStore;

/// An axis-aligned bounding box, ordered `(min_lat, min_lon, max_lat, max_lon)`.
///
/// No anti-meridian crossing is supported (`spec.md` §3, §9 Open Questions).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn new(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> crate::error::Result<Self> {
        if min_lat > max_lat || min_lon > max_lon {
            return Err(crate::error::SeaRouteError::InvalidBbox(format!(
                "min must not exceed max: ({min_lat}, {min_lon}, {max_lat}, {max_lon})"
            )));
        }
        Ok(Self { min_lat, min_lon, max_lat, max_lon })
    }

    /// Whether `(lat, lon)` falls within this bbox, inclusive of edges.
    pub fn contains_point(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }

    /// Whether this bbox intersects an axis-aligned `(minx, miny, maxx, maxy)`
    /// bbox given in `(lon, lat)` order, as used by `PolygonSource` records.
    pub fn intersects_lon_lat(&self, minx: f64, miny: f64, maxx: f64, maxy: f64) -> bool {
        minx <= self.max_lon && maxx >= self.min_lon && miny <= self.max_lat && maxy >= self.min_lat
    }
}

/// The fixed Yellow Sea region bounding box, with a reserved cache identity.
pub const YELLOW_SEA_BBOX: BoundingBox = BoundingBox {
    min_lat: 19.40,
    min_lon: 106.90,
    max_lat: 41.68,
    max_lon: 129.00,
};

/// Default region bbox used when neither a custom bbox nor the Yellow Sea
/// identity is requested (`spec.md` §4.3).
pub const DEFAULT_BBOX: BoundingBox = BoundingBox {
    min_lat: 20.0,
    min_lon: 110.0,
    max_lat: 45.0,
    max_lon: 135.0,
};

/// Informational metadata attached to the Yellow Sea cache identity
/// (`spec.md` §4.5, §6). Never consulted for correctness.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RegionMeta {
    pub name: String,
    pub description: String,
    pub major_routes: Vec<String>,
}

impl RegionMeta {
    pub fn yellow_sea() -> Self {
        Self {
            name: "Yellow Sea Maritime Routes".to_string(),
            description: "Major shipping corridors between China's eastern coast and Korea's western coast".to_string(),
            major_routes: vec![
                "Hong Kong - Incheon".to_string(),
                "Incheon - Qingdao".to_string(),
                "Incheon - Shanghai".to_string(),
                "Pyeongtaek - Lianyungang".to_string(),
                "Mokpo - Shanghai".to_string(),
                "Busan - Qingdao".to_string(),
            ],
        }
    }
}
