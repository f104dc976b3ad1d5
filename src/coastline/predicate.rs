//! Land/water classification against a built `CoastlineStore`
//! (`spec.md` §4.4, C4).

use geo::{EuclideanDistance, Point};

use crate::coastline::CoastlineStore;
use crate::error::{Result, SeaRouteError};

/// 1-degree search radius for gathering distance candidates, per
/// `spec.md` §4.4.
const CANDIDATE_RADIUS_DEG: f64 = 1.0;

/// Whether `(lat, lon)` is classified as land. Fails with `StoreNotReady`
/// if `store` was built with zero polygons (`spec.md` §4.4, §7), since
/// there is no unified geometry to query against in that case.
pub fn is_land(store: &CoastlineStore, lat: f64, lon: f64) -> Result<bool> {
    if !store.has_geometry() {
        return Err(SeaRouteError::StoreNotReady);
    }
    Ok(store.contains_point(lon, lat))
}

/// Approximate distance in degrees from `(lat, lon)` to the nearest
/// candidate land polygon's boundary, using plain Cartesian (planar)
/// distance over `(lon, lat)`, not a geodesic distance (`spec.md` §4.4, §9).
///
/// Measures distance to the polygon itself (edges included) rather than
/// to the nearest ring vertex: vertex distance over-reports the true
/// clearance for a point sitting off the middle of a long edge.
///
/// Returns `None` when no candidate polygon falls within the 1-degree
/// search radius; callers treat that as "far from land".
pub fn distance_to_land(store: &CoastlineStore, lat: f64, lon: f64) -> Option<f64> {
    let minx = lon - CANDIDATE_RADIUS_DEG;
    let maxx = lon + CANDIDATE_RADIUS_DEG;
    let miny = lat - CANDIDATE_RADIUS_DEG;
    let maxy = lat + CANDIDATE_RADIUS_DEG;

    let candidate_ids = store.candidates_within(minx, miny, maxx, maxy);
    if candidate_ids.is_empty() {
        return None;
    }

    let point = Point::new(lon, lat);
    let mut nearest: Option<f64> = None;
    for id in candidate_ids {
        let Some(polygon) = store.polygons.get(id as usize) else { continue };
        let dist = point.euclidean_distance(&polygon.to_geo_polygon());
        nearest = Some(nearest.map_or(dist, |n: f64| n.min(dist)));
    }
    nearest
}

/// Whether `(lat, lon)` is in water and at least `clearance_deg` away
/// (in the same degrees-as-Cartesian units as `distance_to_land`) from
/// the nearest candidate land polygon (`spec.md` §4.4). Propagates
/// `StoreNotReady` exactly as `is_land` does.
pub fn is_safe_water(store: &CoastlineStore, lat: f64, lon: f64, clearance_deg: f64) -> Result<bool> {
    if is_land(store, lat, lon)? {
        return Ok(false);
    }
    Ok(match distance_to_land(store, lat, lon) {
        Some(dist) => dist >= clearance_deg,
        None => true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coastline::source::InMemorySource;
    use crate::coastline::BoundingBox;

    fn square(minx: f64, miny: f64, maxx: f64, maxy: f64) -> Vec<(f64, f64)> {
        vec![(minx, miny), (maxx, miny), (maxx, maxy), (minx, maxy), (minx, miny)]
    }

    fn build_store() -> CoastlineStore {
        let mut source = InMemorySource::from_rings(vec![square(0.0, 0.0, 2.0, 2.0)]);
        let bbox = BoundingBox::new(-20.0, -20.0, 20.0, 20.0).unwrap();
        CoastlineStore::build(&mut source, bbox).unwrap()
    }

    #[test]
    fn point_inside_polygon_is_land() {
        let store = build_store();
        assert!(is_land(&store, 1.0, 1.0).unwrap());
    }

    #[test]
    fn point_far_from_polygon_is_not_land() {
        let store = build_store();
        assert!(!is_land(&store, 10.0, 10.0).unwrap());
    }

    #[test]
    fn distance_to_land_is_none_far_away() {
        let store = build_store();
        assert!(distance_to_land(&store, 10.0, 10.0).is_none());
    }

    #[test]
    fn distance_to_land_is_zero_at_vertex() {
        let store = build_store();
        let dist = distance_to_land(&store, 0.0, 0.0).unwrap();
        assert!(dist < 1e-9);
    }

    #[test]
    fn distance_to_land_measures_to_the_nearest_edge_point_not_the_nearest_vertex() {
        // A long, thin land strip: vertices only at its four corners, so a
        // point sitting just off the middle of the bottom edge is close to
        // the edge itself but far from either corner vertex.
        let ring = vec![(0.0, 0.0), (10.0, 0.0), (10.0, 1.0), (0.0, 1.0), (0.0, 0.0)];
        let mut source = InMemorySource::from_rings(vec![ring]);
        let bbox = BoundingBox::new(-20.0, -20.0, 20.0, 20.0).unwrap();
        let store = CoastlineStore::build(&mut source, bbox).unwrap();

        let dist = distance_to_land(&store, -0.001, 5.0).unwrap();
        assert!(dist < 0.01, "expected edge-hugging distance, got {dist}");
    }

    #[test]
    fn safe_water_requires_both_not_land_and_clearance() {
        let store = build_store();
        assert!(!is_safe_water(&store, 1.0, 1.0, 0.1).unwrap());
        assert!(!is_safe_water(&store, 2.05, 2.05, 1.0).unwrap());
        assert!(is_safe_water(&store, 10.0, 10.0, 0.5).unwrap());
    }

    #[test]
    fn empty_store_fails_with_store_not_ready() {
        let mut source = InMemorySource::new(vec![]);
        let bbox = BoundingBox::new(-10.0, -10.0, 10.0, 10.0).unwrap();
        let store = CoastlineStore::build(&mut source, bbox).unwrap();
        assert!(matches!(is_land(&store, 0.0, 0.0), Err(SeaRouteError::StoreNotReady)));
        assert!(matches!(is_safe_water(&store, 0.0, 0.0, 1.0), Err(SeaRouteError::StoreNotReady)));
    }

    use proptest::prelude::*;

    proptest! {
        // spec.md §8 property 2: safe-water monotonicity.
        #[test]
        fn safe_water_is_monotone_in_clearance(
            lat in -15.0f64..15.0,
            lon in -15.0f64..15.0,
            c1 in 0.0f64..5.0,
            slack in 0.0f64..5.0,
        ) {
            let store = build_store();
            let c2 = (c1 - slack).max(0.0);
            if is_safe_water(&store, lat, lon, c1).unwrap() {
                prop_assert!(is_safe_water(&store, lat, lon, c2).unwrap());
            }
        }

        // spec.md §8 property 3: land excludes safe water at any clearance.
        #[test]
        fn land_excludes_safe_water(
            lat in -15.0f64..15.0,
            lon in -15.0f64..15.0,
            clearance in 0.0f64..10.0,
        ) {
            let store = build_store();
            if is_land(&store, lat, lon).unwrap() {
                prop_assert!(!is_safe_water(&store, lat, lon, clearance).unwrap());
            }
        }
    }
}
