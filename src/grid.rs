//! Bijection between geographic coordinates and an integer grid used by the
//! wave-propagation router (`router`).
//!
//! Cell size is fixed in kilometers but converted to degrees via a constant
//! `111.0` km/degree factor rather than a per-latitude cosine correction.
//! This is intentional (`spec.md` §4.2) so that the grid stays rectangular
//! in integer index space and two runs with identical inputs produce
//! identical cells regardless of latitude.

/// Kilometers per degree of latitude, used uniformly for both axes.
///
/// Exposed so other modules (notably `planner`, deriving a custom bbox
/// margin in degrees from a margin in kilometers) use the exact same
/// constant rather than risk a second, slightly different one.
pub const KM_PER_DEGREE: f64 = 111.0;

/// An integer grid cell index, `(gi, gj)` for `(lat, lon)`.
pub type Cell = (i64, i64);

fn cell_size_degrees(cell_km: f64) -> f64 {
    cell_km / KM_PER_DEGREE
}

/// Quantizes a coordinate to its containing grid cell.
pub fn quantize(lat: f64, lon: f64, cell_km: f64) -> Cell {
    let delta = cell_size_degrees(cell_km);
    ((lat / delta).round() as i64, (lon / delta).round() as i64)
}

/// Returns the coordinate at the center of a grid cell.
pub fn dequantize(cell: Cell, cell_km: f64) -> (f64, f64) {
    let delta = cell_size_degrees(cell_km);
    (cell.0 as f64 * delta, cell.1 as f64 * delta)
}

/// Returns the up-to-8 neighbors of `cell`, in a fixed enumeration order
/// (N, S, E, W, NE, NW, SE, SW per `spec.md` §5) so that identical inputs
/// always yield a bit-identical search order.
pub fn neighbors(cell: Cell, diagonal: bool) -> Vec<Cell> {
    let (gi, gj) = cell;
    let mut out = vec![
        (gi + 1, gj), // N
        (gi - 1, gj), // S
        (gi, gj + 1), // E
        (gi, gj - 1), // W
    ];

    if diagonal {
        out.extend_from_slice(&[
            (gi + 1, gj + 1), // NE
            (gi + 1, gj - 1), // NW
            (gi - 1, gj + 1), // SE
            (gi - 1, gj - 1), // SW
        ]);
    }

    out
}
