//! Wave-propagation router: 8-connected breadth-first search over the
//! quantized grid, rooted at the destination (`spec.md` §4.6, C6).

use std::collections::{HashMap, VecDeque};

use crate::coastline::predicate::is_safe_water;
use crate::coastline::CoastlineStore;
use crate::geodesy::haversine;
use crate::grid::{self, Cell};

/// Hard ceiling on BFS dequeues, per `spec.md` §4.6. Distinct from the
/// planner façade's own (currently unused) `max_iterations` parameter.
pub const MAX_ITERATIONS: u64 = 1_000_000;

/// A completed route search, per `spec.md` §4.6's "returned record".
#[derive(Debug, Clone)]
pub struct RouteSearch {
    /// Ordered coordinates from start to end, inclusive.
    pub waypoints: Vec<(f64, f64)>,
    /// Sum of consecutive haversine distances along `waypoints`, in km.
    pub total_distance: f64,
    /// Number of grid cells in the path (== `waypoints.len()`).
    pub grid_cells: usize,
    /// Number of BFS dequeues performed before the start cell was found.
    pub iterations: u64,
    /// Size of the BFS visited set at completion.
    pub visited_cells: usize,
}

/// Searches for a route from `start` to `end` on the 8-connected grid
/// quantized at `cell_km`, using `is_safe_water(_, _, clearance_deg)` as
/// the passability predicate (`clearance_deg` is in the same degrees
/// unit as `coastline::predicate::distance_to_land`, not kilometers).
/// Returns `None` when the frontier empties (or the iteration cap is
/// hit) before the start cell is reached.
pub fn find_route(
    store: &CoastlineStore,
    start: (f64, f64),
    end: (f64, f64),
    cell_km: f64,
    clearance_deg: f64,
) -> Option<RouteSearch> {
    let start_cell = grid::quantize(start.0, start.1, cell_km);
    let end_cell = grid::quantize(end.0, end.1, cell_km);

    let mut queue: VecDeque<Cell> = VecDeque::new();
    let mut visited: HashMap<Cell, ()> = HashMap::new();
    let mut parent: HashMap<Cell, Cell> = HashMap::new();
    let mut distance: HashMap<Cell, u64> = HashMap::new();

    queue.push_back(end_cell);
    visited.insert(end_cell, ());
    distance.insert(end_cell, 0);

    let mut iterations: u64 = 0;

    while let Some(cell) = queue.pop_front() {
        iterations += 1;
        if iterations > MAX_ITERATIONS {
            return None;
        }

        if cell == start_cell {
            return Some(build_result(cell_km, start_cell, end_cell, &parent, iterations, visited.len()));
        }

        let current_distance = *distance.get(&cell).unwrap_or(&0);
        for neighbor in grid::neighbors(cell, true) {
            if visited.contains_key(&neighbor) {
                continue;
            }
            let (nlat, nlon) = grid::dequantize(neighbor, cell_km);
            // `store` is guaranteed ready by the time a search starts (the
            // planner façade validates both endpoints via `is_safe_water`
            // first), so a `StoreNotReady` here can only mean "not safe".
            if is_safe_water(store, nlat, nlon, clearance_deg).unwrap_or(false) {
                visited.insert(neighbor, ());
                parent.insert(neighbor, cell);
                distance.insert(neighbor, current_distance + 1);
                queue.push_back(neighbor);
            }
        }
    }

    None
}

fn build_result(
    cell_km: f64,
    start_cell: Cell,
    end_cell: Cell,
    parent: &HashMap<Cell, Cell>,
    iterations: u64,
    visited_cells: usize,
) -> RouteSearch {
    // `parent` maps a cell to its predecessor toward the destination, so
    // walking from `start_cell` through `parent` already yields a
    // start-to-end ordered path; no reversal needed.
    let mut cells = Vec::new();
    let mut current = start_cell;
    cells.push(current);
    while current != end_cell {
        current = parent[&current];
        cells.push(current);
    }

    let waypoints: Vec<(f64, f64)> = cells.iter().map(|&c| grid::dequantize(c, cell_km)).collect();
    let total_distance = waypoints.windows(2).map(|pair| haversine(pair[0], pair[1])).sum();

    RouteSearch {
        grid_cells: waypoints.len(),
        total_distance,
        waypoints,
        iterations,
        visited_cells,
    }
}
