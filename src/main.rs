//! Minimal CLI driver over the `sea_route` library: parses endpoints and
//! routing parameters, dispatches `planner::find_sea_route`, and prints
//! the resulting waypoints (or structured error) to stdout.
//!
//! This binary is a demonstration harness, not the engine itself.
//! Acquisition of real OSM data, visualization, and result persistence
//! remain external concerns per `spec.md` §1.

use clap::Parser;

use sea_route::cli::Args;
use sea_route::error::Result;
use sea_route::logger;
use sea_route::planner::{self, RouteResult};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    let config = args.validate()?;

    logger::Logger::init(config.verbosity, config.no_color);

    if !config.data.exists() {
        logger::warn(&format!(
            "polygon data file not found at {}; routing will fail once a store build is attempted",
            config.data.display()
        ));
    }

    planner::set_source(config.data_source());

    logger::info(&format!(
        "Planning route from ({}, {}) to ({}, {}) [step {} km, clearance {} km]",
        config.start_lat, config.start_lon, config.end_lat, config.end_lon, config.step_km, config.clearance_km
    ));

    let result = planner::find_sea_route(
        config.start_lat,
        config.start_lon,
        config.end_lat,
        config.end_lon,
        Some(config.step_km),
        Some(config.clearance_km),
        None,
    );

    match result {
        RouteResult::Ok {
            waypoints,
            total_distance,
            direct_distance,
            efficiency,
            grid_cells,
            iterations,
            visited_cells,
        } => {
            logger::info(&format!(
                "Route found: {grid_cells} cells, {iterations} iterations, {visited_cells} visited"
            ));
            logger::info(&format!(
                "Direct distance: {direct_distance:.2} km, routed distance: {total_distance:.2} km, efficiency: {efficiency:.1}%"
            ));
            for (lat, lon) in &waypoints {
                logger::output(&format!("{lat:.6},{lon:.6}"));
            }
            Ok(())
        }
        RouteResult::Err { error, .. } => {
            logger::error(&error);
            std::process::exit(1);
        }
    }
}
