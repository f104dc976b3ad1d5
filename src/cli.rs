//! CLI argument parsing and validation for the `sea-route` demonstration
//! driver (`spec.md` §6 ambient CLI).

use clap::Parser;
use std::path::PathBuf;

use crate::error::{Result, SeaRouteError};
use crate::logger::VerbosityLevel;
use crate::planner::DataSource;

/// Input polygon source format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub enum Format {
    Shapefile,
    Geojson,
}

/// Command line arguments for the `sea-route` demonstration driver.
#[derive(Parser, Debug)]
#[command(name = "sea-route")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Starting point latitude.
    #[arg(long)]
    pub start_lat: f64,

    /// Starting point longitude.
    #[arg(long)]
    pub start_lon: f64,

    /// Destination latitude.
    #[arg(long)]
    pub end_lat: f64,

    /// Destination longitude.
    #[arg(long)]
    pub end_lon: f64,

    /// Grid cell size in kilometers.
    #[arg(long, default_value = "10.0")]
    pub step_km: f64,

    /// Minimum clearance from land in kilometers.
    #[arg(long, default_value = "10.0")]
    pub clearance_km: f64,

    /// Path to the polygon data source (a shapefile or a GeoJSON file).
    #[arg(long)]
    pub data: PathBuf,

    /// Data source format.
    #[arg(long, value_enum, default_value = "shapefile")]
    pub format: Format,

    /// Suppress all non-essential output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Print per-cell/per-polygon debug detail.
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long)]
    pub no_color: bool,
}

/// Fully validated configuration object.
#[derive(Debug)]
pub struct Config {
    pub start_lat: f64,
    pub start_lon: f64,
    pub end_lat: f64,
    pub end_lon: f64,
    pub step_km: f64,
    pub clearance_km: f64,
    pub data: PathBuf,
    pub format: Format,
    pub verbosity: VerbosityLevel,
    pub no_color: bool,
}

impl Args {
    /// Validates arguments and converts them to a structured `Config`.
    pub fn validate(self) -> Result<Config> {
        if self.quiet && self.verbose {
            return Err(SeaRouteError::InvalidBbox(
                "--quiet and --verbose are mutually exclusive".to_string(),
            ));
        }

        if self.step_km <= 0.0 {
            return Err(SeaRouteError::InvalidBbox(format!("--step-km must be positive, got {}", self.step_km)));
        }
        if self.clearance_km < 0.0 {
            return Err(SeaRouteError::InvalidBbox(format!(
                "--clearance-km must not be negative, got {}",
                self.clearance_km
            )));
        }

        let verbosity = if self.quiet {
            VerbosityLevel::Quiet
        } else if self.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        };

        Ok(Config {
            start_lat: self.start_lat,
            start_lon: self.start_lon,
            end_lat: self.end_lat,
            end_lon: self.end_lon,
            step_km: self.step_km,
            clearance_km: self.clearance_km,
            data: self.data,
            format: self.format,
            verbosity,
            no_color: self.no_color,
        })
    }
}

impl Config {
    pub fn data_source(&self) -> DataSource {
        match self.format {
            Format::Shapefile => DataSource::Shapefile(self.data.clone()),
            Format::Geojson => DataSource::GeoJson(self.data.clone()),
        }
    }
}
