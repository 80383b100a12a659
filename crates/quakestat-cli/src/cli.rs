use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// quakestat - Earthquake statistics over countries and a world grid
#[derive(Parser, Debug)]
#[command(name = "quakestat")]
#[command(about = "Earthquake statistics over countries and a world grid", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to ./quakestat.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the 10° world grid
    Grid(GridArgs),

    /// Count earthquakes per grid bin
    Bin(BinArgs),

    /// Turn a CSV of coordinates into point features
    Points(PointsArgs),

    /// Buffer polygons by a radius in degrees
    Buffer(BufferArgs),

    /// Count earthquakes per country for one year
    Count(CountArgs),

    /// Largest earthquake magnitude per country
    MaxMagnitude(MaxMagnitudeArgs),

    /// Merge a directory tree of CSV files into one table
    Consolidate(ConsolidateArgs),

    /// Add year, month and day columns derived from a timestamp column
    Calendar(CalendarArgs),

    /// Reverse geocode a coordinate
    Locate(LocateArgs),

    /// Show the effective configuration and where each value comes from
    Config,
}

/// Coordinate column overrides for CSV earthquake inputs
#[derive(clap::Args, Debug, Default)]
pub struct CoordinateArgs {
    /// Longitude column of CSV inputs
    #[arg(long, value_name = "COLUMN")]
    pub lon: Option<String>,

    /// Latitude column of CSV inputs
    #[arg(long, value_name = "COLUMN")]
    pub lat: Option<String>,
}

#[derive(Parser, Debug)]
pub struct GridArgs {
    /// Write the grid polygons to a GeoJSON file
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct BinArgs {
    /// Earthquake points (CSV, GeoJSON or Shapefile)
    pub earthquakes: PathBuf,

    #[command(flatten)]
    pub coordinates: CoordinateArgs,

    /// Write the counts to a CSV file
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct PointsArgs {
    /// CSV file with coordinate columns
    pub input: PathBuf,

    #[command(flatten)]
    pub coordinates: CoordinateArgs,

    /// CRS EPSG code of the coordinates
    #[arg(long)]
    pub crs: Option<u32>,

    /// Write the points to a GeoJSON file (stdout otherwise)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct BufferArgs {
    /// Polygon dataset (GeoJSON or Shapefile)
    pub input: PathBuf,

    /// Buffer radius in degrees
    #[arg(long)]
    pub radius: Option<f64>,

    /// Write the buffered polygons to a GeoJSON file (stdout otherwise)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct CountArgs {
    /// Country polygons (GeoJSON or Shapefile)
    pub countries: PathBuf,

    /// Earthquake points (CSV, GeoJSON or Shapefile)
    pub earthquakes: PathBuf,

    /// Year to count
    #[arg(long, allow_negative_numbers = true)]
    pub year: i64,

    /// Buffer the countries before counting
    #[arg(long)]
    pub buffered: bool,

    /// Buffer radius in degrees (with --buffered)
    #[arg(long)]
    pub radius: Option<f64>,

    /// Keep countries without earthquakes, with an empty count
    #[arg(long)]
    pub left: bool,

    /// Country name column
    #[arg(long, default_value = "NAME")]
    pub name_column: String,

    /// Year column of the earthquakes
    #[arg(long, default_value = "year")]
    pub year_column: String,

    #[command(flatten)]
    pub coordinates: CoordinateArgs,

    /// Write the counts to a CSV file
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct MaxMagnitudeArgs {
    /// Country polygons (GeoJSON or Shapefile)
    pub countries: PathBuf,

    /// Earthquake points (CSV, GeoJSON or Shapefile)
    pub earthquakes: PathBuf,

    /// Radius in degrees by which country borders are extended
    #[arg(long)]
    pub radius: Option<f64>,

    /// Country name column
    #[arg(long, default_value = "NAME")]
    pub name_column: String,

    /// Magnitude column of the earthquakes
    #[arg(long, default_value = "magnitude")]
    pub magnitude_column: String,

    #[command(flatten)]
    pub coordinates: CoordinateArgs,

    /// Write the result to a CSV file
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ConsolidateArgs {
    /// Directory to scan recursively for CSV files
    pub directory: PathBuf,

    /// Skip files whose name is shorter than this many characters
    #[arg(long)]
    pub min_name_length: Option<usize>,

    /// Keep every column, filling gaps with empty cells
    #[arg(long)]
    pub union: bool,

    /// Write the merged table to a CSV file
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct CalendarArgs {
    /// CSV file with a Unix timestamp column
    pub input: PathBuf,

    /// Timestamp column
    #[arg(long, default_value = "time")]
    pub column: String,

    /// Timestamps are in milliseconds instead of seconds
    #[arg(long)]
    pub millis: bool,

    /// Write the result to a CSV file
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct LocateArgs {
    /// Latitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lon: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_count() {
        let cli = Cli::parse_from([
            "quakestat",
            "count",
            "countries.geojson",
            "quakes.csv",
            "--year",
            "2015",
            "--buffered",
            "--lon",
            "lng",
            "--json",
        ]);

        assert!(cli.json);
        match cli.command {
            Commands::Count(args) => {
                assert_eq!(args.year, 2015);
                assert!(args.buffered);
                assert!(!args.left);
                assert_eq!(args.coordinates.lon.as_deref(), Some("lng"));
                assert_eq!(args.name_column, "NAME");
            }
            other => panic!("Expected count, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_negative_coordinates() {
        let cli = Cli::parse_from(["quakestat", "locate", "--lat", "-33.4", "--lon", "-70.6"]);
        match cli.command {
            Commands::Locate(args) => {
                assert_eq!(args.lat, -33.4);
                assert_eq!(args.lon, -70.6);
            }
            other => panic!("Expected locate, got {:?}", other),
        }
    }
}
