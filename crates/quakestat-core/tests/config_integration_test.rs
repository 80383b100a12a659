//! Integration tests for layered configuration
//!
//! These tests verify that configuration loading follows the correct precedence:
//! CLI arguments > Environment variables > Config file > Defaults

use quakestat_core::config::{CliConfigOverrides, ConfigSource, LayeredConfig};
use quakestat_core::consolidate::ColumnPolicy;
use serial_test::serial;
use std::env;
use std::io::Write;
use tempfile::NamedTempFile;

const ENV_VARS: &[&str] = &[
    "QUAKESTAT_CRS",
    "QUAKESTAT_BUFFER_DEGREES",
    "QUAKESTAT_MIN_FILENAME_LENGTH",
    "QUAKESTAT_LON_COLUMN",
    "QUAKESTAT_LAT_COLUMN",
    "QUAKESTAT_COLUMN_POLICY",
    "QUAKESTAT_GEOCODER_URL",
    "QUAKESTAT_USER_AGENT",
];

fn clear_env() {
    for var in ENV_VARS {
        env::remove_var(var);
    }
}

fn config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", content).unwrap();
    file
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    clear_env();

    let config = LayeredConfig::with_defaults().load_from_env();

    assert_eq!(config.crs.value, 4326);
    assert_eq!(config.buffer_degrees.value, 2.0);
    assert_eq!(config.min_filename_length.value, 0);
    assert_eq!(config.geocoder_url.value, "https://nominatim.openstreetmap.org");
    assert_eq!(config.user_agent.source, ConfigSource::Default);
}

#[test]
#[serial]
fn test_env_overrides_file() {
    clear_env();
    let file = config_file(
        r#"
buffer_degrees = 1.0
lon_column = "lng"
"#,
    );

    env::set_var("QUAKESTAT_BUFFER_DEGREES", "3.5");
    env::set_var("QUAKESTAT_COLUMN_POLICY", "union");

    let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap().load_from_env();

    assert_eq!(config.buffer_degrees.value, 3.5);
    assert_eq!(config.buffer_degrees.source, ConfigSource::Environment);
    assert_eq!(config.lon_column.value, "lng");
    assert_eq!(config.lon_column.source, ConfigSource::File);
    assert_eq!(config.column_policy.value, ColumnPolicy::Union);

    clear_env();
}

#[test]
#[serial]
fn test_cli_overrides_everything() {
    clear_env();
    let file = config_file("min_filename_length = 5");
    env::set_var("QUAKESTAT_MIN_FILENAME_LENGTH", "8");

    let mut config =
        LayeredConfig::with_defaults().load_from_file(file.path()).unwrap().load_from_env();
    config.update_from_cli(CliConfigOverrides {
        min_filename_length: Some(12),
        ..Default::default()
    });

    assert_eq!(config.min_filename_length.value, 12);
    assert_eq!(config.min_filename_length.source, ConfigSource::Cli);

    clear_env();
}

#[test]
#[serial]
fn test_invalid_env_values_ignored() {
    clear_env();
    env::set_var("QUAKESTAT_CRS", "wgs84");
    env::set_var("QUAKESTAT_BUFFER_DEGREES", "-2");
    env::set_var("QUAKESTAT_COLUMN_POLICY", "sideways");

    let config = LayeredConfig::with_defaults().load_from_env();

    assert_eq!(config.crs.value, 4326);
    assert_eq!(config.crs.source, ConfigSource::Default);
    assert_eq!(config.buffer_degrees.value, 2.0);
    assert_eq!(config.column_policy.value, ColumnPolicy::Intersection);

    clear_env();
}

#[test]
fn test_invalid_file_is_an_error() {
    let file = config_file("crs = \"not a number\"");
    assert!(LayeredConfig::with_defaults().load_from_file(file.path()).is_err());
}
