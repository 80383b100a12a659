//! Integration tests for the quakestat binary
//!
//! These tests run the built binary and check its JSON output.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn quakestat_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_quakestat"))
}

fn run(args: &[&str], cwd: &Path) -> Output {
    Command::new(quakestat_bin())
        .args(args)
        .current_dir(cwd)
        .env_remove("QUAKESTAT_MIN_FILENAME_LENGTH")
        .env_remove("QUAKESTAT_COLUMN_POLICY")
        .env_remove("QUAKESTAT_LON_COLUMN")
        .env_remove("QUAKESTAT_LAT_COLUMN")
        .env_remove("QUAKESTAT_BUFFER_DEGREES")
        .env_remove("QUAKESTAT_CRS")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command")
}

fn json_stdout(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).expect("Output should be valid JSON")
}

const COUNTRIES: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {
            "type": "Feature",
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]]]
            },
            "properties": { "NAME": "Alpha" }
        },
        {
            "type": "Feature",
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[20.0, 0.0], [30.0, 0.0], [30.0, 10.0], [20.0, 10.0], [20.0, 0.0]]]
            },
            "properties": { "NAME": "Beta" }
        }
    ]
}"#;

const QUAKES: &str = "longitude,latitude,year,magnitude\n\
                      2.0,2.0,2020,5.5\n\
                      3.0,4.0,2020,6.2\n\
                      25.0,5.0,2021,4.8\n\
                      -40.0,-40.0,2020,7.0\n";

#[test]
fn test_grid_json_has_every_bin() {
    let dir = TempDir::new().unwrap();
    let output = run(&["grid", "--json"], dir.path());
    assert!(output.status.success());

    let parsed = json_stdout(&output);
    assert_eq!(parsed["status"], "success");
    let data = parsed["data"].as_array().expect("Should have data array");
    assert_eq!(data.len(), 648);
    assert_eq!(data[0]["bin_id"], "0_0");
    assert_eq!(data[0]["bin_lat"], -85.0);
}

#[test]
fn test_count_command() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("countries.geojson"), COUNTRIES).unwrap();
    fs::write(dir.path().join("quakes.csv"), QUAKES).unwrap();

    let output = run(
        &["count", "countries.geojson", "quakes.csv", "--year", "2020", "--json"],
        dir.path(),
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let parsed = json_stdout(&output);
    let data = parsed["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["NAME"], "Alpha");
    assert_eq!(data[0]["Earthquake count 2020"], 2);
}

#[test]
fn test_buffered_count_warns_on_other_radius() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("countries.geojson"), COUNTRIES).unwrap();
    fs::write(dir.path().join("quakes.csv"), QUAKES).unwrap();

    let args = ["count", "countries.geojson", "quakes.csv", "--year", "2020", "--buffered"];

    let output = run(&[&args[..], &["--radius", "1", "--json"][..]].concat(), dir.path());
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stderr).contains("labelled with a 2° border"));

    let parsed = json_stdout(&output);
    let data = parsed["data"].as_array().unwrap();
    assert_eq!(data[0]["Earthquake count within 2deg border 2020"], 2);

    let output = run(&[&args[..], &["--json"][..]].concat(), dir.path());
    assert!(output.status.success());
    assert!(!String::from_utf8_lossy(&output.stderr).contains("labelled"));
}

#[test]
fn test_max_magnitude_command() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("countries.geojson"), COUNTRIES).unwrap();
    fs::write(dir.path().join("quakes.csv"), QUAKES).unwrap();

    let output = run(
        &["max-magnitude", "countries.geojson", "quakes.csv", "--radius", "0", "--json"],
        dir.path(),
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let data = json_stdout(&output)["data"].as_array().unwrap().clone();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["country"], "Alpha");
    assert_eq!(data[0]["maximum magnitude of earthquake"], 6.2);
    assert_eq!(data[1]["maximum magnitude of earthquake"], 4.8);
}

#[test]
fn test_consolidate_writes_csv() {
    let dir = TempDir::new().unwrap();
    let data_dir = dir.path().join("data");
    fs::create_dir_all(data_dir.join("2021")).unwrap();
    fs::write(data_dir.join("quakes_2020.csv"), "a,b,c\n1,2,3\n").unwrap();
    fs::write(data_dir.join("2021").join("quakes_2021.csv"), "b,c,d\n4,5,6\n").unwrap();

    let merged = dir.path().join("merged.csv");
    let output = run(
        &["consolidate", "data", "--output", merged.to_str().unwrap(), "--json"],
        dir.path(),
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(json_stdout(&output)["data"]["rows"], 2);

    let content = fs::read_to_string(merged).unwrap();
    assert!(content.starts_with("b,c\n"));
}

#[test]
fn test_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let output = run(&["consolidate", "nowhere", "--json"], dir.path());

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("\"status\": \"error\""));
}

#[test]
fn test_config_lists_sources() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("quakestat.toml"), "buffer_degrees = 1.5\n").unwrap();

    let output = run(&["config", "--json"], dir.path());
    assert!(output.status.success());

    let entries = json_stdout(&output)["data"].as_array().unwrap().clone();
    let radius = entries.iter().find(|e| e["key"] == "buffer_degrees").unwrap();
    assert_eq!(radius["value"], "1.5");
    assert_eq!(radius["source"], "File");
}
