//! Integration tests for consolidating directories of CSV files

use quakestat_core::consolidate::{consolidate, consolidate_with, find_csv_files, ColumnPolicy};
use quakestat_core::models::Value;
use quakestat_core::QuakestatError;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(dir: &Path, relative: &str, content: &str) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn test_intersection_of_columns() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "2020_quakes.csv", "a,b,c\n1,2,3\n4,5,6\n");
    write(dir.path(), "nested/2021_quakes.csv", "b,c,d\n7,8,9\n");

    let table = consolidate(dir.path(), 0).unwrap();

    assert_eq!(table.columns(), &["b", "c"]);
    assert_eq!(table.len(), 3);
    assert_eq!(table.rows()[0], vec![Value::Int(2), Value::Int(3)]);
    assert_eq!(table.rows()[2], vec![Value::Int(7), Value::Int(8)]);
}

#[test]
fn test_short_names_contribute_nothing() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "earthquakes_2020.csv", "a,b\n1,2\n");
    write(dir.path(), "x.csv", "a,b\n100,200\n");

    let table = consolidate(dir.path(), 10).unwrap();

    assert_eq!(table.len(), 1);
    assert_eq!(table.value(0, "a").unwrap(), &Value::Int(1));
}

#[test]
fn test_non_csv_files_ignored() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "data.csv", "a\n1\n");
    write(dir.path(), "notes.txt", "a\nnot a table\n");
    write(dir.path(), "archive.csv.bak", "a\n2\n");

    let files = find_csv_files(dir.path(), 0).unwrap();
    assert_eq!(files.len(), 1);
    assert!(files[0].ends_with("data.csv"));
}

#[test]
fn test_no_matching_files() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.csv", "a\n1\n");

    let err = consolidate(dir.path(), 50).unwrap_err();
    assert!(matches!(err, QuakestatError::NoInputFiles { .. }));
}

#[test]
fn test_unreadable_file_aborts() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "good.csv", "a,b\n1,2\n");
    write(dir.path(), "ragged.csv", "a,b\n1,2,3\n");

    assert!(consolidate(dir.path(), 0).is_err());
}

#[test]
fn test_empty_file_aborts() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a_quakes.csv", "year,magnitude\n2020,5.0\n");
    write(dir.path(), "b_quakes.csv", "");

    let err = consolidate(dir.path(), 0).unwrap_err();
    assert!(matches!(err, QuakestatError::FormatError { .. }));
    assert!(consolidate_with(dir.path(), 0, ColumnPolicy::Union).is_err());
}

#[test]
fn test_union_policy() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "first.csv", "a,b\n1,2\n");
    write(dir.path(), "second.csv", "b,d\n3,4\n");

    let table = consolidate_with(dir.path(), 0, ColumnPolicy::Union).unwrap();

    assert_eq!(table.columns(), &["a", "b", "d"]);
    assert_eq!(table.rows()[1], vec![Value::Null, Value::Int(3), Value::Int(4)]);
}
