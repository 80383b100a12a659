//! CSV tables. The first record is the header row.

use std::path::Path;

use crate::error::{QuakestatError, Result};
use crate::models::{Table, Value};

/// Read a CSV file into a table, inferring cell types
pub fn read_csv(path: &Path) -> Result<Table> {
    let mut reader = ::csv::ReaderBuilder::new().has_headers(true).from_path(path)?;
    read_records(&mut reader)
}

/// Read CSV from any reader (e.g. an in-memory buffer)
pub fn read_csv_from<R: std::io::Read>(input: R) -> Result<Table> {
    let mut reader = ::csv::ReaderBuilder::new().has_headers(true).from_reader(input);
    read_records(&mut reader)
}

fn read_records<R: std::io::Read>(reader: &mut ::csv::Reader<R>) -> Result<Table> {
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(QuakestatError::FormatError {
            format: "CSV".to_string(),
            message: "missing header row".to_string(),
        });
    }

    let mut table = Table::new(headers)?;

    for record in reader.records() {
        let record = record?;
        table.push_row(record.iter().map(Value::parse).collect())?;
    }

    Ok(table)
}

/// Write a table as CSV with a header row. Nulls are written as empty cells.
pub fn write_csv(table: &Table, path: &Path) -> Result<()> {
    let mut writer = ::csv::Writer::from_path(path)?;
    write_records(table, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write a table as CSV to any writer
pub fn write_csv_to<W: std::io::Write>(table: &Table, output: W) -> Result<()> {
    let mut writer = ::csv::Writer::from_writer(output);
    write_records(table, &mut writer)?;
    writer.flush()?;
    Ok(())
}

fn write_records<W: std::io::Write>(table: &Table, writer: &mut ::csv::Writer<W>) -> Result<()> {
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|v| v.to_string()))?;
    }
    Ok(())
}
