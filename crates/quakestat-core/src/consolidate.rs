//! Merging a directory tree of CSV files into one table.

use crate::error::{QuakestatError, Result};
use crate::formats::read_csv;
use crate::models::{Table, Value};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// How columns are aligned when tables with different columns are concatenated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColumnPolicy {
    /// Keep only columns present in every input, ordered as in the first input
    #[default]
    Intersection,
    /// Keep every column, ordered by first appearance, filling gaps with null
    Union,
}

/// CSV files under `directory` whose file name has at least `min_filename_length` characters
///
/// Paths are returned sorted so the concatenation order is deterministic.
pub fn find_csv_files(directory: &Path, min_filename_length: usize) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(directory) {
        let entry = entry.map_err(|e| {
            e.into_io_error().map(QuakestatError::Io).unwrap_or_else(|| {
                QuakestatError::invalid_parameter("directory", "filesystem loop detected")
            })
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if !name.ends_with(".csv") {
            continue;
        }

        if name.chars().count() < min_filename_length {
            tracing::debug!("Skipping {} (name shorter than {})", name, min_filename_length);
            continue;
        }

        files.push(entry.into_path());
    }

    files.sort();
    Ok(files)
}

/// Concatenate tables under a column policy. Row order follows input order.
pub fn concat_tables(tables: &[Table], policy: ColumnPolicy) -> Result<Table> {
    let Some(first) = tables.first() else {
        return Err(QuakestatError::invalid_parameter("tables", "nothing to concatenate"));
    };

    let columns: Vec<String> = match policy {
        ColumnPolicy::Intersection => first
            .columns()
            .iter()
            .filter(|c| tables.iter().all(|t| t.has_column(c)))
            .cloned()
            .collect(),
        ColumnPolicy::Union => {
            let mut columns: Vec<String> = Vec::new();
            for column in tables.iter().flat_map(|t| t.columns()) {
                if !columns.contains(column) {
                    columns.push(column.clone());
                }
            }
            columns
        }
    };

    let mut merged = Table::new(columns.clone())?;

    for table in tables {
        let positions: Vec<Option<usize>> =
            columns.iter().map(|c| table.column_index(c).ok()).collect();

        for row in table.rows() {
            merged.push_row(
                positions
                    .iter()
                    .map(|p| p.map(|i| row[i].clone()).unwrap_or(Value::Null))
                    .collect(),
            )?;
        }
    }

    Ok(merged)
}

/// Merge every qualifying CSV file under `directory`, keeping the columns common to all of them
///
/// Fails if no file qualifies or if any file cannot be read.
pub fn consolidate(directory: &Path, min_filename_length: usize) -> Result<Table> {
    consolidate_with(directory, min_filename_length, ColumnPolicy::Intersection)
}

/// [`consolidate`] with an explicit column policy
pub fn consolidate_with(
    directory: &Path,
    min_filename_length: usize,
    policy: ColumnPolicy,
) -> Result<Table> {
    let files = find_csv_files(directory, min_filename_length)?;

    if files.is_empty() {
        return Err(QuakestatError::NoInputFiles { path: directory.to_path_buf() });
    }

    let tables: Vec<Table> = files
        .iter()
        .map(|path| {
            tracing::debug!("Loading {}", path.display());
            read_csv(path)
        })
        .collect::<Result<_>>()?;

    let merged = concat_tables(&tables, policy)?;

    if policy == ColumnPolicy::Intersection {
        let dropped: usize = tables.iter().map(|t| t.width()).max().unwrap_or(0) - merged.width();
        if dropped > 0 {
            tracing::warn!("Dropped columns not shared by every file ({} fewer than the widest)", dropped);
        }
    }

    tracing::info!(
        "Consolidated {} files into {} rows x {} columns",
        files.len(),
        merged.len(),
        merged.width()
    );

    Ok(merged)
}
