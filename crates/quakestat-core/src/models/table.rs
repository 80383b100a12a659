//! In-memory attribute table.

use super::value::Value;
use crate::error::{QuakestatError, Result};
use serde::Serialize;

/// Ordered, named columns over rows of [`Value`]s
///
/// Column names are unique and every row has exactly one value per column.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create an empty table with the given columns
    pub fn new<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();

        for (i, name) in columns.iter().enumerate() {
            if columns[..i].contains(name) {
                return Err(QuakestatError::invalid_parameter(
                    "columns",
                    format!("duplicate column name '{}'", name),
                ));
            }
        }

        Ok(Self { columns, rows: Vec::new() })
    }

    /// Create a table from columns and rows, checking row arity
    pub fn from_rows<I, S>(columns: I, rows: Vec<Vec<Value>>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new(columns)?;
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Append a row. The row must have one value per column.
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(QuakestatError::invalid_parameter(
                "row",
                format!(
                    "row {} has {} values, table has {} columns",
                    self.rows.len(),
                    row.len(),
                    self.columns.len()
                ),
            ));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Position of a column, or `ColumnNotFound`
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| QuakestatError::column_not_found(name, &self.columns))
    }

    /// Iterate over the values of one column
    pub fn column(&self, name: &str) -> Result<impl Iterator<Item = &Value> + '_> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(move |row| &row[idx]))
    }

    /// Value at a row for a named column
    pub fn value(&self, row: usize, name: &str) -> Result<&Value> {
        let idx = self.column_index(name)?;
        self.rows.get(row).map(|r| &r[idx]).ok_or_else(|| {
            QuakestatError::invalid_parameter(
                "row",
                format!("row {} out of range ({} rows)", row, self.rows.len()),
            )
        })
    }

    /// Project onto a subset of columns, in the given order
    pub fn select(&self, names: &[&str]) -> Result<Table> {
        let indices: Vec<usize> =
            names.iter().map(|n| self.column_index(n)).collect::<Result<_>>()?;

        let mut selected = Table::new(names.iter().copied())?;
        selected.rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();
        Ok(selected)
    }

    /// Keep only the rows at the given indices, in that order
    pub fn take_rows(&self, indices: &[usize]) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: indices.iter().filter_map(|&i| self.rows.get(i).cloned()).collect(),
        }
    }

    /// Rename a column in place
    pub fn rename_column(&mut self, from: &str, to: &str) -> Result<()> {
        let idx = self.column_index(from)?;
        if from != to && self.has_column(to) {
            return Err(QuakestatError::invalid_parameter(
                "columns",
                format!("cannot rename '{}' to existing column '{}'", from, to),
            ));
        }
        self.columns[idx] = to.to_string();
        Ok(())
    }

    /// Append a derived column. `values` must have one entry per row.
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<Value>) -> Result<Table> {
        let name = name.into();
        if self.has_column(&name) {
            return Err(QuakestatError::invalid_parameter(
                "columns",
                format!("column '{}' already exists", name),
            ));
        }
        if values.len() != self.rows.len() {
            return Err(QuakestatError::invalid_parameter(
                name,
                format!("expected {} values, got {}", self.rows.len(), values.len()),
            ));
        }

        self.columns.push(name);
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        Ok(self)
    }

    /// Rows as JSON objects keyed by column name
    pub fn to_json_records(&self) -> Vec<serde_json::Value> {
        self.rows
            .iter()
            .map(|row| {
                let object: serde_json::Map<String, serde_json::Value> = self
                    .columns
                    .iter()
                    .zip(row)
                    .map(|(name, value)| (name.clone(), value.to_json()))
                    .collect();
                serde_json::Value::Object(object)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_rows(
            ["NAME", "POP_EST"],
            vec![
                vec!["Chile".into(), Value::Int(19_000_000)],
                vec!["Japan".into(), Value::Int(125_000_000)],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_duplicate_columns_rejected() {
        assert!(Table::new(["a", "b", "a"]).is_err());
    }

    #[test]
    fn test_push_row_checks_arity() {
        let mut table = Table::new(["a", "b"]).unwrap();
        assert!(table.push_row(vec![Value::Int(1)]).is_err());
        assert!(table.push_row(vec![Value::Int(1), Value::Null]).is_ok());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_missing_column_lists_available() {
        let table = sample();
        let err = table.column_index("magnitude").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("magnitude"));
        assert!(message.contains("NAME, POP_EST"));
    }

    #[test]
    fn test_select_and_rename() {
        let mut table = sample().select(&["NAME"]).unwrap();
        table.rename_column("NAME", "country").unwrap();
        assert_eq!(table.columns(), &["country".to_string()]);
        assert_eq!(table.value(1, "country").unwrap(), &Value::from("Japan"));
    }

    #[test]
    fn test_with_column_appends() {
        let table = sample().with_column("rank", vec![Value::Int(2), Value::Int(1)]).unwrap();
        assert_eq!(table.width(), 3);
        assert_eq!(table.value(0, "rank").unwrap(), &Value::Int(2));

        assert!(sample().with_column("rank", vec![Value::Int(1)]).is_err());
        assert!(sample().with_column("NAME", vec![Value::Null, Value::Null]).is_err());
    }

    #[test]
    fn test_take_rows() {
        let table = sample().take_rows(&[1]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.value(0, "NAME").unwrap(), &Value::from("Japan"));
    }
}
