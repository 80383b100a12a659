//! Bucketing UNIX timestamps into calendar fields.

use crate::error::{QuakestatError, Result};
use crate::models::{Table, Value};
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Unit of a numeric timestamp column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TimestampUnit {
    #[default]
    Seconds,
    Milliseconds,
}

/// UTC calendar date of a timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl CalendarDate {
    /// Date of a UNIX timestamp in (possibly fractional) seconds
    pub fn from_unix_seconds(seconds: f64) -> Result<Self> {
        if !seconds.is_finite() {
            return Err(QuakestatError::invalid_parameter(
                "timestamp",
                format!("{} is not a finite number", seconds),
            ));
        }

        let whole = seconds.floor();
        let nanos = ((seconds - whole) * 1e9).round().min(999_999_999.0) as u32;

        // Beyond i64 seconds chrono rejects the value anyway
        if whole.abs() > i64::MAX as f64 {
            return Err(out_of_range(seconds));
        }

        let datetime = DateTime::<Utc>::from_timestamp(whole as i64, nanos)
            .ok_or_else(|| out_of_range(seconds))?;

        Ok(Self { year: datetime.year(), month: datetime.month(), day: datetime.day() })
    }

    /// Date of a UNIX timestamp in milliseconds
    pub fn from_unix_millis(millis: f64) -> Result<Self> {
        Self::from_unix_seconds(millis / 1000.0)
    }

    pub fn from_timestamp(value: f64, unit: TimestampUnit) -> Result<Self> {
        match unit {
            TimestampUnit::Seconds => Self::from_unix_seconds(value),
            TimestampUnit::Milliseconds => Self::from_unix_millis(value),
        }
    }
}

fn out_of_range(value: f64) -> QuakestatError {
    QuakestatError::invalid_parameter("timestamp", format!("{} is out of range", value))
}

/// Append `year`, `month` and `day` columns derived from a timestamp column
///
/// Null timestamps produce null calendar fields; any other non-numeric value
/// is an error.
pub fn add_calendar_columns(table: Table, column: &str, unit: TimestampUnit) -> Result<Table> {
    let mut years = Vec::with_capacity(table.len());
    let mut months = Vec::with_capacity(table.len());
    let mut days = Vec::with_capacity(table.len());

    for (row, value) in table.column(column)?.enumerate() {
        if value.is_null() {
            years.push(Value::Null);
            months.push(Value::Null);
            days.push(Value::Null);
            continue;
        }

        let timestamp = value.as_f64().ok_or_else(|| {
            QuakestatError::invalid_parameter(
                column,
                format!("row {}: {:?} is not a numeric timestamp", row, value.to_string()),
            )
        })?;

        let date = CalendarDate::from_timestamp(timestamp, unit)?;
        years.push(Value::from(date.year));
        months.push(Value::from(date.month));
        days.push(Value::from(date.day));
    }

    tracing::debug!("Derived calendar fields for {} rows from '{}'", years.len(), column);

    table.with_column("year", years)?.with_column("month", months)?.with_column("day", days)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch() {
        let date = CalendarDate::from_unix_seconds(0.0).unwrap();
        assert_eq!(date, CalendarDate { year: 1970, month: 1, day: 1 });
    }

    #[test]
    fn test_milliseconds() {
        // 2023-11-14T22:13:20Z
        let date = CalendarDate::from_unix_millis(1_700_000_000_000.0).unwrap();
        assert_eq!(date, CalendarDate { year: 2023, month: 11, day: 14 });
    }

    #[test]
    fn test_fractional_and_negative_seconds() {
        let date = CalendarDate::from_unix_seconds(86_399.9).unwrap();
        assert_eq!(date.day, 1);

        let date = CalendarDate::from_unix_seconds(-1.0).unwrap();
        assert_eq!(date, CalendarDate { year: 1969, month: 12, day: 31 });
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(CalendarDate::from_unix_seconds(f64::NAN).is_err());
        assert!(CalendarDate::from_unix_seconds(1e300).is_err());
    }

    #[test]
    fn test_add_calendar_columns() {
        let table = Table::from_rows(
            ["time", "mag"],
            vec![
                vec![Value::Int(1_420_070_400_000), Value::Float(6.1)],
                vec![Value::Null, Value::Float(4.0)],
            ],
        )
        .unwrap();

        let table = add_calendar_columns(table, "time", TimestampUnit::Milliseconds).unwrap();

        assert_eq!(table.columns(), &["time", "mag", "year", "month", "day"]);
        assert_eq!(table.value(0, "year").unwrap(), &Value::Int(2015));
        assert_eq!(table.value(0, "month").unwrap(), &Value::Int(1));
        assert_eq!(table.value(0, "day").unwrap(), &Value::Int(1));
        assert!(table.value(1, "year").unwrap().is_null());
    }

    #[test]
    fn test_add_calendar_columns_rejects_text() {
        let table = Table::from_rows(["time"], vec![vec![Value::from("yesterday")]]).unwrap();
        assert!(add_calendar_columns(table, "time", TimestampUnit::Seconds).is_err());
    }
}
