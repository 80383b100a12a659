//! Calendar command implementation

use super::emit_table;
use crate::cli::CalendarArgs;
use crate::inputs::load_table;
use crate::output::OutputWriter;
use anyhow::Result;
use quakestat_core::calendar::{add_calendar_columns, TimestampUnit};

pub fn execute(args: CalendarArgs, output: &OutputWriter) -> Result<()> {
    let unit = if args.millis { TimestampUnit::Milliseconds } else { TimestampUnit::Seconds };

    let table = load_table(&args.input)?;
    let table = add_calendar_columns(table, &args.column, unit)?;

    emit_table(&table, args.output.as_deref(), output)
}
