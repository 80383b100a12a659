use console::style;
use quakestat_core::formats::geojson::to_geojson_string;
use quakestat_core::models::{GeoTable, Table as DataTable};
use serde::Serialize;
use std::fmt::Display;
use tabled::{builder::Builder, settings::Style, Table, Tabled};

/// Output format mode
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Human,
    Json,
}

pub struct OutputWriter {
    format: OutputFormat,
}

fn print_json(value: &serde_json::Value) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()));
}

fn eprint_json(value: &serde_json::Value) {
    eprintln!("{}", serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()));
}

impl OutputWriter {
    pub fn new(json: bool) -> Self {
        Self {
            format: if json {
                OutputFormat::Json
            } else {
                OutputFormat::Human
            },
        }
    }

    pub fn success(&self, message: impl Display) {
        match self.format {
            OutputFormat::Human => {
                println!("{} {}", style("✓").green().bold(), message);
            }
            OutputFormat::Json => print_json(&serde_json::json!({
                "status": "success",
                "message": message.to_string(),
            })),
        }
    }

    pub fn info(&self, message: impl Display) {
        match self.format {
            OutputFormat::Human => {
                println!("{} {}", style("ℹ").blue().bold(), message);
            }
            OutputFormat::Json => print_json(&serde_json::json!({
                "status": "info",
                "message": message.to_string(),
            })),
        }
    }

    pub fn error(&self, message: impl Display) {
        match self.format {
            OutputFormat::Human => {
                eprintln!("{} {}", style("✗").red().bold(), message);
            }
            OutputFormat::Json => eprint_json(&serde_json::json!({
                "status": "error",
                "message": message.to_string(),
            })),
        }
    }

    /// Render typed rows (human mode only)
    pub fn table<T: Tabled>(&self, data: Vec<T>) {
        if data.is_empty() {
            println!("{}", style("(no data)").dim());
        } else {
            let mut table = Table::new(data);
            table.with(Style::rounded());
            println!("{}", table);
        }
    }

    /// Render a data table: a rounded table for humans, an array of records as JSON
    pub fn records(&self, table: &DataTable) {
        match self.format {
            OutputFormat::Human => {
                if table.is_empty() {
                    println!("{}", style("(no data)").dim());
                    return;
                }

                let mut builder = Builder::default();
                builder.push_record(table.columns().iter().cloned());
                for row in table.rows() {
                    builder.push_record(row.iter().map(|v| v.to_string()));
                }

                let mut rendered = builder.build();
                rendered.with(Style::rounded());
                println!("{}", rendered);
            }
            OutputFormat::Json => print_json(&serde_json::json!({
                "status": "success",
                "data": table.to_json_records(),
            })),
        }
    }

    /// Print a feature table as a GeoJSON FeatureCollection
    pub fn features(&self, table: &GeoTable) -> anyhow::Result<()> {
        let collection = to_geojson_string(table);
        match self.format {
            OutputFormat::Human => println!("{}", collection),
            OutputFormat::Json => {
                let data: serde_json::Value = serde_json::from_str(&collection)?;
                print_json(&serde_json::json!({ "status": "success", "data": data }));
            }
        }
        Ok(())
    }

    pub fn result<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Human => {
                println!("{}", serde_json::to_string_pretty(&data)?);
            }
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "status": "success",
                    "data": data,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
        }
        Ok(())
    }

    pub fn kv(&self, key: impl Display, value: impl Display) {
        println!("{}: {}", style(key).bold(), value);
    }

    pub fn section(&self, title: impl Display) {
        if !self.is_json() {
            println!("\n{}", style(title).bold().underlined());
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }
}
