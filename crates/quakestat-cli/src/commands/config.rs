//! Config command implementation

use crate::config_loader::load_config;
use crate::output::OutputWriter;
use crate::output_types::ConfigEntry;
use anyhow::Result;
use std::path::Path;
use tabled::Tabled;

#[derive(Tabled)]
struct ConfigRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Source")]
    source: String,
}

pub fn execute(config_file: Option<&Path>, output: &OutputWriter) -> Result<()> {
    let config = load_config(config_file)?;

    let mut entries: Vec<ConfigEntry> = config
        .to_inspection_map()
        .into_iter()
        .map(|(key, (value, source))| ConfigEntry { key, value, source: format!("{:?}", source) })
        .collect();

    // Sort by key for consistent output
    entries.sort_by(|a, b| a.key.cmp(&b.key));

    if output.is_json() {
        return output.result(entries);
    }

    output.section("Configuration Values");
    output.table(
        entries
            .into_iter()
            .map(|e| ConfigRow { key: e.key, value: e.value, source: e.source })
            .collect(),
    );

    output.section("Configuration Precedence");
    output.info("CLI arguments > Environment variables > Config file > Defaults");

    Ok(())
}
