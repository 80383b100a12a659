use crate::consolidate::ColumnPolicy;
use crate::error::{QuakestatError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Default configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "quakestat.toml";

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for quakestat
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub crs: ConfigValue<u32>,
    pub buffer_degrees: ConfigValue<f64>,
    pub min_filename_length: ConfigValue<usize>,
    pub lon_column: ConfigValue<String>,
    pub lat_column: ConfigValue<String>,
    pub column_policy: ConfigValue<ColumnPolicy>,
    pub geocoder_url: ConfigValue<String>,
    pub user_agent: ConfigValue<String>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            crs: ConfigValue::new(4326, ConfigSource::Default),
            buffer_degrees: ConfigValue::new(2.0, ConfigSource::Default),
            min_filename_length: ConfigValue::new(0, ConfigSource::Default),
            lon_column: ConfigValue::new("longitude".to_string(), ConfigSource::Default),
            lat_column: ConfigValue::new("latitude".to_string(), ConfigSource::Default),
            column_policy: ConfigValue::new(ColumnPolicy::Intersection, ConfigSource::Default),
            geocoder_url: ConfigValue::new(
                "https://nominatim.openstreetmap.org".to_string(),
                ConfigSource::Default,
            ),
            user_agent: ConfigValue::new("quakestat".to_string(), ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| QuakestatError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| QuakestatError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(crs) = file_config.crs {
            self.crs.update(crs, ConfigSource::File);
        }

        if let Some(radius) = file_config.buffer_degrees {
            self.buffer_degrees.update(validate_buffer_degrees(radius)?, ConfigSource::File);
        }

        if let Some(length) = file_config.min_filename_length {
            self.min_filename_length.update(length, ConfigSource::File);
        }

        if let Some(column) = file_config.lon_column {
            self.lon_column.update(column, ConfigSource::File);
        }

        if let Some(column) = file_config.lat_column {
            self.lat_column.update(column, ConfigSource::File);
        }

        if let Some(policy) = file_config.column_policy {
            self.column_policy.update(policy, ConfigSource::File);
        }

        if let Some(url) = file_config.geocoder_url {
            self.geocoder_url.update(url, ConfigSource::File);
        }

        if let Some(agent) = file_config.user_agent {
            self.user_agent.update(agent, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load the given file, or `quakestat.toml` when it exists in the working directory
    pub fn load_optional_file(self, path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => self.load_from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                self.load_from_file(DEFAULT_CONFIG_FILE)
            }
            None => Ok(self),
        }
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // QUAKESTAT_CRS
        if let Ok(crs_str) = env::var("QUAKESTAT_CRS") {
            match crs_str.parse::<u32>() {
                Ok(crs) => self.crs.update(crs, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid QUAKESTAT_CRS value '{}': expected integer EPSG code",
                    crs_str
                ),
            }
        }

        // QUAKESTAT_BUFFER_DEGREES
        if let Ok(radius_str) = env::var("QUAKESTAT_BUFFER_DEGREES") {
            match parse_buffer_degrees(&radius_str) {
                Ok(radius) => self.buffer_degrees.update(radius, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid QUAKESTAT_BUFFER_DEGREES value '{}': expected a non-negative number",
                    radius_str
                ),
            }
        }

        // QUAKESTAT_MIN_FILENAME_LENGTH
        if let Ok(length_str) = env::var("QUAKESTAT_MIN_FILENAME_LENGTH") {
            match length_str.parse::<usize>() {
                Ok(length) => self.min_filename_length.update(length, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid QUAKESTAT_MIN_FILENAME_LENGTH value '{}': expected non-negative integer",
                    length_str
                ),
            }
        }

        if let Ok(column) = env::var("QUAKESTAT_LON_COLUMN") {
            self.lon_column.update(column, ConfigSource::Environment);
        }

        if let Ok(column) = env::var("QUAKESTAT_LAT_COLUMN") {
            self.lat_column.update(column, ConfigSource::Environment);
        }

        // QUAKESTAT_COLUMN_POLICY
        if let Ok(policy_str) = env::var("QUAKESTAT_COLUMN_POLICY") {
            match parse_column_policy(&policy_str) {
                Ok(policy) => self.column_policy.update(policy, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid QUAKESTAT_COLUMN_POLICY value '{}': expected intersection or union",
                    policy_str
                ),
            }
        }

        if let Ok(url) = env::var("QUAKESTAT_GEOCODER_URL") {
            self.geocoder_url.update(url, ConfigSource::Environment);
        }

        if let Ok(agent) = env::var("QUAKESTAT_USER_AGENT") {
            self.user_agent.update(agent, ConfigSource::Environment);
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(crs) = overrides.crs {
            self.crs.update(crs, ConfigSource::Cli);
        }

        if let Some(radius) = overrides.buffer_degrees {
            self.buffer_degrees.update(radius, ConfigSource::Cli);
        }

        if let Some(length) = overrides.min_filename_length {
            self.min_filename_length.update(length, ConfigSource::Cli);
        }

        if let Some(column) = overrides.lon_column {
            self.lon_column.update(column, ConfigSource::Cli);
        }

        if let Some(column) = overrides.lat_column {
            self.lat_column.update(column, ConfigSource::Cli);
        }

        if let Some(policy) = overrides.column_policy {
            self.column_policy.update(policy, ConfigSource::Cli);
        }
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert("crs".to_string(), (format!("EPSG:{}", self.crs.value), self.crs.source));

        map.insert(
            "buffer_degrees".to_string(),
            (self.buffer_degrees.value.to_string(), self.buffer_degrees.source),
        );

        map.insert(
            "min_filename_length".to_string(),
            (self.min_filename_length.value.to_string(), self.min_filename_length.source),
        );

        map.insert("lon_column".to_string(), (self.lon_column.value.clone(), self.lon_column.source));
        map.insert("lat_column".to_string(), (self.lat_column.value.clone(), self.lat_column.source));

        map.insert(
            "column_policy".to_string(),
            (format!("{:?}", self.column_policy.value).to_lowercase(), self.column_policy.source),
        );

        map.insert(
            "geocoder_url".to_string(),
            (self.geocoder_url.value.clone(), self.geocoder_url.source),
        );

        map.insert("user_agent".to_string(), (self.user_agent.value.clone(), self.user_agent.source));

        map
    }
}

impl Default for LayeredConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    crs: Option<u32>,
    buffer_degrees: Option<f64>,
    min_filename_length: Option<usize>,
    lon_column: Option<String>,
    lat_column: Option<String>,
    column_policy: Option<ColumnPolicy>,
    geocoder_url: Option<String>,
    user_agent: Option<String>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub crs: Option<u32>,
    pub buffer_degrees: Option<f64>,
    pub min_filename_length: Option<usize>,
    pub lon_column: Option<String>,
    pub lat_column: Option<String>,
    pub column_policy: Option<ColumnPolicy>,
}

/// Parse a buffer radius in degrees
pub fn parse_buffer_degrees(s: &str) -> Result<f64> {
    let radius = s.trim().parse::<f64>().map_err(|_| QuakestatError::ConfigInvalid {
        key: "buffer_degrees".to_string(),
        reason: format!("Invalid buffer radius: {}. Use a non-negative number of degrees", s),
    })?;
    validate_buffer_degrees(radius)
}

fn validate_buffer_degrees(radius: f64) -> Result<f64> {
    if radius.is_finite() && radius >= 0.0 {
        Ok(radius)
    } else {
        Err(QuakestatError::ConfigInvalid {
            key: "buffer_degrees".to_string(),
            reason: format!("Invalid buffer radius: {}. Use a non-negative number of degrees", radius),
        })
    }
}

/// Parse column policy from string
pub fn parse_column_policy(s: &str) -> Result<ColumnPolicy> {
    match s.to_lowercase().as_str() {
        "intersection" | "inner" => Ok(ColumnPolicy::Intersection),
        "union" | "outer" => Ok(ColumnPolicy::Union),
        _ => Err(QuakestatError::ConfigInvalid {
            key: "column_policy".to_string(),
            reason: format!("Invalid column policy: {}. Use intersection or union", s),
        }),
    }
}
