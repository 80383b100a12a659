use serde::Serialize;

/// Output for commands that write a file
#[derive(Debug, Serialize)]
pub struct WriteOutput {
    pub path: String,
    pub rows: usize,
}

/// Output for the config command
#[derive(Debug, Serialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
    pub source: String,
}

/// Output for the locate command
#[derive(Debug, Serialize)]
pub struct LocateOutput {
    pub lat: f64,
    pub lon: f64,
    pub country: Option<String>,
    pub water_body: Option<String>,
    pub location_type: Option<String>,
}
