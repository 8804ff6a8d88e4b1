//! Configuration command handler.

use std::path::Path;
use vitrine::{JsonError, VitrineConfig, VitrineResult};

/// Load configuration from an explicit file or the layered defaults.
pub fn load_config(path: Option<&Path>) -> VitrineResult<VitrineConfig> {
    match path {
        Some(path) => VitrineConfig::from_file(path),
        None => VitrineConfig::load(),
    }
}

/// Print the effective configuration as JSON.
pub fn show_config(path: Option<&Path>) -> VitrineResult<()> {
    let config = load_config(path)?;
    let json = serde_json::to_string_pretty(&config).map_err(JsonError::from)?;
    println!("{}", json);
    Ok(())
}
