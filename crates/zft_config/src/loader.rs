//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::PlacerConfig;
use std::path::Path;

/// Name of the configuration file looked up in a working directory.
pub const CONFIG_FILE_NAME: &str = "zft.toml";

/// Upper bound for `area_swap_size`; larger windows only cost time.
const MAX_AREA_SWAP_SIZE: u32 = 1024;

/// Loads and validates a configuration file.
pub fn load_config(path: &Path) -> Result<PlacerConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<PlacerConfig, ConfigError> {
    let config: PlacerConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &PlacerConfig) -> Result<(), ConfigError> {
    if config.placement.iterations == 0 {
        return Err(ConfigError::ValidationError(
            "placement.iterations must be at least 1".to_string(),
        ));
    }
    if config.placement.area_swap_size > MAX_AREA_SWAP_SIZE {
        return Err(ConfigError::ValidationError(format!(
            "placement.area_swap_size must not exceed {MAX_AREA_SWAP_SIZE}"
        )));
    }
    if config.output.directory.is_empty() {
        return Err(ConfigError::ValidationError(
            "output.directory must not be empty".to_string(),
        ));
    }
    Ok(())
}
