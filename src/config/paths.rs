use crate::config::ConfigError;
use crate::state::{default_state_root_path, StatePaths};
use std::path::PathBuf;

pub const SETTINGS_FILE_NAME: &str = "config.yaml";
pub const API_ENDPOINT_ENV: &str = "ADMIN_CONSOLE_API_ENDPOINT";

pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let root = default_state_root_path().map_err(|_| ConfigError::HomeDirectoryUnavailable)?;
    Ok(StatePaths::new(root).settings_file())
}
