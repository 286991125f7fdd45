use super::{default_config_path, ConfigError, Settings, API_ENDPOINT_ENV};
use std::path::Path;

pub fn load_global_settings() -> Result<Settings, ConfigError> {
    let path = default_config_path()?;
    load_settings(&path)
}

/// Reads settings from `path`, applies the endpoint env override, then validates.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::Missing {
            path: path.display().to_string(),
        });
    }
    let mut settings = Settings::from_path(path)?;
    apply_env_overrides(&mut settings);
    settings.validate()?;
    Ok(settings)
}

pub fn apply_env_overrides(settings: &mut Settings) {
    if let Some(endpoint) = std::env::var(API_ENDPOINT_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
    {
        settings.api_endpoint = endpoint.trim().to_string();
    }
}
