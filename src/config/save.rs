use super::{ConfigError, Settings};
use crate::shared::fs_atomic::atomic_write_file;
use std::path::Path;

pub fn save_settings(path: &Path, settings: &Settings) -> Result<(), ConfigError> {
    settings.validate()?;
    let body = serde_yaml::to_string(settings).map_err(|source| ConfigError::Encode {
        path: path.display().to_string(),
        source,
    })?;
    atomic_write_file(path, body.as_bytes()).map_err(|source| ConfigError::Write {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_settings;
    use tempfile::tempdir;

    #[test]
    fn saved_settings_load_back_with_defaults() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("config.yaml");
        let settings = Settings::with_endpoint("http://localhost:8800/api/v1");
        save_settings(&path, &settings).expect("save");

        let loaded = load_settings(&path).expect("load");
        assert_eq!(loaded.api_endpoint, "http://localhost:8800/api/v1");
        assert_eq!(loaded.polling.snapshot_restore_ms, 2000);
        assert_eq!(loaded.login_route, "/secure-console");
    }

    #[test]
    fn invalid_settings_are_not_written() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("config.yaml");
        let settings = Settings::with_endpoint("localhost:8800");
        let err = save_settings(&path, &settings).expect_err("invalid endpoint");
        assert!(err.to_string().contains("api_endpoint"));
        assert!(!path.exists());
    }
}
