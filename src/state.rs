use crate::shared::errors::StateError;
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_STATE_ROOT_DIR: &str = ".admin-console";
pub const STATE_ROOT_ENV: &str = "ADMIN_CONSOLE_HOME";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatePaths {
    pub root: PathBuf,
}

impl StatePaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn required_directories(&self) -> Vec<PathBuf> {
        vec![self.root.join("logs"), self.root.join("session")]
    }

    pub fn settings_file(&self) -> PathBuf {
        self.root.join(crate::config::SETTINGS_FILE_NAME)
    }

    pub fn session_token_path(&self) -> PathBuf {
        self.root.join("session/token")
    }

    pub fn console_log_path(&self) -> PathBuf {
        self.root.join("logs/console.log")
    }
}

/// `$ADMIN_CONSOLE_HOME` when set, otherwise `~/.admin-console`.
pub fn default_state_root_path() -> Result<PathBuf, StateError> {
    if let Some(root) = std::env::var_os(STATE_ROOT_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(root));
    }
    let home = std::env::var_os("HOME").ok_or(StateError::HomeDirectoryUnavailable)?;
    Ok(PathBuf::from(home).join(DEFAULT_STATE_ROOT_DIR))
}

pub fn bootstrap_state_root(paths: &StatePaths) -> Result<(), StateError> {
    for path in paths.required_directories() {
        fs::create_dir_all(&path).map_err(|source| StateError::CreateDir {
            path: path.display().to_string(),
            source,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn bootstrap_creates_required_directories() {
        let dir = tempdir().expect("temp dir");
        let paths = StatePaths::new(dir.path().join("state"));
        bootstrap_state_root(&paths).expect("bootstrap succeeds");

        for required in paths.required_directories() {
            assert!(
                required.is_dir(),
                "missing directory: {}",
                required.display()
            );
        }
    }

    #[test]
    fn session_token_lives_under_session_dir() {
        let paths = StatePaths::new("/tmp/.admin-console");
        assert_eq!(
            paths.session_token_path(),
            PathBuf::from("/tmp/.admin-console/session/token")
        );
        assert_eq!(
            paths.settings_file(),
            PathBuf::from("/tmp/.admin-console/config.yaml")
        );
    }
}
