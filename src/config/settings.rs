use super::validate::{url_origin, validate_http_url};
use super::ConfigError;
use crate::workflows::WorkflowKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub api_endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graphql_endpoint: Option<String>,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_login_route")]
    pub login_route: String,
    #[serde(default)]
    pub polling: PollingIntervals,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PollingIntervals {
    #[serde(default = "default_snapshot_ms")]
    pub snapshot_backup_ms: u64,
    #[serde(default = "default_snapshot_ms")]
    pub snapshot_restore_ms: u64,
    #[serde(default = "default_task_ms")]
    pub update_check_ms: u64,
    #[serde(default = "default_task_ms")]
    pub airgap_install_ms: u64,
    #[serde(default = "default_task_ms")]
    pub upgrade_status_ms: u64,
    #[serde(default = "default_task_ms")]
    pub deploy_status_ms: u64,
    #[serde(default = "default_task_ms")]
    pub cluster_nodes_ms: u64,
}

impl Default for PollingIntervals {
    fn default() -> Self {
        Self {
            snapshot_backup_ms: default_snapshot_ms(),
            snapshot_restore_ms: default_snapshot_ms(),
            update_check_ms: default_task_ms(),
            airgap_install_ms: default_task_ms(),
            upgrade_status_ms: default_task_ms(),
            deploy_status_ms: default_task_ms(),
            cluster_nodes_ms: default_task_ms(),
        }
    }
}

impl PollingIntervals {
    pub fn interval(&self, kind: WorkflowKind) -> Duration {
        let ms = match kind {
            WorkflowKind::SnapshotBackup => self.snapshot_backup_ms,
            WorkflowKind::SnapshotRestore => self.snapshot_restore_ms,
            WorkflowKind::UpdateCheck => self.update_check_ms,
            WorkflowKind::AirgapInstall => self.airgap_install_ms,
            WorkflowKind::UpgradeStatus => self.upgrade_status_ms,
            WorkflowKind::DeployStatus => self.deploy_status_ms,
            WorkflowKind::ClusterNodes => self.cluster_nodes_ms,
        };
        Duration::from_millis(ms)
    }

    /// Same cadence for every workflow; handy for tests and scripted runs.
    pub fn uniform(ms: u64) -> Self {
        Self {
            snapshot_backup_ms: ms,
            snapshot_restore_ms: ms,
            update_check_ms: ms,
            airgap_install_ms: ms,
            upgrade_status_ms: ms,
            deploy_status_ms: ms,
            cluster_nodes_ms: ms,
        }
    }

    fn entries(&self) -> [(&'static str, u64); 7] {
        [
            ("snapshot_backup_ms", self.snapshot_backup_ms),
            ("snapshot_restore_ms", self.snapshot_restore_ms),
            ("update_check_ms", self.update_check_ms),
            ("airgap_install_ms", self.airgap_install_ms),
            ("upgrade_status_ms", self.upgrade_status_ms),
            ("deploy_status_ms", self.deploy_status_ms),
            ("cluster_nodes_ms", self.cluster_nodes_ms),
        ]
    }
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_login_route() -> String {
    "/secure-console".to_string()
}

fn default_snapshot_ms() -> u64 {
    2000
}

fn default_task_ms() -> u64 {
    1000
}

impl Settings {
    pub fn with_endpoint(api_endpoint: &str) -> Self {
        Self {
            api_endpoint: api_endpoint.to_string(),
            graphql_endpoint: None,
            request_timeout_ms: default_request_timeout_ms(),
            login_route: default_login_route(),
            polling: PollingIntervals::default(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_http_url("api_endpoint", &self.api_endpoint)?;
        if let Some(graphql) = &self.graphql_endpoint {
            validate_http_url("graphql_endpoint", graphql)?;
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::Settings(
                "`request_timeout_ms` must be > 0".to_string(),
            ));
        }
        if !self.login_route.starts_with('/') {
            return Err(ConfigError::Settings(format!(
                "`login_route` must start with `/`, got `{}`",
                self.login_route
            )));
        }
        for (field, value) in self.polling.entries() {
            if value == 0 {
                return Err(ConfigError::Settings(format!(
                    "`polling.{field}` must be > 0"
                )));
            }
        }
        Ok(())
    }

    pub fn api_base(&self) -> String {
        self.api_endpoint.trim().trim_end_matches('/').to_string()
    }

    pub fn resolve_graphql_endpoint(&self) -> String {
        match &self.graphql_endpoint {
            Some(endpoint) => endpoint.trim().trim_end_matches('/').to_string(),
            None => format!("{}/graphql", url_origin(&self.api_endpoint)),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
