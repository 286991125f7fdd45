//! Concrete console workflows built on the shared polling engine.

pub mod airgap_install;
pub mod apps;
pub mod cluster_nodes;
pub mod deploy_status;
pub mod license;
pub mod snapshot_backup;
pub mod snapshot_restore;
pub mod update_check;
pub mod upgrade_status;

use crate::api::ApiClient;
use crate::config::PollingIntervals;
use crate::polling::{StatusSource, WorkflowContext};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowKind {
    SnapshotBackup,
    SnapshotRestore,
    UpdateCheck,
    AirgapInstall,
    UpgradeStatus,
    DeployStatus,
    ClusterNodes,
}

impl WorkflowKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SnapshotBackup => "snapshot_backup",
            Self::SnapshotRestore => "snapshot_restore",
            Self::UpdateCheck => "update_check",
            Self::AirgapInstall => "airgap_install",
            Self::UpgradeStatus => "upgrade_status",
            Self::DeployStatus => "deploy_status",
            Self::ClusterNodes => "cluster_nodes",
        }
    }
}

impl std::fmt::Display for WorkflowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `{status, currentMessage}` payload of the backend's task endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub current_message: String,
}

impl TaskStatus {
    pub(crate) fn normalized(&self) -> String {
        self.status.trim().to_ascii_lowercase()
    }

    pub(crate) fn message(&self) -> Option<String> {
        Some(self.current_message.trim().to_string()).filter(|message| !message.is_empty())
    }
}

/// API client plus polling cadence; everything a workflow constructor needs.
#[derive(Debug, Clone)]
pub struct WorkflowEnv {
    pub api: ApiClient,
    pub intervals: PollingIntervals,
}

impl WorkflowEnv {
    pub fn new(api: ApiClient, intervals: PollingIntervals) -> Self {
        Self { api, intervals }
    }

    pub(crate) fn context(&self, kind: WorkflowKind) -> WorkflowContext {
        WorkflowContext {
            session: Arc::clone(self.api.session()),
            paths: self.api.paths().clone(),
            interval: self.intervals.interval(kind),
        }
    }

    pub(crate) fn get_source<S>(&self, path: String) -> StatusSource<S>
    where
        S: DeserializeOwned + Send + 'static,
    {
        let api = self.api.clone();
        Arc::new(move || api.get_json::<S>(&path))
    }
}
