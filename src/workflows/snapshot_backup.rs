use super::{WorkflowEnv, WorkflowKind};
use crate::api::{ActionResponse, ApiError};
use crate::polling::{FailureReport, Phase, PollWorkflow, StatusInterpreter, TransitionHandler};
use crate::shared::ids::{AppSlug, BackupName};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupStatus {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub volume_count: u32,
    #[serde(default)]
    pub volume_success_count: u32,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub errors: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartBackupResponse {
    #[serde(flatten)]
    action: ActionResponse,
    #[serde(default)]
    backup_name: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BackupInterpreter;

impl StatusInterpreter for BackupInterpreter {
    type Status = BackupStatus;

    fn workflow(&self) -> &'static str {
        WorkflowKind::SnapshotBackup.as_str()
    }

    fn phase(&self, status: &BackupStatus) -> Phase {
        match status.status.trim() {
            "Completed" => Phase::Succeeded,
            phase @ ("PartiallyFailed" | "Failed" | "FailedValidation") => Phase::Failed(
                FailureReport::new(format!("Backup {phase}"))
                    .with_warnings(status.warnings.clone())
                    .with_errors(status.errors.clone()),
            ),
            _ => Phase::InProgress,
        }
    }

    fn message(&self, status: &BackupStatus) -> Option<String> {
        let phase = match status.status.trim() {
            "" => "New",
            phase => phase,
        };
        if status.volume_count == 0 {
            return Some(format!("Backup {phase}"));
        }
        Some(format!(
            "Backup {phase}: {}/{} volumes",
            status.volume_success_count, status.volume_count
        ))
    }
}

/// Starts an application backup and returns the backup the backend created.
pub fn start_backup(env: &WorkflowEnv, slug: &AppSlug) -> Result<BackupName, ApiError> {
    let response: StartBackupResponse = env.api.post_json(
        &format!("app/{}/snapshot/backup", slug.as_path_segment()),
        &serde_json::json!({}),
    )?;
    response.action.into_result("start backup")?;
    let raw = response.backup_name.unwrap_or_default();
    BackupName::parse(&raw).map_err(|err| ApiError::Action {
        action: "start backup".to_string(),
        message: format!("backend returned an unusable backup name: {err}"),
    })
}

pub fn backup_workflow(
    env: &WorkflowEnv,
    slug: &AppSlug,
    backup: &BackupName,
    transitions: TransitionHandler<BackupStatus>,
) -> PollWorkflow<BackupInterpreter> {
    PollWorkflow::new(
        BackupInterpreter,
        env.get_source(format!(
            "app/{}/snapshot/{}",
            slug.as_path_segment(),
            backup.as_path_segment()
        )),
        env.context(WorkflowKind::SnapshotBackup),
        transitions,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backup(status: &str) -> BackupStatus {
        BackupStatus {
            name: "instance-x7k2p".to_string(),
            status: status.to_string(),
            volume_count: 4,
            volume_success_count: 2,
            warnings: Vec::new(),
            errors: vec!["volume pvc-1 failed".to_string()],
        }
    }

    #[test]
    fn phases_map_to_workflow_outcomes() {
        assert_eq!(BackupInterpreter.phase(&backup("InProgress")), Phase::InProgress);
        assert_eq!(BackupInterpreter.phase(&backup("")), Phase::InProgress);
        assert_eq!(BackupInterpreter.phase(&backup("Completed")), Phase::Succeeded);

        let Phase::Failed(report) = BackupInterpreter.phase(&backup("PartiallyFailed")) else {
            panic!("expected failure");
        };
        assert_eq!(report.message, "Backup PartiallyFailed");
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn message_reports_volume_progress() {
        assert_eq!(
            BackupInterpreter.message(&backup("InProgress")).as_deref(),
            Some("Backup InProgress: 2/4 volumes")
        );
        let mut fresh = backup("");
        fresh.volume_count = 0;
        assert_eq!(BackupInterpreter.message(&fresh).as_deref(), Some("Backup New"));
    }

    #[test]
    fn start_response_reads_backup_name() {
        let response: StartBackupResponse =
            serde_json::from_str(r#"{"success":true,"backupName":"instance-x7k2p"}"#)
                .expect("json");
        assert!(response.action.success);
        assert_eq!(response.backup_name.as_deref(), Some("instance-x7k2p"));
    }
}
