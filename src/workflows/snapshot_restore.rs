use super::{WorkflowEnv, WorkflowKind};
use crate::api::{ActionResponse, ApiError};
use crate::polling::{FailureReport, Phase, PollWorkflow, StatusInterpreter, TransitionHandler};
use crate::shared::ids::{AppSlug, BackupName};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RestoreIssue {
    #[serde(default)]
    pub resource: Option<String>,
    pub message: String,
}

impl std::fmt::Display for RestoreIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.resource.as_deref().filter(|r| !r.is_empty()) {
            Some(resource) => write!(f, "{resource}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreDetail {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phase: String,
    #[serde(default)]
    pub warnings: Vec<RestoreIssue>,
    #[serde(default)]
    pub errors: Vec<RestoreIssue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub restore_detail: Option<RestoreDetail>,
}

impl RestoreStatus {
    /// Velero restore phase. Without detail the top-level status decides,
    /// and a restore with neither is still `New`.
    pub fn phase(&self) -> &str {
        if let Some(phase) = self
            .restore_detail
            .as_ref()
            .map(|detail| detail.phase.trim())
            .filter(|phase| !phase.is_empty())
        {
            return phase;
        }
        match self.status.trim().to_ascii_lowercase().as_str() {
            "completed" => "Completed",
            "failed" => "Failed",
            "partiallyfailed" => "PartiallyFailed",
            "failedvalidation" => "FailedValidation",
            "inprogress" | "running" => "InProgress",
            _ => "New",
        }
    }

    fn backend_error(&self) -> Option<&str> {
        self.error
            .as_deref()
            .map(str::trim)
            .filter(|error| !error.is_empty())
    }

    fn issues(&self) -> (Vec<String>, Vec<String>) {
        match &self.restore_detail {
            Some(detail) => (
                detail.warnings.iter().map(ToString::to_string).collect(),
                detail.errors.iter().map(ToString::to_string).collect(),
            ),
            None => (Vec::new(), Vec::new()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RestoreInterpreter;

impl StatusInterpreter for RestoreInterpreter {
    type Status = RestoreStatus;

    fn workflow(&self) -> &'static str {
        WorkflowKind::SnapshotRestore.as_str()
    }

    fn phase(&self, status: &RestoreStatus) -> Phase {
        let (warnings, errors) = status.issues();
        match status.phase() {
            "Completed" if warnings.is_empty() && errors.is_empty() => Phase::Succeeded,
            "Completed" => Phase::Failed(
                FailureReport::new(format!(
                    "Restore completed with {} warning(s) and {} error(s)",
                    warnings.len(),
                    errors.len()
                ))
                .with_warnings(warnings)
                .with_errors(errors),
            ),
            "PartiallyFailed" => Phase::Failed(
                FailureReport::new(
                    status
                        .backend_error()
                        .unwrap_or("Restore partially failed"),
                )
                .with_warnings(warnings)
                .with_errors(errors),
            ),
            "Failed" | "FailedValidation" => Phase::Failed(
                FailureReport::new(
                    status
                        .backend_error()
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("Restore {}", status.phase())),
                )
                .with_warnings(warnings)
                .with_errors(errors),
            ),
            _ => Phase::InProgress,
        }
    }

    fn message(&self, status: &RestoreStatus) -> Option<String> {
        let message = match status.phase() {
            "New" => "Preparing restore".to_string(),
            "InProgress" => "Restore in progress".to_string(),
            "Completed" => "Restore completed".to_string(),
            other => format!("Restore phase: {other}"),
        };
        Some(message)
    }
}

/// Route the console redirects to once a restore completes cleanly.
pub fn restore_completed_route(slug: &AppSlug) -> String {
    format!("/app/{}/snapshots/restore-completed", slug.as_path_segment())
}

pub fn start_restore(
    env: &WorkflowEnv,
    slug: &AppSlug,
    backup: &BackupName,
) -> Result<(), ApiError> {
    let response: ActionResponse = env.api.post_json(
        &format!(
            "app/{}/snapshot/restore/{}",
            slug.as_path_segment(),
            backup.as_path_segment()
        ),
        &serde_json::json!({}),
    )?;
    response.into_result("start restore")
}

pub fn restore_workflow(
    env: &WorkflowEnv,
    slug: &AppSlug,
    transitions: TransitionHandler<RestoreStatus>,
) -> PollWorkflow<RestoreInterpreter> {
    PollWorkflow::new(
        RestoreInterpreter,
        env.get_source(format!(
            "app/{}/snapshot/restore/status",
            slug.as_path_segment()
        )),
        env.context(WorkflowKind::SnapshotRestore),
        transitions,
    )
}
