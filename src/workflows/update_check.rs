use super::{TaskStatus, WorkflowEnv, WorkflowKind};
use crate::api::ApiError;
use crate::polling::{FailureReport, Phase, PollWorkflow, StatusInterpreter, TransitionHandler};
use crate::shared::ids::AppSlug;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCheckResponse {
    #[serde(default)]
    pub available_updates: u32,
    #[serde(default)]
    pub current_app_sequence: Option<i64>,
}

/// Version-history update checker: `running` until the download task goes `idle`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateCheckInterpreter;

impl StatusInterpreter for UpdateCheckInterpreter {
    type Status = TaskStatus;

    fn workflow(&self) -> &'static str {
        WorkflowKind::UpdateCheck.as_str()
    }

    fn phase(&self, status: &TaskStatus) -> Phase {
        match status.normalized().as_str() {
            "idle" => Phase::Succeeded,
            "failed" => Phase::Failed(FailureReport::new(
                status
                    .message()
                    .unwrap_or_else(|| "Update check failed".to_string()),
            )),
            _ => Phase::InProgress,
        }
    }

    fn message(&self, status: &TaskStatus) -> Option<String> {
        status.message()
    }
}

pub fn start_update_check(
    env: &WorkflowEnv,
    slug: &AppSlug,
) -> Result<UpdateCheckResponse, ApiError> {
    env.api.post_json(
        &format!("app/{}/updatecheck", slug.as_path_segment()),
        &serde_json::json!({}),
    )
}

/// `update_callback` runs once when the check settles successfully, typically
/// to refresh the version history.
pub fn update_check_workflow<F>(
    env: &WorkflowEnv,
    slug: &AppSlug,
    update_callback: F,
    transitions: TransitionHandler<TaskStatus>,
) -> PollWorkflow<UpdateCheckInterpreter>
where
    F: Fn(&TaskStatus) + Send + Sync + 'static,
{
    PollWorkflow::new(
        UpdateCheckInterpreter,
        env.get_source(format!(
            "app/{}/task/updatedownload",
            slug.as_path_segment()
        )),
        env.context(WorkflowKind::UpdateCheck),
        transitions.on_success(update_callback),
    )
}
