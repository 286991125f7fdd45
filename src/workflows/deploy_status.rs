use super::{TaskStatus, WorkflowEnv, WorkflowKind};
use crate::api::{ActionResponse, ApiError};
use crate::polling::{FailureReport, Phase, PollWorkflow, StatusInterpreter, TransitionHandler};
use crate::shared::ids::AppSlug;

/// Deploy of one version-history sequence, including its preflight stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeployStatusInterpreter;

impl StatusInterpreter for DeployStatusInterpreter {
    type Status = TaskStatus;

    fn workflow(&self) -> &'static str {
        WorkflowKind::DeployStatus.as_str()
    }

    fn phase(&self, status: &TaskStatus) -> Phase {
        match status.normalized().as_str() {
            "deployed" => Phase::Succeeded,
            "failed" => Phase::Failed(FailureReport::new(
                status
                    .message()
                    .unwrap_or_else(|| "Deployment failed".to_string()),
            )),
            _ => Phase::InProgress,
        }
    }

    fn message(&self, status: &TaskStatus) -> Option<String> {
        let message = status.message();
        match status.normalized().as_str() {
            "pending_preflight" => message.or_else(|| Some("Running preflight checks".to_string())),
            "deploying" => message.or_else(|| Some("Deploying".to_string())),
            _ => message,
        }
    }
}

pub fn deploy_version(env: &WorkflowEnv, slug: &AppSlug, sequence: u64) -> Result<(), ApiError> {
    let response: ActionResponse = env.api.post_json(
        &format!("app/{}/sequence/{sequence}/deploy", slug.as_path_segment()),
        &serde_json::json!({}),
    )?;
    response.into_result("deploy version")
}

pub fn deploy_status_workflow(
    env: &WorkflowEnv,
    slug: &AppSlug,
    sequence: u64,
    transitions: TransitionHandler<TaskStatus>,
) -> PollWorkflow<DeployStatusInterpreter> {
    PollWorkflow::new(
        DeployStatusInterpreter,
        env.get_source(format!(
            "app/{}/sequence/{sequence}/task/status",
            slug.as_path_segment()
        )),
        env.context(WorkflowKind::DeployStatus),
        transitions,
    )
}
