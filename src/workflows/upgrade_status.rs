use super::{WorkflowEnv, WorkflowKind};
use crate::polling::{FailureReport, Phase, PollWorkflow, StatusInterpreter, TransitionHandler};
use crate::shared::ids::AppSlug;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub current_message: String,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UpgradeStatusInterpreter;

impl StatusInterpreter for UpgradeStatusInterpreter {
    type Status = UpgradeStatus;

    fn workflow(&self) -> &'static str {
        WorkflowKind::UpgradeStatus.as_str()
    }

    fn phase(&self, status: &UpgradeStatus) -> Phase {
        match status.status.trim().to_ascii_lowercase().as_str() {
            "upgraded" | "completed" => Phase::Succeeded,
            "upgrade-failed" | "failed" => {
                let message = status
                    .error
                    .clone()
                    .filter(|error| !error.trim().is_empty())
                    .or_else(|| {
                        Some(status.current_message.trim().to_string())
                            .filter(|message| !message.is_empty())
                    })
                    .unwrap_or_else(|| "Upgrade failed".to_string());
                Phase::Failed(FailureReport::new(message))
            }
            _ => Phase::InProgress,
        }
    }

    fn message(&self, status: &UpgradeStatus) -> Option<String> {
        Some(status.current_message.trim().to_string()).filter(|message| !message.is_empty())
    }
}

pub fn upgrade_status_workflow(
    env: &WorkflowEnv,
    slug: &AppSlug,
    transitions: TransitionHandler<UpgradeStatus>,
) -> PollWorkflow<UpgradeStatusInterpreter> {
    PollWorkflow::new(
        UpgradeStatusInterpreter,
        env.get_source(format!(
            "app/{}/task/upgrade-status",
            slug.as_path_segment()
        )),
        env.context(WorkflowKind::UpgradeStatus),
        transitions,
    )
}
