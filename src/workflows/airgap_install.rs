use super::{WorkflowEnv, WorkflowKind};
use crate::polling::{FailureReport, Phase, PollWorkflow, StatusInterpreter, TransitionHandler};
use crate::shared::ids::AppSlug;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirgapInstallStatus {
    #[serde(default)]
    pub install_status: String,
    #[serde(default)]
    pub current_message: String,
}

/// Progress of an uploaded airgap bundle being processed by the backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct AirgapInstallInterpreter;

impl StatusInterpreter for AirgapInstallInterpreter {
    type Status = AirgapInstallStatus;

    fn workflow(&self) -> &'static str {
        WorkflowKind::AirgapInstall.as_str()
    }

    fn phase(&self, status: &AirgapInstallStatus) -> Phase {
        match status.install_status.trim() {
            "installed" => Phase::Succeeded,
            "airgap_upload_error" | "upload_error" | "failed" => {
                let message = status.current_message.trim();
                Phase::Failed(FailureReport::new(if message.is_empty() {
                    "Airgap bundle install failed".to_string()
                } else {
                    message.to_string()
                }))
            }
            _ => Phase::InProgress,
        }
    }

    fn message(&self, status: &AirgapInstallStatus) -> Option<String> {
        Some(status.current_message.trim().to_string()).filter(|message| !message.is_empty())
    }
}

pub fn airgap_install_workflow(
    env: &WorkflowEnv,
    slug: &AppSlug,
    transitions: TransitionHandler<AirgapInstallStatus>,
) -> PollWorkflow<AirgapInstallInterpreter> {
    PollWorkflow::new(
        AirgapInstallInterpreter,
        env.get_source(format!(
            "app/{}/airgap/install/status",
            slug.as_path_segment()
        )),
        env.context(WorkflowKind::AirgapInstall),
        transitions,
    )
}
