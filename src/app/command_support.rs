use crate::api::{ApiClient, ApiError};
use crate::config::{load_global_settings, ConfigError};
use crate::polling::{PollWorkflow, StatusInterpreter, WorkflowSnapshot, WorkflowState};
use crate::session::SessionContext;
use crate::shared::ids::AppSlug;
use crate::state::{bootstrap_state_root, default_state_root_path, StatePaths};
use crate::workflows::WorkflowEnv;
use std::sync::{Arc, Mutex};

pub fn map_config_err(err: ConfigError) -> String {
    err.to_string()
}

pub fn ensure_state_root() -> Result<StatePaths, String> {
    let root = default_state_root_path().map_err(|e| e.to_string())?;
    let paths = StatePaths::new(root);
    bootstrap_state_root(&paths).map_err(|e| e.to_string())?;
    Ok(paths)
}

pub fn parse_slug(raw: &str) -> Result<AppSlug, String> {
    AppSlug::parse(raw)
}

/// Everything a command needs to talk to the backend.
pub struct Console {
    pub session: Arc<SessionContext>,
    pub env: WorkflowEnv,
    redirect: Arc<Mutex<Option<String>>>,
}

impl Console {
    pub fn load() -> Result<Self, String> {
        let paths = ensure_state_root()?;
        let settings = load_global_settings().map_err(map_config_err)?;
        let session = Arc::new(
            SessionContext::load(paths.clone(), settings.login_route.clone())
                .map_err(|e| e.to_string())?,
        );
        if !session.is_authenticated() {
            return Err(format!(
                "not logged in. remediation: run `admin-console login <token>`\nredirect={}",
                session.login_route()
            ));
        }

        let redirect = Arc::new(Mutex::new(None));
        let seen = Arc::clone(&redirect);
        session.on_logout(move |route| {
            if let Ok(mut slot) = seen.lock() {
                *slot = Some(route.to_string());
            }
        });

        let api = ApiClient::new(&settings, Arc::clone(&session), paths);
        let env = WorkflowEnv::new(api, settings.polling.clone());
        Ok(Self {
            session,
            env,
            redirect,
        })
    }

    /// Login route recorded by the logout listener, if the session ended.
    pub fn redirect(&self) -> Option<String> {
        self.redirect.lock().ok().and_then(|slot| slot.clone())
    }

    pub fn api_err(&self, err: ApiError) -> String {
        self.with_redirect(err.to_string())
    }

    fn with_redirect(&self, message: String) -> String {
        match self.redirect() {
            Some(route) => format!("{message}\nsession=ended\nredirect={route}"),
            None => message,
        }
    }

    /// Runs `workflow` to a terminal state and renders the outcome.
    pub fn watch_workflow<I: StatusInterpreter>(
        &self,
        workflow: &PollWorkflow<I>,
        mut lines: Vec<String>,
    ) -> Result<String, String> {
        workflow.start();
        let mut progress: Vec<String> = Vec::new();
        let snapshot = workflow.watch(None, |snapshot| {
            if let Some(message) = &snapshot.view.message {
                if progress.last() != Some(message) {
                    progress.push(message.clone());
                }
            }
        });
        workflow.stop();

        lines.extend(progress.into_iter().map(|message| format!("progress={message}")));
        lines.extend(render_snapshot(workflow.workflow(), &snapshot));
        match snapshot.state {
            WorkflowState::Succeeded => Ok(lines.join("\n")),
            WorkflowState::Failed => Err(lines.join("\n")),
            WorkflowState::Idle | WorkflowState::Polling => {
                let reason = snapshot
                    .view
                    .error_message
                    .clone()
                    .unwrap_or_else(|| "workflow stopped".to_string());
                lines.push(format!("error={reason}"));
                Err(self.with_redirect(lines.join("\n")))
            }
        }
    }
}

pub fn render_snapshot<S>(workflow: &str, snapshot: &WorkflowSnapshot<S>) -> Vec<String> {
    let view = &snapshot.view;
    let mut lines = vec![
        format!("workflow={workflow}"),
        format!("state={}", snapshot.state),
        format!("ticks={}", view.ticks),
    ];
    if let Some(message) = &view.message {
        lines.push(format!("message={message}"));
    }
    if let Some(report) = &view.failure {
        lines.push(format!("failure={}", report.message));
        if !report.warnings.is_empty() {
            lines.push(format!("warnings={}", report.warnings.join(" | ")));
        }
        if !report.errors.is_empty() {
            lines.push(format!("errors={}", report.errors.join(" | ")));
        }
        lines.push(format!("guidance={}", report.guidance()));
    }
    lines
}
