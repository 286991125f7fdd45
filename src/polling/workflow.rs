use super::{
    CancelToken, FailureReport, Phase, PollRepeater, StatusInterpreter, TransitionHandler,
    ViewState,
};
use crate::session::SessionContext;
use crate::shared::errors::ApiError;
use crate::shared::logging::append_console_log;
use crate::state::StatePaths;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

/// Fetches the latest status payload for one workflow instance.
pub type StatusSource<S> = Arc<dyn Fn() -> Result<S, ApiError> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    Idle,
    Polling,
    Succeeded,
    Failed,
}

impl WorkflowState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Polling => "polling",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("workflow `{workflow}` cannot be retried from state `{state}`")]
    NotRetryable {
        workflow: &'static str,
        state: WorkflowState,
    },
}

#[derive(Debug, Clone)]
pub struct WorkflowSnapshot<S> {
    pub state: WorkflowState,
    pub view: ViewState<S>,
    pub run: u64,
}

/// Shared collaborators every workflow instance needs.
#[derive(Debug, Clone)]
pub struct WorkflowContext {
    pub session: Arc<SessionContext>,
    pub paths: StatePaths,
    pub interval: Duration,
}

struct Shared<I: StatusInterpreter> {
    interpreter: I,
    source: StatusSource<I::Status>,
    session: Arc<SessionContext>,
    transitions: TransitionHandler<I::Status>,
    paths: StatePaths,
    current: Mutex<WorkflowSnapshot<I::Status>>,
}

/// One polling workflow: repeater, interpreter and transition handler wired together.
///
/// State machine: `Idle -> Polling -> {Succeeded, Failed}`; a 401 returns the
/// workflow to `Idle` and ends the session; `stop` always returns to `Idle`
/// without side effects; `retry` restarts a failed workflow from a clean view.
pub struct PollWorkflow<I: StatusInterpreter> {
    shared: Arc<Shared<I>>,
    repeater: PollRepeater,
    interval: Duration,
}

impl<I: StatusInterpreter> std::fmt::Debug for PollWorkflow<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollWorkflow")
            .field("workflow", &self.shared.interpreter.workflow())
            .field("state", &self.state())
            .field("interval", &self.interval)
            .finish()
    }
}

impl<I: StatusInterpreter> PollWorkflow<I> {
    pub fn new(
        interpreter: I,
        source: StatusSource<I::Status>,
        context: WorkflowContext,
        transitions: TransitionHandler<I::Status>,
    ) -> Self {
        let repeater = PollRepeater::new(interpreter.workflow(), context.paths.clone());
        Self {
            shared: Arc::new(Shared {
                interpreter,
                source,
                session: context.session,
                transitions,
                paths: context.paths,
                current: Mutex::new(WorkflowSnapshot {
                    state: WorkflowState::Idle,
                    view: ViewState::default(),
                    run: 0,
                }),
            }),
            repeater,
            interval: context.interval,
        }
    }

    pub fn workflow(&self) -> &'static str {
        self.shared.interpreter.workflow()
    }

    /// Begins a fresh run. A run already in flight is superseded, not duplicated.
    pub fn start(&self) {
        let mut current = self.shared.lock_current();
        current.run = current.run.saturating_add(1);
        current.state = WorkflowState::Polling;
        current.view = ViewState::loading();
        let run = current.run;

        let shared = Arc::clone(&self.shared);
        self.repeater
            .start(self.interval, move |token| shared.tick(run, token));
        drop(current);

        append_console_log(
            &self.shared.paths,
            "info",
            "workflow.started",
            &format!("workflow={} run={run}", self.workflow()),
        );
    }

    /// Unmount: stops polling and returns to `Idle` without firing side effects.
    pub fn stop(&self) {
        let mut current = self.shared.lock_current();
        self.repeater.stop();
        current.state = WorkflowState::Idle;
        current.view.loading = false;
    }

    /// "Try again" from the failure view.
    pub fn retry(&self) -> Result<(), WorkflowError> {
        let state = self.state();
        if state != WorkflowState::Failed {
            return Err(WorkflowError::NotRetryable {
                workflow: self.workflow(),
                state,
            });
        }
        self.start();
        Ok(())
    }

    pub fn state(&self) -> WorkflowState {
        self.shared.lock_current().state
    }

    pub fn view(&self) -> ViewState<I::Status> {
        self.shared.lock_current().view.clone()
    }

    pub fn snapshot(&self) -> WorkflowSnapshot<I::Status> {
        self.shared.lock_current().clone()
    }

    pub fn is_running(&self) -> bool {
        self.repeater.is_running()
    }

    /// Blocks until the workflow leaves `Polling` or `timeout` elapses.
    pub fn wait_while_polling(&self, timeout: Option<Duration>) -> WorkflowSnapshot<I::Status> {
        self.watch(timeout, |_| {})
    }

    /// Like [`Self::wait_while_polling`], handing every observed snapshot to `observer`.
    pub fn watch<F>(
        &self,
        timeout: Option<Duration>,
        mut observer: F,
    ) -> WorkflowSnapshot<I::Status>
    where
        F: FnMut(&WorkflowSnapshot<I::Status>),
    {
        let deadline = timeout.map(|timeout| Instant::now() + timeout);
        let step = self
            .interval
            .clamp(Duration::from_millis(5), Duration::from_millis(100));
        loop {
            let snapshot = self.snapshot();
            observer(&snapshot);
            if snapshot.state != WorkflowState::Polling {
                return snapshot;
            }
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                return snapshot;
            }
            thread::sleep(step);
        }
    }
}

impl<I: StatusInterpreter> Drop for PollWorkflow<I> {
    fn drop(&mut self) {
        self.repeater.stop();
    }
}

enum Settled<S> {
    Succeeded(S),
    Failed(FailureReport),
    Unauthorized(String),
}

impl<I: StatusInterpreter> Shared<I> {
    fn lock_current(&self) -> MutexGuard<'_, WorkflowSnapshot<I::Status>> {
        match self.current.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn tick(&self, run: u64, token: &CancelToken) -> Result<(), String> {
        let fetched = (self.source)();
        let workflow = self.interpreter.workflow();

        let mut current = self.lock_current();
        // The run was stopped or superseded while this request was in flight.
        if token.is_cancelled() || current.run != run {
            return Ok(());
        }

        let settled = match fetched {
            Ok(status) => {
                let phase = self.interpreter.phase(&status);
                let message = self.interpreter.message(&status);
                current.view.apply_status(status.clone(), message);
                match phase {
                    Phase::InProgress => None,
                    Phase::Succeeded => {
                        current.state = WorkflowState::Succeeded;
                        current.view.mark_succeeded();
                        Some(Settled::Succeeded(status))
                    }
                    Phase::Failed(report) => {
                        current.state = WorkflowState::Failed;
                        current.view.mark_failed(report.clone());
                        Some(Settled::Failed(report))
                    }
                }
            }
            Err(err) if err.is_unauthorized() => {
                current.state = WorkflowState::Idle;
                current.view.apply_error(err.to_string());
                Some(Settled::Unauthorized(err.to_string()))
            }
            // Transient: surface it and keep polling; the repeater logs the error.
            Err(err) => {
                let message = err.to_string();
                current.view.apply_error(message.clone());
                return Err(format!("run={run} {message}"));
            }
        };

        let Some(settled) = settled else {
            return Ok(());
        };
        token.cancel();
        drop(current);

        match settled {
            Settled::Succeeded(status) => {
                append_console_log(
                    &self.paths,
                    "info",
                    "workflow.succeeded",
                    &format!("workflow={workflow} run={run}"),
                );
                self.transitions.fire_success(run, &status);
            }
            Settled::Failed(report) => {
                append_console_log(
                    &self.paths,
                    "warn",
                    "workflow.failed",
                    &format!("workflow={workflow} run={run} {}", report.message),
                );
                self.transitions.fire_failure(run, &report);
            }
            Settled::Unauthorized(message) => {
                append_console_log(
                    &self.paths,
                    "warn",
                    "workflow.unauthorized",
                    &format!("workflow={workflow} run={run} {message}"),
                );
                self.session.logout(workflow);
            }
        }
        Ok(())
    }
}
