mod support;

use admin_console::api::ApiError;
use admin_console::polling::{
    FailureReport, Phase, PollWorkflow, StatusInterpreter, StatusSource, TransitionHandler,
    WorkflowContext, WorkflowError, WorkflowState,
};
use admin_console::session::SessionContext;
use admin_console::state::StatePaths;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use support::wait_until;
use tempfile::{tempdir, TempDir};

const INTERVAL: Duration = Duration::from_millis(15);
const WAIT: Option<Duration> = Some(Duration::from_secs(3));

#[derive(Debug, Clone, Copy)]
struct JobInterpreter;

impl StatusInterpreter for JobInterpreter {
    type Status = String;

    fn workflow(&self) -> &'static str {
        "test_job"
    }

    fn phase(&self, status: &String) -> Phase {
        match status.as_str() {
            "done" => Phase::Succeeded,
            "failed" => Phase::Failed(
                FailureReport::new("job failed").with_errors(vec!["disk full".to_string()]),
            ),
            _ => Phase::InProgress,
        }
    }

    fn message(&self, status: &String) -> Option<String> {
        Some(format!("job is {status}"))
    }
}

struct Harness {
    _temp: TempDir,
    paths: StatePaths,
    session: Arc<SessionContext>,
    fetches: Arc<AtomicUsize>,
    successes: Arc<AtomicUsize>,
    failures: Arc<AtomicUsize>,
}

impl Harness {
    fn new() -> Self {
        let temp = tempdir().expect("tempdir");
        let paths = StatePaths::new(temp.path());
        let session = Arc::new(SessionContext::new(paths.clone(), "/secure-console"));
        session.set_token("test-token").expect("set token");
        Self {
            _temp: temp,
            paths,
            session,
            fetches: Arc::new(AtomicUsize::new(0)),
            successes: Arc::new(AtomicUsize::new(0)),
            failures: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Replays `script` one entry per fetch, repeating the last entry forever.
    fn workflow(
        &self,
        script: Vec<Result<&'static str, ApiError>>,
    ) -> PollWorkflow<JobInterpreter> {
        let fetches = Arc::clone(&self.fetches);
        let source: StatusSource<String> = Arc::new(move || {
            let index = fetches.fetch_add(1, Ordering::SeqCst).min(script.len() - 1);
            script[index].clone().map(str::to_string)
        });
        self.workflow_with_source(source)
    }

    fn workflow_with_source(&self, source: StatusSource<String>) -> PollWorkflow<JobInterpreter> {
        let successes = Arc::clone(&self.successes);
        let failures = Arc::clone(&self.failures);
        PollWorkflow::new(
            JobInterpreter,
            source,
            WorkflowContext {
                session: Arc::clone(&self.session),
                paths: self.paths.clone(),
                interval: INTERVAL,
            },
            TransitionHandler::new()
                .on_success(move |_| {
                    successes.fetch_add(1, Ordering::SeqCst);
                })
                .on_failure(move |_| {
                    failures.fetch_add(1, Ordering::SeqCst);
                }),
        )
    }

    fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

fn bad_gateway() -> ApiError {
    ApiError::Status {
        url: "http://console/api/v1/job".to_string(),
        status: 502,
        message: "502 Bad Gateway".to_string(),
    }
}

fn unauthorized() -> ApiError {
    ApiError::Unauthorized {
        url: "http://console/api/v1/job".to_string(),
    }
}

#[test]
fn terminal_success_stops_polling_and_fires_once() {
    let harness = Harness::new();
    let workflow = harness.workflow(vec![Ok("running"), Ok("running"), Ok("done")]);
    assert_eq!(workflow.state(), WorkflowState::Idle);

    workflow.start();
    let snapshot = workflow.wait_while_polling(WAIT);
    assert_eq!(snapshot.state, WorkflowState::Succeeded);
    assert_eq!(snapshot.view.status.as_deref(), Some("done"));
    assert_eq!(snapshot.view.message.as_deref(), Some("job is done"));
    assert!(snapshot.view.is_terminal);
    assert_eq!(snapshot.view.ticks, 3);

    thread::sleep(INTERVAL * 6);
    assert_eq!(harness.fetches(), 3);
    assert_eq!(harness.successes.load(Ordering::SeqCst), 1);
    assert_eq!(harness.failures.load(Ordering::SeqCst), 0);
    assert!(!workflow.is_running());
}

#[test]
fn terminal_failure_carries_report_and_retry_restarts() {
    let harness = Harness::new();
    let workflow = harness.workflow(vec![Ok("failed"), Ok("running"), Ok("done")]);

    assert!(matches!(
        workflow.retry(),
        Err(WorkflowError::NotRetryable {
            state: WorkflowState::Idle,
            ..
        })
    ));

    workflow.start();
    let failed = workflow.wait_while_polling(WAIT);
    assert_eq!(failed.state, WorkflowState::Failed);
    let report = failed.view.failure.clone().expect("failure report");
    assert_eq!(report.message, "job failed");
    assert_eq!(report.errors, vec!["disk full".to_string()]);
    assert_eq!(harness.failures.load(Ordering::SeqCst), 1);

    workflow.retry().expect("retry from failed");
    let retried = workflow.wait_while_polling(WAIT);
    assert_eq!(retried.state, WorkflowState::Succeeded);
    assert_eq!(retried.run, failed.run + 1);
    assert!(retried.view.failure.is_none());
    assert_eq!(retried.view.ticks, 2);
    assert_eq!(harness.successes.load(Ordering::SeqCst), 1);
    assert_eq!(harness.failures.load(Ordering::SeqCst), 1);
}

#[test]
fn unauthorized_ends_session_and_polling() {
    let harness = Harness::new();
    let redirects = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&redirects);
    harness.session.on_logout(move |route| {
        seen.lock().expect("redirects").push(route.to_string());
    });

    let workflow = harness.workflow(vec![Ok("running"), Ok("running"), Err(unauthorized())]);
    workflow.start();
    let snapshot = workflow.wait_while_polling(WAIT);
    assert_eq!(snapshot.state, WorkflowState::Idle);
    assert!(snapshot.view.error_message.is_some());

    thread::sleep(INTERVAL * 6);
    assert_eq!(harness.fetches(), 3);
    assert!(!harness.session.is_authenticated());
    assert!(!harness.paths.session_token_path().exists());
    assert_eq!(
        *redirects.lock().expect("redirects"),
        vec!["/secure-console".to_string()]
    );
    assert_eq!(harness.successes.load(Ordering::SeqCst), 0);
    assert_eq!(harness.failures.load(Ordering::SeqCst), 0);
}

#[test]
fn transient_errors_are_surfaced_and_polling_continues() {
    let harness = Harness::new();
    let workflow = harness.workflow(vec![
        Err(bad_gateway()),
        Err(ApiError::Transport {
            url: "http://console/api/v1/job".to_string(),
            reason: "connection refused".to_string(),
        }),
        Ok("running"),
        Ok("done"),
    ]);

    workflow.start();
    let snapshot = workflow.wait_while_polling(WAIT);
    assert_eq!(snapshot.state, WorkflowState::Succeeded);
    assert_eq!(snapshot.view.ticks, 4);
    assert!(snapshot.view.error_message.is_none());
    assert_eq!(harness.successes.load(Ordering::SeqCst), 1);
    assert!(harness.session.is_authenticated());

    let log = fs::read_to_string(harness.paths.console_log_path()).expect("console log");
    assert!(log.contains("\"poll.tick.error\""), "log:\n{log}");
    assert!(log.contains("connection refused"), "log:\n{log}");
}

#[test]
fn stop_discards_responses_still_in_flight() {
    let harness = Harness::new();
    let fetches = Arc::clone(&harness.fetches);
    let workflow = harness.workflow_with_source(Arc::new(move || {
        fetches.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(150));
        Ok("done".to_string())
    }));

    workflow.start();
    assert!(wait_until(Duration::from_secs(1), || harness.fetches() == 1));
    workflow.stop();
    assert_eq!(workflow.state(), WorkflowState::Idle);

    thread::sleep(Duration::from_millis(300));
    let snapshot = workflow.snapshot();
    assert_eq!(snapshot.state, WorkflowState::Idle);
    assert!(snapshot.view.status.is_none());
    assert!(!snapshot.view.loading);
    assert_eq!(harness.successes.load(Ordering::SeqCst), 0);
    assert_eq!(harness.fetches(), 1);
}

#[test]
fn restarting_supersedes_the_previous_run() {
    let harness = Harness::new();
    let workflow = harness.workflow(vec![Ok("running")]);
    workflow.start();
    workflow.start();
    assert!(wait_until(Duration::from_secs(1), || workflow.view().ticks >= 2));

    let snapshot = workflow.snapshot();
    assert_eq!(snapshot.run, 2);
    assert_eq!(snapshot.state, WorkflowState::Polling);
    workflow.stop();
    assert_eq!(workflow.state(), WorkflowState::Idle);
}

#[test]
fn persistent_backend_errors_keep_the_workflow_polling() {
    let harness = Harness::new();
    let workflow = harness.workflow(vec![Err(bad_gateway())]);
    workflow.start();

    assert!(wait_until(Duration::from_secs(2), || harness.fetches() >= 3));
    let view = workflow.view();
    assert_eq!(workflow.state(), WorkflowState::Polling);
    assert!(!view.loading);
    assert!(
        view.error_message
            .as_deref()
            .is_some_and(|message| message.contains("HTTP 502")),
        "view: {view:?}"
    );
    workflow.stop();
}
