use super::FailureReport;
use std::sync::atomic::{AtomicU64, Ordering};

type SuccessCallback<S> = Box<dyn Fn(&S) + Send + Sync>;
type FailureCallback = Box<dyn Fn(&FailureReport) + Send + Sync>;

/// Side effects for a workflow's terminal states.
///
/// Each callback fires at most once per polling run; a run that is older than
/// the newest run already fired is ignored.
pub struct TransitionHandler<S> {
    on_success: Option<SuccessCallback<S>>,
    on_failure: Option<FailureCallback>,
    fired_run: AtomicU64,
}

impl<S> Default for TransitionHandler<S> {
    fn default() -> Self {
        Self {
            on_success: None,
            on_failure: None,
            fired_run: AtomicU64::new(0),
        }
    }
}

impl<S> std::fmt::Debug for TransitionHandler<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionHandler")
            .field("on_success", &self.on_success.is_some())
            .field("on_failure", &self.on_failure.is_some())
            .field("fired_run", &self.fired_run.load(Ordering::SeqCst))
            .finish()
    }
}

impl<S> TransitionHandler<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_success<F>(mut self, callback: F) -> Self
    where
        F: Fn(&S) + Send + Sync + 'static,
    {
        self.on_success = Some(Box::new(callback));
        self
    }

    pub fn on_failure<F>(mut self, callback: F) -> Self
    where
        F: Fn(&FailureReport) + Send + Sync + 'static,
    {
        self.on_failure = Some(Box::new(callback));
        self
    }

    pub fn last_fired_run(&self) -> Option<u64> {
        match self.fired_run.load(Ordering::SeqCst) {
            0 => None,
            run => Some(run),
        }
    }

    fn claim(&self, run: u64) -> bool {
        run > 0 && self.fired_run.fetch_max(run, Ordering::SeqCst) < run
    }

    pub(crate) fn fire_success(&self, run: u64, status: &S) -> bool {
        if !self.claim(run) {
            return false;
        }
        if let Some(callback) = &self.on_success {
            callback(status);
        }
        true
    }

    pub(crate) fn fire_failure(&self, run: u64, report: &FailureReport) -> bool {
        if !self.claim(run) {
            return false;
        }
        if let Some(callback) = &self.on_failure {
            callback(report);
        }
        true
    }
}
