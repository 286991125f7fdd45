use super::FailureReport;

/// What a screen renders for one workflow: the last status seen plus UI flags.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState<S> {
    pub status: Option<S>,
    pub message: Option<String>,
    pub loading: bool,
    pub error_message: Option<String>,
    pub is_terminal: bool,
    pub failure: Option<FailureReport>,
    pub ticks: u64,
}

impl<S> Default for ViewState<S> {
    fn default() -> Self {
        Self {
            status: None,
            message: None,
            loading: false,
            error_message: None,
            is_terminal: false,
            failure: None,
            ticks: 0,
        }
    }
}

impl<S> ViewState<S> {
    pub fn loading() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    pub(crate) fn apply_status(&mut self, status: S, message: Option<String>) {
        self.status = Some(status);
        if message.is_some() {
            self.message = message;
        }
        self.loading = false;
        self.error_message = None;
        self.ticks = self.ticks.saturating_add(1);
    }

    pub(crate) fn apply_error(&mut self, message: String) {
        self.loading = false;
        self.error_message = Some(message);
        self.ticks = self.ticks.saturating_add(1);
    }

    pub(crate) fn mark_succeeded(&mut self) {
        self.is_terminal = true;
        self.failure = None;
    }

    pub(crate) fn mark_failed(&mut self, report: FailureReport) {
        self.is_terminal = true;
        self.failure = Some(report);
    }
}
