use serde::Serialize;

const SUPPORT_GUIDANCE: &str =
    "Generate a support bundle from the troubleshoot page and contact support with it attached.";
const WARNING_GUIDANCE: &str =
    "The operation finished with warnings. Review them before relying on the result.";

/// Failure details shown on a workflow's failure view.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FailureReport {
    pub message: String,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl FailureReport {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn with_errors(mut self, errors: Vec<String>) -> Self {
        self.errors = errors;
        self
    }

    pub fn is_warning_only(&self) -> bool {
        self.errors.is_empty() && !self.warnings.is_empty()
    }

    pub fn guidance(&self) -> &'static str {
        if self.is_warning_only() {
            WARNING_GUIDANCE
        } else {
            SUPPORT_GUIDANCE
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    InProgress,
    Succeeded,
    Failed(FailureReport),
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// Per-workflow reading of a fetched status payload.
///
/// Implementations only classify; stopping the poll, updating the view and
/// firing side effects is handled by [`super::PollWorkflow`].
pub trait StatusInterpreter: Send + Sync + 'static {
    type Status: Clone + Send + 'static;

    fn workflow(&self) -> &'static str;

    fn phase(&self, status: &Self::Status) -> Phase;

    fn message(&self, _status: &Self::Status) -> Option<String> {
        None
    }
}
