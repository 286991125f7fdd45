//! Poll-until-terminal-state engine shared by every long-running console workflow.

pub mod cancel;
pub mod interpreter;
pub mod repeater;
pub mod transition;
pub mod view_state;
pub mod workflow;

pub use cancel::CancelToken;
pub use interpreter::{FailureReport, Phase, StatusInterpreter};
pub use repeater::PollRepeater;
pub use transition::TransitionHandler;
pub use view_state::ViewState;
pub use workflow::{
    PollWorkflow, StatusSource, WorkflowContext, WorkflowError, WorkflowSnapshot, WorkflowState,
};
