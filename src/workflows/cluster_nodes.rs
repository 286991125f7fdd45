use super::{WorkflowEnv, WorkflowKind};
use crate::api::{ActionResponse, ApiError};
use crate::polling::{Phase, PollWorkflow, StatusInterpreter, TransitionHandler};
use crate::shared::ids::NodeName;
use serde::Deserialize;

/// Shown when the backend refuses a node delete with HTTP 422.
pub const EKCO_REQUIRED_MESSAGE: &str =
    "The ekco add-on is required to delete nodes. Install the ekco add-on and try again.";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeList {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub is_kurl_enabled: bool,
    #[serde(default)]
    pub ha: bool,
}

impl NodeList {
    pub fn ready_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_ready).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub name: String,
    #[serde(default)]
    pub is_connected: bool,
    #[serde(default)]
    pub is_ready: bool,
    #[serde(default)]
    pub is_primary_node: bool,
    #[serde(default)]
    pub kubelet_version: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    Primary,
    Secondary,
}

impl NodeRole {
    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw.trim() {
            "primary" => Ok(Self::Primary),
            "secondary" => Ok(Self::Secondary),
            other => Err(format!(
                "unknown node role `{other}`; expected `primary` or `secondary`"
            )),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JoinCommand {
    #[serde(default)]
    pub command: Vec<String>,
    #[serde(default)]
    pub expiry: Option<String>,
}

impl JoinCommand {
    pub fn shell_line(&self) -> String {
        self.command.join(" ")
    }
}

/// Node list refresh. Never settles; the caller stops it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClusterNodesInterpreter;

impl StatusInterpreter for ClusterNodesInterpreter {
    type Status = NodeList;

    fn workflow(&self) -> &'static str {
        WorkflowKind::ClusterNodes.as_str()
    }

    fn phase(&self, _status: &NodeList) -> Phase {
        Phase::InProgress
    }

    fn message(&self, status: &NodeList) -> Option<String> {
        Some(format!(
            "{}/{} nodes ready",
            status.ready_count(),
            status.nodes.len()
        ))
    }
}

pub fn list_nodes(env: &WorkflowEnv) -> Result<NodeList, ApiError> {
    env.api.get_json("kurl/nodes")
}

pub fn drain_node(env: &WorkflowEnv, node: &NodeName) -> Result<(), ApiError> {
    let response: ActionResponse = env.api.post_json(
        &format!("kurl/nodes/{}/drain", node.as_path_segment()),
        &serde_json::json!({}),
    )?;
    response.into_result("drain node")
}

/// One request, no retry. A 422 means the cluster lacks the ekco add-on.
pub fn delete_node(env: &WorkflowEnv, node: &NodeName) -> Result<(), ApiError> {
    let response = env
        .api
        .delete_json::<ActionResponse>(&format!("kurl/nodes/{}", node.as_path_segment()))
        .map_err(|err| match err.status_code() {
            Some(422) => ApiError::Action {
                action: "delete node".to_string(),
                message: EKCO_REQUIRED_MESSAGE.to_string(),
            },
            _ => err,
        })?;
    response.into_result("delete node")
}

pub fn generate_join_command(env: &WorkflowEnv, role: NodeRole) -> Result<JoinCommand, ApiError> {
    env.api.post_json(
        &format!("kurl/generate-node-join-command-{}", role.as_str()),
        &serde_json::json!({}),
    )
}

pub fn cluster_nodes_workflow(
    env: &WorkflowEnv,
    transitions: TransitionHandler<NodeList>,
) -> PollWorkflow<ClusterNodesInterpreter> {
    PollWorkflow::new(
        ClusterNodesInterpreter,
        env.get_source("kurl/nodes".to_string()),
        env.context(WorkflowKind::ClusterNodes),
        transitions,
    )
}
