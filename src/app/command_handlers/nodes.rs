use crate::app::command_support::Console;
use crate::shared::ids::NodeName;
use crate::workflows::cluster_nodes::{
    delete_node, drain_node, generate_join_command, list_nodes, NodeRole,
};

const USAGE: &str =
    "usage: nodes list | nodes drain <name> | nodes delete <name> | nodes join-command primary|secondary";

pub fn cmd_nodes(args: &[String]) -> Result<String, String> {
    match args {
        [action] if action == "list" => cmd_list(),
        [action, name] if action == "drain" => {
            let node = NodeName::parse(name)?;
            let console = Console::load()?;
            drain_node(&console.env, &node).map_err(|err| console.api_err(err))?;
            Ok(format!("node={node}\ndrain=started"))
        }
        [action, name] if action == "delete" => {
            let node = NodeName::parse(name)?;
            let console = Console::load()?;
            delete_node(&console.env, &node).map_err(|err| console.api_err(err))?;
            Ok(format!("node={node}\ndelete=ok"))
        }
        [action, role] if action == "join-command" => {
            let role = NodeRole::parse(role)?;
            let console = Console::load()?;
            let join = generate_join_command(&console.env, role)
                .map_err(|err| console.api_err(err))?;
            let mut lines = vec![
                format!("role={}", role.as_str()),
                format!("command={}", join.shell_line()),
            ];
            if let Some(expiry) = join.expiry {
                lines.push(format!("expiry={expiry}"));
            }
            Ok(lines.join("\n"))
        }
        _ => Err(USAGE.to_string()),
    }
}

fn cmd_list() -> Result<String, String> {
    let console = Console::load()?;
    let list = list_nodes(&console.env).map_err(|err| console.api_err(err))?;
    let mut lines = vec![
        format!("nodes={}", list.nodes.len()),
        format!("ready={}", list.ready_count()),
        format!("kurl_enabled={}", list.is_kurl_enabled),
        format!("ha={}", list.ha),
    ];
    for node in &list.nodes {
        lines.push(format!(
            "node={} ready={} connected={} primary={} kubelet={}",
            node.name, node.is_ready, node.is_connected, node.is_primary_node, node.kubelet_version
        ));
    }
    Ok(lines.join("\n"))
}
