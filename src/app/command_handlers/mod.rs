use crate::app::cli::{help_text, parse_cli_verb, CliVerb};

pub mod apps;
pub mod license;
pub mod nodes;
pub mod session;
pub mod snapshots;
pub mod tasks;

pub fn run_cli(args: Vec<String>) -> Result<String, String> {
    if args.is_empty() {
        return Ok(help_text());
    }

    match parse_cli_verb(args[0].as_str()) {
        CliVerb::Setup => session::cmd_setup(&args[1..]),
        CliVerb::Login => session::cmd_login(&args[1..]),
        CliVerb::Logout => session::cmd_logout(&args[1..]),
        CliVerb::Apps => apps::cmd_apps(&args[1..]),
        CliVerb::Snapshot => snapshots::cmd_snapshot(&args[1..]),
        CliVerb::Update => tasks::cmd_update(&args[1..]),
        CliVerb::Airgap => tasks::cmd_airgap(&args[1..]),
        CliVerb::Upgrade => tasks::cmd_upgrade(&args[1..]),
        CliVerb::Deploy => tasks::cmd_deploy(&args[1..]),
        CliVerb::Nodes => nodes::cmd_nodes(&args[1..]),
        CliVerb::License => license::cmd_license(&args[1..]),
        CliVerb::Help => Ok(help_text()),
        CliVerb::Unknown => Err(format!("unknown command `{}`", args[0])),
    }
}
