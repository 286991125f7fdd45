#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliVerb {
    Setup,
    Login,
    Logout,
    Apps,
    Snapshot,
    Update,
    Airgap,
    Upgrade,
    Deploy,
    Nodes,
    License,
    Help,
    Unknown,
}

pub fn parse_cli_verb(input: &str) -> CliVerb {
    match input {
        "setup" => CliVerb::Setup,
        "login" => CliVerb::Login,
        "logout" => CliVerb::Logout,
        "apps" => CliVerb::Apps,
        "snapshot" => CliVerb::Snapshot,
        "update" => CliVerb::Update,
        "airgap" => CliVerb::Airgap,
        "upgrade" => CliVerb::Upgrade,
        "deploy" => CliVerb::Deploy,
        "nodes" => CliVerb::Nodes,
        "license" => CliVerb::License,
        "help" | "--help" | "-h" => CliVerb::Help,
        _ => CliVerb::Unknown,
    }
}

pub fn cli_help_lines() -> Vec<String> {
    vec![
        "Commands:".to_string(),
        "  setup [--api-endpoint URL]           Write default config and state directories"
            .to_string(),
        "  login <token>                        Store the session token".to_string(),
        "  logout                               End the session".to_string(),
        "  apps                                 List installed applications".to_string(),
        "  snapshot backup <slug>               Start a backup and watch it".to_string(),
        "  snapshot restore <slug> <backup>     Restore a backup and watch it".to_string(),
        "  update check <slug>                  Check for new versions and watch the download"
            .to_string(),
        "  airgap status <slug>                 Watch an airgap bundle install".to_string(),
        "  upgrade status <slug>                Watch the admin console upgrade".to_string(),
        "  deploy <slug> <sequence>             Deploy a version and watch it".to_string(),
        "  nodes list                           Show cluster nodes".to_string(),
        "  nodes drain <name>                   Drain a node".to_string(),
        "  nodes delete <name>                  Delete a node".to_string(),
        "  nodes join-command primary|secondary Generate a node join command".to_string(),
        "  license upload <file>                Validate and upload a license".to_string(),
        "  license sync <slug>                  Sync an application's license".to_string(),
    ]
}

pub(crate) fn help_text() -> String {
    cli_help_lines().join("\n")
}
