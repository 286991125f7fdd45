use crate::app::command_support::{ensure_state_root, map_config_err};
use crate::config::{
    apply_env_overrides, default_config_path, load_settings, save_settings, Settings,
};
use crate::session::SessionContext;

const DEFAULT_API_ENDPOINT: &str = "http://localhost:8800/api/v1";

pub fn cmd_setup(args: &[String]) -> Result<String, String> {
    let endpoint = match args {
        [] => None,
        [flag, value] if flag == "--api-endpoint" => Some(value.as_str()),
        _ => return Err("usage: setup [--api-endpoint URL]".to_string()),
    };
    let paths = ensure_state_root()?;
    let config_path = default_config_path().map_err(map_config_err)?;
    let existed = config_path.exists();
    let mut settings = if existed {
        Settings::from_path(&config_path).map_err(map_config_err)?
    } else {
        Settings::with_endpoint(DEFAULT_API_ENDPOINT)
    };
    match endpoint {
        Some(endpoint) => settings.api_endpoint = endpoint.trim().to_string(),
        None if !existed => apply_env_overrides(&mut settings),
        None => {}
    }
    save_settings(&config_path, &settings).map_err(map_config_err)?;

    Ok([
        "setup complete".to_string(),
        format!("state_root={}", paths.root.display()),
        format!("config={}", config_path.display()),
        format!("api_endpoint={}", settings.api_endpoint),
        format!("graphql_endpoint={}", settings.resolve_graphql_endpoint()),
    ]
    .join("\n"))
}

pub fn cmd_login(args: &[String]) -> Result<String, String> {
    let [token] = args else {
        return Err("usage: login <token>".to_string());
    };
    let paths = ensure_state_root()?;
    let session = SessionContext::new(paths.clone(), login_route()?);
    session.set_token(token).map_err(|e| e.to_string())?;
    Ok(format!(
        "session=stored\ntoken_path={}",
        paths.session_token_path().display()
    ))
}

pub fn cmd_logout(args: &[String]) -> Result<String, String> {
    if !args.is_empty() {
        return Err("usage: logout".to_string());
    }
    let paths = ensure_state_root()?;
    let session = SessionContext::load(paths, login_route()?).map_err(|e| e.to_string())?;
    let was_authenticated = session.is_authenticated();
    session.logout("cli logout");
    Ok(format!(
        "session={}\nredirect={}",
        if was_authenticated { "ended" } else { "none" },
        session.login_route()
    ))
}

// Login and logout still work before `setup`; the login route falls back to its default.
fn login_route() -> Result<String, String> {
    let path = default_config_path().map_err(map_config_err)?;
    if !path.exists() {
        return Ok(Settings::with_endpoint(DEFAULT_API_ENDPOINT).login_route);
    }
    load_settings(&path)
        .map(|settings| settings.login_route)
        .map_err(map_config_err)
}
