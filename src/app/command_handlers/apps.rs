use crate::app::command_support::Console;
use crate::workflows::apps::list_apps;

pub fn cmd_apps(args: &[String]) -> Result<String, String> {
    if !args.is_empty() {
        return Err("usage: apps".to_string());
    }
    let console = Console::load()?;
    let apps = list_apps(&console.env).map_err(|err| console.api_err(err))?;
    if apps.is_empty() {
        return Ok("apps=0".to_string());
    }

    let mut lines = vec![format!("apps={}", apps.len())];
    for app in apps {
        let sequence = app
            .current_sequence
            .map(|sequence| sequence.to_string())
            .unwrap_or_else(|| "-".to_string());
        lines.push(format!(
            "app={} name={} airgap={} sequence={sequence}",
            app.slug, app.name, app.is_airgap
        ));
    }
    Ok(lines.join("\n"))
}
