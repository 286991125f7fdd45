use crate::app::command_support::{parse_slug, Console};
use crate::workflows::license::{read_license_file, sync_license, upload_license, LicenseError};
use std::path::Path;

pub fn cmd_license(args: &[String]) -> Result<String, String> {
    match args {
        [action, file] if action == "upload" => cmd_upload(Path::new(file)),
        [action, slug] if action == "sync" => cmd_sync(slug),
        _ => Err("usage: license upload <file> | license sync <slug>".to_string()),
    }
}

fn cmd_upload(path: &Path) -> Result<String, String> {
    // Reject malformed files before loading the session or touching the network.
    let (raw, summary) = read_license_file(path).map_err(|e| e.to_string())?;
    let console = Console::load()?;
    let result = upload_license(&console.env, &raw).map_err(|err| license_err(&console, err))?;

    let mut lines = vec![
        "license=uploaded".to_string(),
        format!("license_id={}", summary.license_id),
        format!(
            "app={}",
            result.slug.unwrap_or_else(|| summary.app_slug.clone())
        ),
    ];
    if let Some(channel) = summary.channel_name {
        lines.push(format!("channel={channel}"));
    }
    Ok(lines.join("\n"))
}

fn cmd_sync(slug: &str) -> Result<String, String> {
    let slug = parse_slug(slug)?;
    let console = Console::load()?;
    let result = sync_license(&console.env, &slug).map_err(|err| license_err(&console, err))?;
    Ok(format!("app={slug}\nlicense=synced\nchanged={}", result.synced))
}

fn license_err(console: &Console, err: LicenseError) -> String {
    match err {
        LicenseError::Api(api) => console.api_err(api),
        other => other.to_string(),
    }
}
