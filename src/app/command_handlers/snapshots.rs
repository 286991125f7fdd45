use crate::app::command_support::{parse_slug, Console};
use crate::polling::TransitionHandler;
use crate::shared::ids::BackupName;
use crate::workflows::snapshot_backup::{backup_workflow, start_backup};
use crate::workflows::snapshot_restore::{
    restore_completed_route, restore_workflow, start_restore,
};

pub fn cmd_snapshot(args: &[String]) -> Result<String, String> {
    match args {
        [action, slug] if action == "backup" => cmd_backup(slug),
        [action, slug, backup] if action == "restore" => cmd_restore(slug, backup),
        _ => Err("usage: snapshot backup <slug> | snapshot restore <slug> <backup>".to_string()),
    }
}

fn cmd_backup(slug: &str) -> Result<String, String> {
    let slug = parse_slug(slug)?;
    let console = Console::load()?;
    let backup = start_backup(&console.env, &slug).map_err(|err| console.api_err(err))?;
    let workflow = backup_workflow(&console.env, &slug, &backup, TransitionHandler::new());
    console.watch_workflow(
        &workflow,
        vec![format!("app={slug}"), format!("backup={backup}")],
    )
}

fn cmd_restore(slug: &str, backup: &str) -> Result<String, String> {
    let slug = parse_slug(slug)?;
    let backup = BackupName::parse(backup)?;
    let console = Console::load()?;
    start_restore(&console.env, &slug, &backup).map_err(|err| console.api_err(err))?;

    let route = restore_completed_route(&slug);
    let workflow = restore_workflow(&console.env, &slug, TransitionHandler::new());
    let mut output = console.watch_workflow(
        &workflow,
        vec![format!("app={slug}"), format!("backup={backup}")],
    )?;
    output.push_str(&format!("\nnext={route}"));
    Ok(output)
}
