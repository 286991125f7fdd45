use crate::app::command_support::{parse_slug, Console};
use crate::polling::TransitionHandler;
use crate::shared::ids::AppSlug;
use crate::workflows::airgap_install::airgap_install_workflow;
use crate::workflows::deploy_status::{deploy_status_workflow, deploy_version};
use crate::workflows::update_check::{start_update_check, update_check_workflow};
use crate::workflows::upgrade_status::upgrade_status_workflow;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub fn cmd_update(args: &[String]) -> Result<String, String> {
    let [action, slug] = args else {
        return Err("usage: update check <slug>".to_string());
    };
    if action != "check" {
        return Err("usage: update check <slug>".to_string());
    }
    let slug = parse_slug(slug)?;
    let console = Console::load()?;
    let started = start_update_check(&console.env, &slug).map_err(|err| console.api_err(err))?;

    let refreshed = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&refreshed);
    let workflow = update_check_workflow(
        &console.env,
        &slug,
        move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        },
        TransitionHandler::new(),
    );
    let mut output = console.watch_workflow(
        &workflow,
        vec![
            format!("app={slug}"),
            format!("available_updates={}", started.available_updates),
        ],
    )?;
    output.push_str(&format!(
        "\nversion_history_refreshed={}",
        refreshed.load(Ordering::SeqCst)
    ));
    Ok(output)
}

pub fn cmd_airgap(args: &[String]) -> Result<String, String> {
    let slug = status_target(args, "airgap")?;
    let console = Console::load()?;
    let workflow = airgap_install_workflow(&console.env, &slug, TransitionHandler::new());
    console.watch_workflow(&workflow, vec![format!("app={slug}")])
}

pub fn cmd_upgrade(args: &[String]) -> Result<String, String> {
    let slug = status_target(args, "upgrade")?;
    let console = Console::load()?;
    let workflow = upgrade_status_workflow(&console.env, &slug, TransitionHandler::new());
    console.watch_workflow(&workflow, vec![format!("app={slug}")])
}

pub fn cmd_deploy(args: &[String]) -> Result<String, String> {
    let [slug, sequence] = args else {
        return Err("usage: deploy <slug> <sequence>".to_string());
    };
    let slug = parse_slug(slug)?;
    let sequence = sequence
        .trim()
        .parse::<u64>()
        .map_err(|_| format!("invalid sequence `{sequence}`; expected a non-negative integer"))?;
    let console = Console::load()?;
    deploy_version(&console.env, &slug, sequence).map_err(|err| console.api_err(err))?;

    let workflow = deploy_status_workflow(&console.env, &slug, sequence, TransitionHandler::new());
    console.watch_workflow(
        &workflow,
        vec![format!("app={slug}"), format!("sequence={sequence}")],
    )
}

fn status_target(args: &[String], verb: &str) -> Result<AppSlug, String> {
    match args {
        [action, slug] if action == "status" => parse_slug(slug),
        _ => Err(format!("usage: {verb} status <slug>")),
    }
}
