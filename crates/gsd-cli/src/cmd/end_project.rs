use crate::output::print_json;
use anyhow::Context;
use gsd_core::config::Config;
use gsd_core::context::project_name;
use gsd_core::resolver::resolve_state;
use gsd_core::{io, paths, prereqs};
use std::path::Path;

pub fn run(root: &Path, yes: bool, json: bool) -> anyhow::Result<()> {
    let config = Config::load_or_default(root);
    let dir = paths::project_dir(root);

    let files = io::list_names(&dir);
    if files.is_empty() {
        let why = if dir.is_dir() { "is empty" } else { "does not exist" };
        if json {
            print_json(&serde_json::json!({ "project": null, "files": [], "wiped": false }))?;
        } else {
            println!("No project to clean up. (.planning/project/ {why})");
        }
        return Ok(());
    }

    let name = io::read_lenient(&dir.join(paths::PROJECT_MD))
        .and_then(|content| project_name(&content))
        .unwrap_or_else(|| "(unknown)".to_string());

    let state = resolve_state(root);
    let incomplete: Vec<String> = if state.is_complete() {
        Vec::new()
    } else {
        state
            .incomplete_steps()
            .map(|s| format!("{} ({})", s.id, s.status))
            .collect()
    };

    if yes {
        std::fs::remove_dir_all(&dir)
            .with_context(|| format!("failed to remove {}", dir.display()))?;
        tracing::debug!(dir = %dir.display(), "removed project artifacts");
    }

    if json {
        let value = serde_json::json!({
            "project": name,
            "files": files,
            "incomplete": incomplete,
            "wiped": yes,
        });
        return print_json(&value);
    }

    println!("Project: {name}");
    println!();
    println!("Files to remove:");
    for file in &files {
        println!("  {file}");
    }
    println!();
    println!("codebase/ and todos/ are preserved.");
    if !incomplete.is_empty() {
        println!();
        println!("WARNING: Project is not fully verified.");
        for step in &incomplete {
            println!("  - {step}");
        }
    }
    println!();
    if yes {
        println!(
            "Project artifacts wiped. Ready for {}.",
            prereqs::command_ref(&config.namespace, "new-project")
        );
    } else {
        println!("Pass --yes to wipe project artifacts.");
    }
    Ok(())
}
