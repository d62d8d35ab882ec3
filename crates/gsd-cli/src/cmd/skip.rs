use crate::output::print_json;
use anyhow::Context;
use gsd_core::config::Config;
use gsd_core::skip::skip_command;
use gsd_core::types::{Invocation, LifecycleCommand};
use std::path::Path;

pub fn run(root: &Path, command: &str, phase: Option<u32>, json: bool) -> anyhow::Result<()> {
    let config = Config::load_or_default(root);
    let name = config.normalize_command(command);
    let command: LifecycleCommand = name.parse()?;

    let path = skip_command(root, command, phase)
        .with_context(|| format!("cannot skip {command}"))?;
    let skipped = Invocation {
        command,
        phase: if command.is_phase_scoped() { phase } else { None },
    };

    if json {
        let value = serde_json::json!({
            "skipped": skipped,
            "path": path.display().to_string(),
        });
        print_json(&value)?;
    } else {
        let shown = path.strip_prefix(root).unwrap_or(&path);
        println!("Skipped {}: wrote {}", skipped.qualified(&config.namespace), shown.display());
    }
    Ok(())
}
