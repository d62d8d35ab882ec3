use std::path::Path;

/// Always succeeds: a failed resolution prints an `unknown` state instead.
pub fn run(root: &Path) -> anyhow::Result<()> {
    match gsd_core::context::render(root) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            tracing::debug!(error = %e, "state resolution failed");
            println!("Project state: unknown\nContext: State resolution failed.");
        }
    }
    Ok(())
}
