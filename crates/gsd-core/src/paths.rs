use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const PLANNING_DIR: &str = ".planning";
pub const PROJECT_DIR: &str = ".planning/project";
pub const CODEBASE_DIR: &str = ".planning/codebase";
pub const CODEBASE_MAP: &str = ".planning/CODEBASE.md";
pub const CONFIG_FILE: &str = ".planning/config.yaml";

// ---------------------------------------------------------------------------
// Project-level artifact names
// ---------------------------------------------------------------------------

pub const PROJECT_MD: &str = "PROJECT.md";
pub const PROJECT_DISCUSSION: &str = "PROJECT-DISCUSSION.md";
pub const PROJECT_RESEARCH: &str = "PROJECT-RESEARCH.md";
pub const PROJECT_PLAN: &str = "PROJECT-PLAN.md";
pub const PROJECT_SUMMARY: &str = "PROJECT-SUMMARY.md";
pub const PROJECT_VERIFICATION: &str = "PROJECT-VERIFICATION.md";

/// The six project-level files, in the order the context block reports them.
pub const PROJECT_FILES: &[&str] = &[
    PROJECT_MD,
    PROJECT_PLAN,
    PROJECT_SUMMARY,
    PROJECT_RESEARCH,
    PROJECT_DISCUSSION,
    PROJECT_VERIFICATION,
];

// ---------------------------------------------------------------------------
// Phase-level artifact names
// ---------------------------------------------------------------------------

pub fn phase_discussion(n: u32) -> String {
    format!("PHASE-{n}-DISCUSSION.md")
}

pub fn phase_research(n: u32) -> String {
    format!("PHASE-{n}-RESEARCH.md")
}

pub fn phase_plan(n: u32) -> String {
    format!("PHASE-{n}-PLAN.md")
}

pub fn phase_verification(n: u32) -> String {
    format!("PHASE-{n}-VERIFICATION.md")
}

/// Substitute every `{N}` in a path or message template with the phase number.
pub fn fill_phase(template: &str, phase: Option<u32>) -> String {
    match phase {
        Some(n) => template.replace("{N}", &n.to_string()),
        None => template.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn planning_dir(root: &Path) -> PathBuf {
    root.join(PLANNING_DIR)
}

pub fn project_dir(root: &Path) -> PathBuf {
    root.join(PROJECT_DIR)
}

pub fn project_artifact(root: &Path, filename: &str) -> PathBuf {
    project_dir(root).join(filename)
}

pub fn codebase_dir(root: &Path) -> PathBuf {
    root.join(CODEBASE_DIR)
}

pub fn codebase_map(root: &Path) -> PathBuf {
    root.join(CODEBASE_MAP)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
