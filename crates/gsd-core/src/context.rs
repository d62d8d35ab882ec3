//! Plain-text state summary for embedding in an agent prompt.

use crate::error::Result;
use crate::paths;
use crate::resolver::{self, LifecycleState};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

fn project_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^# Project:[ \t]*(.+)$").unwrap())
}

/// Name from a `# Project: <name>` heading in PROJECT.md.
pub fn project_name(project_md: &str) -> Option<String> {
    project_name_re()
        .captures(project_md)
        .map(|c| c[1].trim().to_string())
        .filter(|name| !name.is_empty())
}

/// Files worth listing for `state`: the six project files plus the current
/// phase's files when a phase is active.
pub fn tracked_files(state: &LifecycleState) -> Vec<String> {
    let mut files: Vec<String> = paths::PROJECT_FILES.iter().map(|f| f.to_string()).collect();
    if let Some(n) = state.current_phase {
        files.extend([
            paths::phase_discussion(n),
            paths::phase_research(n),
            paths::phase_plan(n),
            paths::phase_verification(n),
        ]);
    }
    files
}

pub fn format_context(state: &LifecycleState, project_dir: &Path) -> String {
    let mut lines = vec![format!("Project state: {}", state.state)];

    if let (Some(current), Some(total)) = (state.current_phase, state.total_phases) {
        lines.push(format!("Current phase: {current} of {total}"));
    }
    if let Some(next) = &state.next_command {
        lines.push(format!("Next suggested command: {next}"));
    }
    lines.push(format!("Context: {}", state.context));

    let (present, absent): (Vec<String>, Vec<String>) = tracked_files(state)
        .into_iter()
        .partition(|f| project_dir.join(f).exists());

    lines.push(String::new());
    if !present.is_empty() {
        lines.push(format!("Files present: {}", present.join(", ")));
    }
    if !absent.is_empty() {
        lines.push(format!("Files absent: {}", absent.join(", ")));
    }
    lines.join("\n")
}

/// Resolve and format the project at `root`.
///
/// Errors only when `.planning/project` exists but cannot be listed, which
/// the resolver alone would silently report as no project.
pub fn render(root: &Path) -> Result<String> {
    let project_dir = paths::project_dir(root);
    if project_dir.exists() {
        std::fs::read_dir(&project_dir)?;
    }
    let state = resolver::resolve_state(root);
    Ok(format_context(&state, &project_dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PLAN_2: &str = "---\nphase_count: 2\n---\n# Project Plan\n\n### Phase 1: Setup\n\n### Phase 2: Build\n";
    const SKIPPED: &str = "---\nskipped: true\n---\n";

    fn project(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        let project = dir.path().join(".planning/project");
        std::fs::create_dir_all(&project).unwrap();
        for (name, content) in files {
            std::fs::write(project.join(name), content).unwrap();
        }
        dir
    }

    #[test]
    fn no_project_suggests_new_project() {
        let dir = TempDir::new().unwrap();
        let out = render(dir.path()).unwrap();
        assert!(out.starts_with("Project state: no-project\n"));
        assert!(out.contains("Next suggested command: /new-project"));
        assert!(!out.contains("Current phase"));
        assert!(out.contains("Files absent: PROJECT.md, PROJECT-PLAN.md"));
        assert!(!out.contains("Files present"));
    }

    #[test]
    fn project_defined_lists_presence() {
        let dir = project(&[("PROJECT.md", "# My Project\n")]);
        let out = render(dir.path()).unwrap();
        assert!(out.contains("Project state: project-defined"));
        assert!(out.contains("Files present: PROJECT.md\n"));
        assert!(out.contains("Files absent: PROJECT-PLAN.md, PROJECT-SUMMARY.md"));
    }

    #[test]
    fn planned_phase_shows_position_and_phase_files() {
        let dir = project(&[
            ("PROJECT.md", "# Project\n"),
            ("PROJECT-DISCUSSION.md", SKIPPED),
            ("PROJECT-RESEARCH.md", SKIPPED),
            ("PROJECT-PLAN.md", PLAN_2),
            ("PHASE-1-DISCUSSION.md", SKIPPED),
            ("PHASE-1-RESEARCH.md", SKIPPED),
            ("PHASE-1-PLAN.md", "# Phase 1\n"),
        ]);
        let out = render(dir.path()).unwrap();
        assert!(out.contains("Project state: phase-1-planned"));
        assert!(out.contains("Current phase: 1 of 2"));
        assert!(out.contains("Next suggested command: /execute-phase 1"));
        assert!(out.contains("PHASE-1-PLAN.md"));
        assert!(out.contains("Files absent: PROJECT-SUMMARY.md, PROJECT-VERIFICATION.md, PHASE-1-VERIFICATION.md"));
    }

    #[test]
    fn verified_project_has_no_next_line() {
        let dir = project(&[
            ("PROJECT.md", "# Project\n"),
            ("PROJECT-PLAN.md", PLAN_2),
            ("PHASE-1-PLAN.md", "# Phase 1\n"),
            ("PHASE-2-PLAN.md", "# Phase 2\n"),
            ("PROJECT-SUMMARY.md", "## Phase 1: Setup\n\n## Phase 2: Build\n"),
            ("PHASE-1-VERIFICATION.md", "# Verified\n"),
            ("PHASE-2-VERIFICATION.md", "# Verified\n"),
            ("PROJECT-VERIFICATION.md", "# Verified\n"),
        ]);
        let out = render(dir.path()).unwrap();
        assert!(out.contains("Project state: project-verified"));
        assert!(!out.contains("Next suggested command"));
        assert!(!out.contains("Current phase"));
    }

    #[test]
    fn project_path_that_is_a_file_errors() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".planning")).unwrap();
        std::fs::write(dir.path().join(".planning/project"), "not a directory").unwrap();
        assert!(render(dir.path()).is_err());
    }

    #[test]
    fn project_name_heading() {
        assert_eq!(project_name("# Project: Billing API\n").as_deref(), Some("Billing API"));
        assert_eq!(project_name("intro\n# Project:  Spaced  \n").as_deref(), Some("Spaced"));
        assert_eq!(project_name("# Billing API\n"), None);
    }
}
