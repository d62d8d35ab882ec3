//! Writes skip-marker artifacts for the optional discuss and research stages.

use crate::error::{GsdError, Result};
use crate::frontmatter::SKIPPED_KEY;
use crate::types::{LifecycleCommand, Scope, Stage};
use crate::{io, paths, plan};
use chrono::{SecondsFormat, Utc};
use std::path::{Path, PathBuf};

/// Artifact file name for a skippable stage at `scope`.
fn artifact_name(stage: Stage, scope: Scope) -> Option<String> {
    let name = match (stage, scope) {
        (Stage::Discuss, Scope::Project) => paths::PROJECT_DISCUSSION.to_string(),
        (Stage::Research, Scope::Project) => paths::PROJECT_RESEARCH.to_string(),
        (Stage::Discuss, Scope::Phase(n)) => paths::phase_discussion(n),
        (Stage::Research, Scope::Phase(n)) => paths::phase_research(n),
        _ => return None,
    };
    Some(name)
}

/// Record that `stage` was deliberately skipped at `scope`.
///
/// Returns the path written. Never overwrites an existing artifact.
pub fn write_skip_marker(root: &Path, stage: Stage, scope: Scope) -> Result<PathBuf> {
    let Some(name) = artifact_name(stage, scope) else {
        let command = LifecycleCommand::for_stage(stage, scope)
            .map(|c| c.to_string())
            .unwrap_or_else(|| stage.label().to_string());
        return Err(GsdError::NotSkippable(command));
    };

    if !paths::project_artifact(root, paths::PROJECT_MD).is_file() {
        return Err(GsdError::NoProject);
    }
    if let Scope::Phase(n) = scope {
        let declared = io::read_lenient(&paths::project_artifact(root, paths::PROJECT_PLAN))
            .is_some_and(|p| plan::covers_phase(&p, n));
        if !declared {
            return Err(GsdError::PhaseNotDeclared(n));
        }
    }

    let path = paths::project_artifact(root, &name);
    if path.exists() {
        return Err(GsdError::ArtifactExists(name));
    }

    let skipped_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let heading = match scope {
        Scope::Project => format!("Project {}", stage_noun(stage)),
        Scope::Phase(n) => format!("Phase {n} {}", stage_noun(stage)),
    };
    let body = format!(
        "---\n{SKIPPED_KEY}: true\nskipped_at: {skipped_at}\n---\n\n# {heading}\n\nSkipped.\n"
    );
    io::atomic_write(&path, body.as_bytes())?;
    tracing::debug!(path = %path.display(), "wrote skip marker");
    Ok(path)
}

/// Skip the stage a skippable command would produce.
pub fn skip_command(root: &Path, command: LifecycleCommand, phase: Option<u32>) -> Result<PathBuf> {
    if command.is_phase_scoped() && phase.is_none() {
        return Err(GsdError::PhaseNumberRequired(command.to_string()));
    }
    let (stage, scope) = command
        .skippable_stage(phase)
        .ok_or_else(|| GsdError::NotSkippable(command.to_string()))?;
    write_skip_marker(root, stage, scope)
}

fn stage_noun(stage: Stage) -> &'static str {
    match stage {
        Stage::Discuss => "Discussion",
        Stage::Research => "Research",
        _ => "",
    }
}
