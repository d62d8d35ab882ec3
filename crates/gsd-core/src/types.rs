use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// StepStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Done,
    Skipped,
    Active,
    Pending,
}

impl StepStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            StepStatus::Done => "done",
            StepStatus::Skipped => "skipped",
            StepStatus::Active => "active",
            StepStatus::Pending => "pending",
        }
    }

    /// Single display glyph for a status row.
    pub fn glyph(self) -> char {
        match self {
            StepStatus::Done => '●',
            StepStatus::Skipped => '○',
            StepStatus::Active => '◆',
            StepStatus::Pending => '·',
        }
    }

    /// Done or skipped: nothing further is expected from this step.
    pub fn is_settled(self) -> bool {
        matches!(self, StepStatus::Done | StepStatus::Skipped)
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// One stage of the lifecycle template. Projects use
/// define/discuss/research/plan/verify, phases use
/// discuss/research/plan/execute/verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Define,
    Discuss,
    Research,
    Plan,
    Execute,
    Verify,
}

impl Stage {
    /// Past-tense label used in step ids (`phase-2-planned`).
    pub fn label(self) -> &'static str {
        match self {
            Stage::Define => "defined",
            Stage::Discuss => "discussed",
            Stage::Research => "researched",
            Stage::Plan => "planned",
            Stage::Execute => "executed",
            Stage::Verify => "verified",
        }
    }

    /// Discussion and research may be bypassed with a skip marker.
    pub fn is_skippable(self) -> bool {
        matches!(self, Stage::Discuss | Stage::Research)
    }
}

// ---------------------------------------------------------------------------
// Scope
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    Project,
    Phase(u32),
}

impl Scope {
    pub fn phase(self) -> Option<u32> {
        match self {
            Scope::Project => None,
            Scope::Phase(n) => Some(n),
        }
    }
}

// ---------------------------------------------------------------------------
// LifecycleCommand
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LifecycleCommand {
    NewProject,
    DiscussProject,
    ResearchProject,
    PlanProject,
    DiscussPhase,
    ResearchPhase,
    PlanPhase,
    ExecutePhase,
    VerifyPhase,
    VerifyProject,
    EndProject,
}

impl LifecycleCommand {
    pub fn all() -> &'static [LifecycleCommand] {
        &[
            LifecycleCommand::NewProject,
            LifecycleCommand::DiscussProject,
            LifecycleCommand::ResearchProject,
            LifecycleCommand::PlanProject,
            LifecycleCommand::DiscussPhase,
            LifecycleCommand::ResearchPhase,
            LifecycleCommand::PlanPhase,
            LifecycleCommand::ExecutePhase,
            LifecycleCommand::VerifyPhase,
            LifecycleCommand::VerifyProject,
            LifecycleCommand::EndProject,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LifecycleCommand::NewProject => "new-project",
            LifecycleCommand::DiscussProject => "discuss-project",
            LifecycleCommand::ResearchProject => "research-project",
            LifecycleCommand::PlanProject => "plan-project",
            LifecycleCommand::DiscussPhase => "discuss-phase",
            LifecycleCommand::ResearchPhase => "research-phase",
            LifecycleCommand::PlanPhase => "plan-phase",
            LifecycleCommand::ExecutePhase => "execute-phase",
            LifecycleCommand::VerifyPhase => "verify-phase",
            LifecycleCommand::VerifyProject => "verify-project",
            LifecycleCommand::EndProject => "end-project",
        }
    }

    /// Phase-scoped commands take a leading phase number argument.
    pub fn is_phase_scoped(self) -> bool {
        matches!(
            self,
            LifecycleCommand::DiscussPhase
                | LifecycleCommand::ResearchPhase
                | LifecycleCommand::PlanPhase
                | LifecycleCommand::ExecutePhase
                | LifecycleCommand::VerifyPhase
        )
    }

    /// The command that produces `stage` at `scope`, if one exists.
    pub fn for_stage(stage: Stage, scope: Scope) -> Option<LifecycleCommand> {
        let cmd = match (scope, stage) {
            (Scope::Project, Stage::Define) => LifecycleCommand::NewProject,
            (Scope::Project, Stage::Discuss) => LifecycleCommand::DiscussProject,
            (Scope::Project, Stage::Research) => LifecycleCommand::ResearchProject,
            (Scope::Project, Stage::Plan) => LifecycleCommand::PlanProject,
            (Scope::Project, Stage::Verify) => LifecycleCommand::VerifyProject,
            (Scope::Phase(_), Stage::Discuss) => LifecycleCommand::DiscussPhase,
            (Scope::Phase(_), Stage::Research) => LifecycleCommand::ResearchPhase,
            (Scope::Phase(_), Stage::Plan) => LifecycleCommand::PlanPhase,
            (Scope::Phase(_), Stage::Execute) => LifecycleCommand::ExecutePhase,
            (Scope::Phase(_), Stage::Verify) => LifecycleCommand::VerifyPhase,
            _ => return None,
        };
        Some(cmd)
    }

    /// The skippable stage this command produces and the scope it runs at.
    pub fn skippable_stage(self, phase: Option<u32>) -> Option<(Stage, Scope)> {
        match (self, phase) {
            (LifecycleCommand::DiscussProject, _) => Some((Stage::Discuss, Scope::Project)),
            (LifecycleCommand::ResearchProject, _) => Some((Stage::Research, Scope::Project)),
            (LifecycleCommand::DiscussPhase, Some(n)) => Some((Stage::Discuss, Scope::Phase(n))),
            (LifecycleCommand::ResearchPhase, Some(n)) => Some((Stage::Research, Scope::Phase(n))),
            _ => None,
        }
    }
}

impl fmt::Display for LifecycleCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LifecycleCommand {
    type Err = crate::error::GsdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LifecycleCommand::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| crate::error::GsdError::UnknownCommand(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Invocation
// ---------------------------------------------------------------------------

/// A lifecycle command bound to its phase argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Invocation {
    pub command: LifecycleCommand,
    pub phase: Option<u32>,
}

impl Invocation {
    pub fn project(command: LifecycleCommand) -> Self {
        Self {
            command,
            phase: None,
        }
    }

    pub fn phase(command: LifecycleCommand, n: u32) -> Self {
        Self {
            command,
            phase: Some(n),
        }
    }

    /// Render with a namespace prefix, e.g. `/gsd:plan-phase 2`.
    pub fn qualified(&self, namespace: &str) -> String {
        let name = if namespace.is_empty() {
            self.command.as_str().to_string()
        } else {
            format!("{namespace}:{}", self.command)
        };
        match self.phase {
            Some(n) => format!("/{name} {n}"),
            None => format!("/{name}"),
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.phase {
            Some(n) => write!(f, "/{} {n}", self.command),
            None => write!(f, "/{}", self.command),
        }
    }
}

impl Serialize for Invocation {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// Symbolic lifecycle position, rendered as a tag like `phase-2-executed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    NoProject,
    ProjectDefined,
    PhaseUnplanned(u32),
    PhasePlanned(u32),
    PhaseExecuted(u32),
    AllPhasesVerified,
    ProjectVerified,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::NoProject => f.write_str("no-project"),
            Position::ProjectDefined => f.write_str("project-defined"),
            Position::PhaseUnplanned(n) => write!(f, "phase-{n}-unplanned"),
            Position::PhasePlanned(n) => write!(f, "phase-{n}-planned"),
            Position::PhaseExecuted(n) => write!(f, "phase-{n}-executed"),
            Position::AllPhasesVerified => f.write_str("all-phases-verified"),
            Position::ProjectVerified => f.write_str("project-verified"),
        }
    }
}

impl Serialize for Position {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
