//! Per-command prerequisite table.
//!
//! Each lifecycle command owns an ordered list of hard requirements (an unmet
//! one blocks the command) and soft requirements (an unmet one only warns).
//! File names and fix commands are templates; `{N}` is the requested phase.

use crate::paths;
use crate::snapshot::ProjectSnapshot;
use crate::types::LifecycleCommand;
use std::path::Path;

// ---------------------------------------------------------------------------
// Check / Fix / Requirement
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// A file under `.planning/project/` must exist.
    File(&'static str),
    /// The file must exist and carry a recognised `skipped` frontmatter key.
    Marked(&'static str),
    /// The requested phase must lie within `1..=max_phase` of PROJECT-PLAN.md.
    /// Passes when there is no plan at all; a separate `File` check covers
    /// that case.
    PhaseDeclared,
    /// PROJECT-SUMMARY.md must contain the `## Phase N:` heading.
    SummaryHeading,
    /// `.planning/codebase/` has entries or `.planning/CODEBASE.md` exists.
    CodebaseMap,
}

/// How to resolve an unmet requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fix {
    /// A namespaced command, e.g. `plan-phase {N}` renders as `/gsd:plan-phase 2`.
    Command(&'static str),
    /// Free-form advice.
    Text(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirement {
    pub check: Check,
    pub message: &'static str,
    pub fix: Fix,
    pub skip: Option<Fix>,
}

/// A rendered, unmet requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub message: String,
    pub fix: String,
    pub skip: Option<String>,
}

/// Everything a requirement check may look at.
pub struct CheckContext<'a> {
    pub root: &'a Path,
    pub snapshot: &'a ProjectSnapshot,
    pub phase: Option<u32>,
    pub namespace: &'a str,
}

impl CheckContext<'_> {
    fn fill(&self, template: &str) -> String {
        paths::fill_phase(template, self.phase)
    }

    fn render(&self, fix: Fix) -> String {
        match fix {
            Fix::Command(template) => command_ref(self.namespace, &self.fill(template)),
            Fix::Text(text) => text.to_string(),
        }
    }
}

/// `/ns:name`, or `/name` when the namespace is empty.
pub fn command_ref(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        format!("/{name}")
    } else {
        format!("/{namespace}:{name}")
    }
}

impl Requirement {
    /// `None` when satisfied.
    pub fn evaluate(&self, ctx: &CheckContext) -> Option<Failure> {
        let snap = ctx.snapshot;
        let message = match self.check {
            Check::File(template) => {
                if snap.has(&ctx.fill(template)) {
                    return None;
                }
                ctx.fill(self.message)
            }
            Check::Marked(template) => {
                let name = ctx.fill(template);
                if !snap.has(&name) {
                    ctx.fill(self.message)
                } else if snap.marker(&name).is_present() {
                    return None;
                } else {
                    format!("{name} has no skipped marker (unrecognized format).")
                }
            }
            Check::PhaseDeclared => {
                let declared = match (snap.plan.as_deref(), ctx.phase) {
                    (None, _) => true,
                    (Some(plan), Some(n)) => crate::plan::covers_phase(plan, n),
                    (Some(_), None) => false,
                };
                if declared {
                    return None;
                }
                ctx.fill(self.message)
            }
            Check::SummaryHeading => {
                if ctx.phase.is_some_and(|n| snap.phase_executed(n)) {
                    return None;
                }
                ctx.fill(self.message)
            }
            Check::CodebaseMap => {
                if crate::io::dir_has_entries(&paths::codebase_dir(ctx.root))
                    || paths::codebase_map(ctx.root).is_file()
                {
                    return None;
                }
                ctx.fill(self.message)
            }
        };
        Some(Failure {
            message,
            fix: ctx.render(self.fix),
            skip: self.skip.map(|s| ctx.render(s)),
        })
    }
}

// ---------------------------------------------------------------------------
// PrereqRule
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrereqRule {
    pub command: LifecycleCommand,
    pub hard: Vec<Requirement>,
    pub soft: Vec<Requirement>,
}

impl PrereqRule {
    /// First unmet hard requirement, in table order.
    pub fn first_hard_failure(&self, ctx: &CheckContext) -> Option<Failure> {
        self.hard.iter().find_map(|r| r.evaluate(ctx))
    }

    /// Every unmet soft requirement, in table order.
    pub fn soft_failures(&self, ctx: &CheckContext) -> Vec<Failure> {
        self.soft.iter().filter_map(|r| r.evaluate(ctx)).collect()
    }
}

const fn req(check: Check, message: &'static str, fix: Fix) -> Requirement {
    Requirement {
        check,
        message,
        fix,
        skip: None,
    }
}

const fn skippable(check: Check, message: &'static str, fix: Fix, skip: Fix) -> Requirement {
    Requirement {
        check,
        message,
        fix,
        skip: Some(skip),
    }
}

const PROJECT_DEFINED: Requirement = req(
    Check::File(paths::PROJECT_MD),
    "No project defined.",
    Fix::Command("new-project"),
);

const PROJECT_PLANNED: Requirement = req(
    Check::File(paths::PROJECT_PLAN),
    "No project plan found.",
    Fix::Command("plan-project"),
);

const PHASE_DECLARED: Requirement = req(
    Check::PhaseDeclared,
    "Phase {N} not found in PROJECT-PLAN.md.",
    Fix::Command("plan-project"),
);

const PROJECT_DISCUSSED: Requirement = skippable(
    Check::Marked(paths::PROJECT_DISCUSSION),
    "PROJECT-DISCUSSION.md not found.",
    Fix::Command("discuss-project"),
    Fix::Command("skip discuss-project"),
);

const PROJECT_RESEARCHED: Requirement = skippable(
    Check::Marked(paths::PROJECT_RESEARCH),
    "PROJECT-RESEARCH.md not found.",
    Fix::Command("research-project"),
    Fix::Command("skip research-project"),
);

const PHASE_DISCUSSED: Requirement = skippable(
    Check::Marked("PHASE-{N}-DISCUSSION.md"),
    "PHASE-{N}-DISCUSSION.md not found.",
    Fix::Command("discuss-phase {N}"),
    Fix::Command("skip discuss-phase {N}"),
);

const PHASE_RESEARCHED: Requirement = skippable(
    Check::Marked("PHASE-{N}-RESEARCH.md"),
    "PHASE-{N}-RESEARCH.md not found.",
    Fix::Command("research-phase {N}"),
    Fix::Command("skip research-phase {N}"),
);

const PHASE_PLANNED: Requirement = req(
    Check::File("PHASE-{N}-PLAN.md"),
    "PHASE-{N}-PLAN.md not found.",
    Fix::Command("plan-phase {N}"),
);

const CODEBASE_MAPPED: Requirement = req(
    Check::CodebaseMap,
    "No codebase map found.",
    Fix::Command("map"),
);

/// The prerequisite rule for `command`.
pub fn rule_for(command: LifecycleCommand) -> PrereqRule {
    use LifecycleCommand::*;

    let (hard, soft) = match command {
        NewProject => (vec![], vec![CODEBASE_MAPPED]),
        DiscussProject => (vec![PROJECT_DEFINED], vec![CODEBASE_MAPPED]),
        ResearchProject => (vec![PROJECT_DEFINED, PROJECT_DISCUSSED], vec![CODEBASE_MAPPED]),
        PlanProject => (
            vec![PROJECT_DEFINED, PROJECT_DISCUSSED, PROJECT_RESEARCHED],
            vec![CODEBASE_MAPPED],
        ),
        DiscussPhase => (vec![PROJECT_PLANNED, PHASE_DECLARED], vec![]),
        ResearchPhase => (vec![PROJECT_PLANNED, PHASE_DECLARED, PHASE_DISCUSSED], vec![]),
        PlanPhase => (
            vec![PROJECT_PLANNED, PHASE_DECLARED, PHASE_DISCUSSED, PHASE_RESEARCHED],
            vec![],
        ),
        ExecutePhase => (
            vec![PHASE_DECLARED, PHASE_PLANNED],
            vec![req(
                Check::File(paths::PROJECT_MD),
                "PROJECT.md not found. Executor will lack project context.",
                Fix::Command("new-project"),
            )],
        ),
        VerifyPhase => (
            vec![
                PHASE_DECLARED,
                PHASE_PLANNED,
                req(
                    Check::File(paths::PROJECT_SUMMARY),
                    "PROJECT-SUMMARY.md not found. Phase has not been executed.",
                    Fix::Command("execute-phase {N}"),
                ),
                req(
                    Check::SummaryHeading,
                    "PROJECT-SUMMARY.md has no Phase {N} heading. Phase has not been executed.",
                    Fix::Command("execute-phase {N}"),
                ),
            ],
            vec![],
        ),
        VerifyProject => (
            vec![],
            vec![
                req(
                    Check::File(paths::PROJECT_MD),
                    "PROJECT.md not found.",
                    Fix::Command("new-project"),
                ),
                req(
                    Check::File(paths::PROJECT_SUMMARY),
                    "No execution history.",
                    Fix::Text("Execute phases first."),
                ),
            ],
        ),
        EndProject => (
            vec![req(
                Check::File(paths::PROJECT_MD),
                "No project to end.",
                Fix::Command("new-project"),
            )],
            vec![],
        ),
    };

    PrereqRule {
        command,
        hard,
        soft,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PLAN_1: &str = "### Phase 1: Setup\n";
    const DONE: &str = "---\nskipped: false\n---\n# Notes\n";

    fn check(
        command: LifecycleCommand,
        phase: Option<u32>,
        files: &[(&str, &str)],
    ) -> (Option<Failure>, Vec<Failure>) {
        let root = TempDir::new().unwrap();
        let snapshot = ProjectSnapshot::from_files(files.iter().copied());
        let ctx = CheckContext {
            root: root.path(),
            snapshot: &snapshot,
            phase,
            namespace: "gsd",
        };
        let rule = rule_for(command);
        (rule.first_hard_failure(&ctx), rule.soft_failures(&ctx))
    }

    #[test]
    fn every_command_has_a_rule() {
        for &cmd in LifecycleCommand::all() {
            assert_eq!(rule_for(cmd).command, cmd);
        }
    }

    #[test]
    fn discussion_missing_offers_skip() {
        let (hard, _) = check(
            LifecycleCommand::PlanPhase,
            Some(1),
            &[("PROJECT.md", "# P\n"), ("PROJECT-PLAN.md", PLAN_1)],
        );
        let hard = hard.unwrap();
        assert_eq!(hard.message, "PHASE-1-DISCUSSION.md not found.");
        assert_eq!(hard.fix, "/gsd:discuss-phase 1");
        assert_eq!(hard.skip.as_deref(), Some("/gsd:skip discuss-phase 1"));
    }

    #[test]
    fn first_hard_failure_wins() {
        let (hard, _) = check(LifecycleCommand::PlanProject, None, &[]);
        assert_eq!(hard.unwrap().message, "No project defined.");
    }

    #[test]
    fn unmarked_discussion_is_unrecognized() {
        let (hard, _) = check(
            LifecycleCommand::ResearchProject,
            None,
            &[("PROJECT.md", "# P\n"), ("PROJECT-DISCUSSION.md", "# just notes\n")],
        );
        let hard = hard.unwrap();
        assert!(hard.message.contains("unrecognized format"));
        assert!(hard.message.starts_with("PROJECT-DISCUSSION.md"));
    }

    #[test]
    fn skipped_marker_satisfies_discussion() {
        let (hard, _) = check(
            LifecycleCommand::ResearchProject,
            None,
            &[
                ("PROJECT.md", "# P\n"),
                ("PROJECT-DISCUSSION.md", "---\nskipped: true\n---\n"),
            ],
        );
        assert_eq!(hard, None);
    }

    #[test]
    fn undeclared_phase_blocks_every_phase_command() {
        let files = [
            ("PROJECT.md", "# P\n"),
            ("PROJECT-PLAN.md", PLAN_1),
            ("PHASE-1-DISCUSSION.md", DONE),
            ("PHASE-1-RESEARCH.md", DONE),
            ("PHASE-1-PLAN.md", "# plan\n"),
        ];
        for cmd in [
            LifecycleCommand::DiscussPhase,
            LifecycleCommand::ResearchPhase,
            LifecycleCommand::PlanPhase,
            LifecycleCommand::ExecutePhase,
            LifecycleCommand::VerifyPhase,
        ] {
            let (hard, _) = check(cmd, Some(3), &files);
            assert_eq!(
                hard.unwrap().message,
                "Phase 3 not found in PROJECT-PLAN.md.",
                "{cmd}"
            );
        }
    }

    #[test]
    fn gap_in_plan_numbering_counts_as_phase() {
        let files = [
            ("PROJECT.md", "# P\n"),
            ("PROJECT-PLAN.md", "## Phase 1: Setup\n### Phase 3: Polish\n"),
        ];
        let (hard, _) = check(LifecycleCommand::DiscussPhase, Some(2), &files);
        assert_eq!(hard, None);
        let (hard, _) = check(LifecycleCommand::PlanPhase, Some(2), &files);
        assert_eq!(hard.unwrap().message, "PHASE-2-DISCUSSION.md not found.");
        let (hard, _) = check(LifecycleCommand::DiscussPhase, Some(4), &files);
        assert_eq!(hard.unwrap().message, "Phase 4 not found in PROJECT-PLAN.md.");
        let (hard, _) = check(LifecycleCommand::DiscussPhase, Some(0), &files);
        assert_eq!(hard.unwrap().message, "Phase 0 not found in PROJECT-PLAN.md.");
    }

    #[test]
    fn phaseless_plan_blocks_phase_commands() {
        let (hard, _) = check(
            LifecycleCommand::DiscussPhase,
            Some(1),
            &[("PROJECT.md", "# P\n"), ("PROJECT-PLAN.md", "# Plan\nNo phases yet.\n")],
        );
        assert_eq!(hard.unwrap().message, "Phase 1 not found in PROJECT-PLAN.md.");
    }

    #[test]
    fn execute_without_plan_file_names_phase_plan() {
        let (hard, _) = check(LifecycleCommand::ExecutePhase, Some(1), &[]);
        assert_eq!(hard.unwrap().message, "PHASE-1-PLAN.md not found.");
    }

    #[test]
    fn execute_warns_without_project_md() {
        let (hard, soft) = check(
            LifecycleCommand::ExecutePhase,
            Some(1),
            &[("PHASE-1-PLAN.md", "# plan\n")],
        );
        assert_eq!(hard, None);
        assert_eq!(soft.len(), 1);
        assert!(soft[0].message.starts_with("PROJECT.md not found."));
    }

    #[test]
    fn verify_phase_needs_summary_heading() {
        let base = [("PHASE-1-PLAN.md", "# plan\n")];
        let (hard, _) = check(LifecycleCommand::VerifyPhase, Some(1), &base);
        assert!(hard.unwrap().message.starts_with("PROJECT-SUMMARY.md not found."));

        let (hard, _) = check(
            LifecycleCommand::VerifyPhase,
            Some(1),
            &[base[0], ("PROJECT-SUMMARY.md", "## Phase 2: Other\n")],
        );
        assert!(hard.unwrap().message.contains("no Phase 1 heading"));

        let (hard, _) = check(
            LifecycleCommand::VerifyPhase,
            Some(1),
            &[base[0], ("PROJECT-SUMMARY.md", "## Phase 1: Setup\n")],
        );
        assert_eq!(hard, None);
    }

    #[test]
    fn codebase_map_directory_or_file_satisfies() {
        let root = TempDir::new().unwrap();
        let snapshot = ProjectSnapshot::default();
        let ctx = CheckContext {
            root: root.path(),
            snapshot: &snapshot,
            phase: None,
            namespace: "gsd",
        };
        let rule = rule_for(LifecycleCommand::NewProject);
        assert_eq!(rule.soft_failures(&ctx)[0].fix, "/gsd:map");

        std::fs::create_dir_all(root.path().join(".planning/codebase")).unwrap();
        assert_eq!(rule.soft_failures(&ctx).len(), 1);
        std::fs::write(root.path().join(".planning/codebase/stack.md"), "# Stack\n").unwrap();
        assert!(rule.soft_failures(&ctx).is_empty());
    }

    #[test]
    fn verify_project_only_warns() {
        let (hard, soft) = check(LifecycleCommand::VerifyProject, None, &[]);
        assert_eq!(hard, None);
        assert_eq!(soft.len(), 2);
        assert_eq!(soft[1].fix, "Execute phases first.");
    }

    #[test]
    fn empty_namespace_renders_bare_commands() {
        let root = TempDir::new().unwrap();
        let snapshot = ProjectSnapshot::default();
        let ctx = CheckContext {
            root: root.path(),
            snapshot: &snapshot,
            phase: Some(2),
            namespace: "",
        };
        let failure = rule_for(LifecycleCommand::ExecutePhase)
            .first_hard_failure(&ctx)
            .unwrap();
        assert_eq!(failure.fix, "/plan-phase 2");
    }
}
