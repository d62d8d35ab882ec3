//! Prerequisite gate run before a lifecycle command executes.
//!
//! The gate never fails: unknown commands, unreadable files and malformed hook
//! input all resolve to a silent pass so the caller is never interrupted by
//! the gate's own problems.

use crate::config::Config;
use crate::prereqs::{self, CheckContext, Failure};
use crate::resolver::{self, LifecycleState};
use crate::snapshot::ProjectSnapshot;
use crate::types::{Invocation, LifecycleCommand};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Meta commands that never touch lifecycle state.
pub const UTILITY_COMMANDS: &[&str] = &["help", "health", "status", "map", "todo", "debug", "skip"];

const BEGIN: &str = "---GSD PREREQ---";
const END: &str = "---END GSD PREREQ---";

// ---------------------------------------------------------------------------
// Verdict / GateReport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub message: String,
    pub fix: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Verdict {
    Allow,
    HardBlock {
        reason: String,
        fix: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        skip: Option<String>,
    },
    SoftWarn {
        warnings: Vec<Warning>,
    },
}

impl From<Failure> for Verdict {
    fn from(f: Failure) -> Self {
        Verdict::HardBlock {
            reason: f.message,
            fix: f.fix,
            skip: f.skip,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateReport {
    /// The requested command as the user would type it, e.g. `/gsd:plan-phase 2`.
    pub label: String,
    pub verdict: Verdict,
    /// Advisory note when the request differs from the suggested next command.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deviation: Option<String>,
}

impl GateReport {
    fn pass(label: String) -> Self {
        Self {
            label,
            verdict: Verdict::Allow,
            deviation: None,
        }
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self.verdict, Verdict::HardBlock { .. })
    }

    /// Nothing to report at all.
    pub fn is_silent(&self) -> bool {
        self.verdict == Verdict::Allow && self.deviation.is_none()
    }

    /// Framed block text for stderr, only for a hard block.
    pub fn block_message(&self) -> Option<String> {
        let Verdict::HardBlock { reason, fix, skip } = &self.verdict else {
            return None;
        };
        let mut lines = vec![
            BEGIN.to_string(),
            format!("Cannot run {}.", self.label),
            String::new(),
            format!("MISSING: {reason}"),
            format!("FIX: Run {fix} first."),
        ];
        if let Some(skip) = skip {
            lines.push(format!("OR: Run {skip} to skip this step."));
        }
        lines.push(String::new());
        if let Some(note) = &self.deviation {
            lines.push(note.clone());
            lines.push(String::new());
        }
        lines.push("Tell the user what is missing and which command to run next.".to_string());
        lines.push(END.to_string());
        Some(lines.join("\n"))
    }

    /// Framed advisory text for a command that will still run.
    pub fn advisory(&self) -> Option<String> {
        if self.is_blocked() || self.is_silent() {
            return None;
        }
        let mut lines = vec![
            BEGIN.to_string(),
            format!("{}: prerequisite warning", self.label),
            String::new(),
        ];
        if let Verdict::SoftWarn { warnings } = &self.verdict {
            for w in warnings {
                lines.push(format!("WARNING: {}", w.message));
                lines.push(format!("SUGGESTED: Run {}", w.fix));
                lines.push(String::new());
            }
        }
        if let Some(note) = &self.deviation {
            lines.push(note.clone());
            lines.push(String::new());
        }
        lines.push("Mention this to the user, then proceed with the command.".to_string());
        lines.push(END.to_string());
        Some(lines.join("\n"))
    }

    pub fn hook_output(&self) -> Option<HookOutput> {
        self.advisory().map(HookOutput::pre_tool_use)
    }
}

// ---------------------------------------------------------------------------
// Hook I/O
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct HookInput {
    #[serde(default)]
    pub tool_input: Option<ToolInput>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ToolInput {
    #[serde(default)]
    pub skill: Option<String>,
    #[serde(default)]
    pub args: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HookOutput {
    pub hook_specific_output: HookSpecificOutput,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HookSpecificOutput {
    pub hook_event_name: &'static str,
    pub additional_context: String,
}

impl HookOutput {
    fn pre_tool_use(additional_context: String) -> Self {
        Self {
            hook_specific_output: HookSpecificOutput {
                hook_event_name: "PreToolUse",
                additional_context,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Leading integer of an argument string, e.g. `2 --fast` gives 2.
pub fn parse_phase(args: &str) -> Option<u32> {
    let args = args.trim_start();
    let end = args
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(args.len());
    args[..end].parse().ok()
}

/// Gate a command invocation. `skill` may carry a leading `/` and the
/// configured namespace prefix.
pub fn check(root: &Path, config: &Config, skill: &str, args: &str) -> GateReport {
    let ns = config.namespace.as_str();
    let name = config.normalize_command(skill);
    let Ok(command) = name.parse::<LifecycleCommand>() else {
        if !UTILITY_COMMANDS.contains(&name) {
            tracing::debug!(command = name, "not a lifecycle command, passing");
        }
        return GateReport::pass(prereqs::command_ref(ns, name));
    };

    let phase = if command.is_phase_scoped() {
        let Some(n) = parse_phase(args) else {
            let label = prereqs::command_ref(ns, command.as_str());
            return GateReport {
                verdict: Verdict::HardBlock {
                    reason: "Phase number is required.".to_string(),
                    fix: format!("{label} N (where N is the phase number)"),
                    skip: None,
                },
                label,
                deviation: None,
            };
        };
        Some(n)
    } else {
        None
    };

    let invocation = Invocation { command, phase };
    let snapshot = ProjectSnapshot::load(root);
    let ctx = CheckContext {
        root,
        snapshot: &snapshot,
        phase,
        namespace: ns,
    };
    let rule = prereqs::rule_for(command);

    let verdict = match rule.first_hard_failure(&ctx) {
        Some(failure) => Verdict::from(failure),
        None => {
            let warnings: Vec<Warning> = rule
                .soft_failures(&ctx)
                .into_iter()
                .map(|f| Warning {
                    message: f.message,
                    fix: f.fix,
                })
                .collect();
            if warnings.is_empty() {
                Verdict::Allow
            } else {
                Verdict::SoftWarn { warnings }
            }
        }
    };

    let state = resolver::resolve_snapshot(&snapshot);
    let label = invocation.qualified(ns);
    let deviation = deviation_note(&state, &invocation, &label, ns);
    tracing::debug!(command = %label, blocked = matches!(verdict, Verdict::HardBlock { .. }), "gate evaluated");

    GateReport {
        label,
        verdict,
        deviation,
    }
}

/// Gate a raw PreToolUse hook payload. `None` for input the gate does not
/// understand, which the caller treats as a silent pass.
pub fn check_hook_input(root: &Path, config: &Config, raw: &str) -> Option<GateReport> {
    let input: HookInput = match serde_json::from_str(raw) {
        Ok(input) => input,
        Err(e) => {
            tracing::debug!(error = %e, "unparseable hook input");
            return None;
        }
    };
    let tool = input.tool_input?;
    let skill = tool.skill?;
    Some(check(root, config, &skill, tool.args.as_deref().unwrap_or("")))
}

fn deviation_note(
    state: &LifecycleState,
    requested: &Invocation,
    label: &str,
    namespace: &str,
) -> Option<String> {
    match &state.next_command {
        Some(next) if next == requested => None,
        Some(next) => Some(format!(
            "Out of sequence: {label} requested, but the suggested next command is {}.",
            next.qualified(namespace)
        )),
        None => Some(format!(
            "Out of sequence: {label} requested, but the project is already complete."
        )),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
