//! Lifecycle state resolution.
//!
//! `resolve_state` is a pure function of the on-disk `.planning/project/`
//! contents: it never writes, never caches, and never fails. Unreadable or
//! missing inputs resolve exactly like absent artifacts.

use crate::rules::{completion_rules, first_match, phase_rules, project_rules, Route, RouteContext};
use crate::snapshot::ProjectSnapshot;
use crate::step::{self, LifecycleStep};
use crate::types::{Invocation, Position};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleState {
    pub state: Position,
    pub next_command: Option<Invocation>,
    pub context: String,
    pub steps: Vec<LifecycleStep>,
    pub total_phases: Option<u32>,
    pub current_phase: Option<u32>,
}

impl LifecycleState {
    pub fn is_complete(&self) -> bool {
        self.state == Position::ProjectVerified
    }

    pub fn active_step(&self) -> Option<&LifecycleStep> {
        self.steps
            .iter()
            .find(|s| s.status == crate::types::StepStatus::Active)
    }

    /// Steps still expecting work: neither done nor skipped.
    pub fn incomplete_steps(&self) -> impl Iterator<Item = &LifecycleStep> {
        self.steps.iter().filter(|s| !s.status.is_settled())
    }
}

/// Resolve the lifecycle position of the project rooted at `root`.
pub fn resolve_state(root: &Path) -> LifecycleState {
    resolve_snapshot(&ProjectSnapshot::load(root))
}

/// Resolve from an already captured snapshot.
pub fn resolve_snapshot(snap: &ProjectSnapshot) -> LifecycleState {
    let route = route(snap);
    tracing::debug!(rule = route.rule, state = %route.position, "routed lifecycle state");

    if route.position == Position::NoProject {
        return LifecycleState {
            state: route.position,
            next_command: route.next_command,
            context: route.context,
            steps: Vec::new(),
            total_phases: None,
            current_phase: None,
        };
    }

    let total_phases = snap.total_phases();
    let mut steps = step::build_steps(snap, total_phases);
    step::assign_statuses(&mut steps);
    let current_phase = step::current_phase(&steps);

    LifecycleState {
        state: route.position,
        next_command: route.next_command,
        context: route.context,
        steps,
        total_phases,
        current_phase,
    }
}

fn route(snap: &ProjectSnapshot) -> Route {
    let project_ctx = RouteContext {
        snapshot: snap,
        phase: None,
    };
    if let Some(route) = first_match(&project_rules(), &project_ctx) {
        return route;
    }

    let total = snap.total_phases().unwrap_or(0);
    let per_phase = phase_rules();
    for n in 1..=total {
        let ctx = RouteContext {
            snapshot: snap,
            phase: Some(n),
        };
        if let Some(route) = first_match(&per_phase, &ctx) {
            return route;
        }
    }

    // completion_rules ends with an unconditional rule
    first_match(&completion_rules(), &project_ctx).unwrap_or_else(|| Route {
        rule: "project_verified",
        position: Position::ProjectVerified,
        next_command: None,
        context: "Project complete.".to_string(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
