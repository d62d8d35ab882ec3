use crate::frontmatter::SkipMarker;
use crate::paths;
use crate::snapshot::ProjectSnapshot;
use crate::types::{Scope, Stage, StepStatus};
use serde::Serialize;

// ---------------------------------------------------------------------------
// ArtifactCheck
// ---------------------------------------------------------------------------

/// What proves a step complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactCheck {
    /// A named file under `.planning/project/`.
    File(String),
    /// The plan file, counted only when it declares at least one phase.
    DeclaredPlan,
    /// A `## Phase N:` heading in PROJECT-SUMMARY.md.
    SummaryHeading(u32),
}

impl ArtifactCheck {
    fn file(name: impl Into<String>) -> Self {
        ArtifactCheck::File(name.into())
    }

    fn is_satisfied(&self, snap: &ProjectSnapshot) -> bool {
        match self {
            ArtifactCheck::File(name) => snap.has(name),
            ArtifactCheck::DeclaredPlan => {
                snap.has(paths::PROJECT_PLAN) && snap.total_phases().is_some()
            }
            ArtifactCheck::SummaryHeading(n) => snap.phase_executed(*n),
        }
    }

    pub fn file_name(&self) -> Option<&str> {
        match self {
            ArtifactCheck::File(name) => Some(name),
            ArtifactCheck::DeclaredPlan => Some(paths::PROJECT_PLAN),
            ArtifactCheck::SummaryHeading(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// LifecycleStep
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleStep {
    pub id: String,
    pub label: &'static str,
    #[serde(skip)]
    pub stage: Stage,
    #[serde(skip)]
    pub scope: Scope,
    #[serde(skip)]
    pub artifact: ArtifactCheck,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_marker: Option<bool>,
    #[serde(skip)]
    marker: SkipMarker,
    pub status: StepStatus,
}

impl LifecycleStep {
    pub fn new(stage: Stage, scope: Scope, artifact: ArtifactCheck) -> Self {
        let id = match scope {
            Scope::Project => format!("project-{}", stage.label()),
            Scope::Phase(n) => format!("phase-{n}-{}", stage.label()),
        };
        Self {
            id,
            label: stage.label(),
            stage,
            scope,
            artifact,
            completed: false,
            skip_marker: None,
            marker: SkipMarker::Absent,
            status: StepStatus::Pending,
        }
    }

    /// Set completion, and the skip marker for discussion/research steps.
    pub fn observe(mut self, completed: bool, marker: SkipMarker) -> Self {
        self.completed = completed;
        if self.stage.is_skippable() {
            self.marker = marker;
            self.skip_marker = marker.as_bool();
        }
        self
    }

    pub fn marker(&self) -> SkipMarker {
        self.marker
    }

    /// Status for a step that is behind the active position (or in a
    /// finished list). An explicit marker wins over ordering inference.
    fn settled_status(&self) -> StepStatus {
        match self.marker {
            SkipMarker::Skipped => StepStatus::Skipped,
            SkipMarker::NotSkipped => StepStatus::Done,
            SkipMarker::Absent if self.completed => StepStatus::Done,
            SkipMarker::Absent => StepStatus::Skipped,
        }
    }
}

// ---------------------------------------------------------------------------
// Canonical template
// ---------------------------------------------------------------------------

/// Steps in canonical order: four project steps, five per declared phase, then
/// project verification. Without declared phases only the four project steps
/// are produced.
pub fn template(total_phases: Option<u32>) -> Vec<LifecycleStep> {
    let mut steps = vec![
        LifecycleStep::new(Stage::Define, Scope::Project, ArtifactCheck::file(paths::PROJECT_MD)),
        LifecycleStep::new(
            Stage::Discuss,
            Scope::Project,
            ArtifactCheck::file(paths::PROJECT_DISCUSSION),
        ),
        LifecycleStep::new(
            Stage::Research,
            Scope::Project,
            ArtifactCheck::file(paths::PROJECT_RESEARCH),
        ),
        LifecycleStep::new(Stage::Plan, Scope::Project, ArtifactCheck::DeclaredPlan),
    ];

    let Some(total) = total_phases else {
        return steps;
    };

    for n in 1..=total {
        let scope = Scope::Phase(n);
        steps.push(LifecycleStep::new(
            Stage::Discuss,
            scope,
            ArtifactCheck::file(paths::phase_discussion(n)),
        ));
        steps.push(LifecycleStep::new(
            Stage::Research,
            scope,
            ArtifactCheck::file(paths::phase_research(n)),
        ));
        steps.push(LifecycleStep::new(
            Stage::Plan,
            scope,
            ArtifactCheck::file(paths::phase_plan(n)),
        ));
        steps.push(LifecycleStep::new(
            Stage::Execute,
            scope,
            ArtifactCheck::SummaryHeading(n),
        ));
        steps.push(LifecycleStep::new(
            Stage::Verify,
            scope,
            ArtifactCheck::file(paths::phase_verification(n)),
        ));
    }
    steps.push(LifecycleStep::new(
        Stage::Verify,
        Scope::Project,
        ArtifactCheck::file(paths::PROJECT_VERIFICATION),
    ));
    steps
}

/// Build the canonical step list and compute completion from the snapshot.
pub fn build_steps(snap: &ProjectSnapshot, total_phases: Option<u32>) -> Vec<LifecycleStep> {
    template(total_phases)
        .into_iter()
        .map(|step| {
            let completed = step.artifact.is_satisfied(snap);
            let marker = step
                .artifact
                .file_name()
                .map(|name| snap.marker(name))
                .unwrap_or_default();
            step.observe(completed, marker)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Status assignment
// ---------------------------------------------------------------------------

/// Assign a status to every step and return the active index, if any.
///
/// The active step is the leftmost incomplete step with no completed step
/// after it. Everything before it settles to done or skipped, everything after
/// it is pending. With no active step every step settles.
pub fn assign_statuses(steps: &mut [LifecycleStep]) -> Option<usize> {
    let last_completed = steps.iter().rposition(|s| s.completed);
    let first_open = last_completed.map_or(0, |i| i + 1);
    let active = (first_open < steps.len()).then_some(first_open);

    for (i, step) in steps.iter_mut().enumerate() {
        step.status = match active {
            Some(a) if i == a => StepStatus::Active,
            Some(a) if i > a => StepStatus::Pending,
            _ => step.settled_status(),
        };
    }
    active
}

/// Phase owning the active step; `None` when nothing is active or the active
/// step is project-level.
pub fn current_phase(steps: &[LifecycleStep]) -> Option<u32> {
    steps
        .iter()
        .find(|s| s.status == StepStatus::Active)
        .and_then(|s| s.scope.phase())
}

/// Glyph row grouped by scope: project steps, one segment per phase, then
/// project verification, separated by `│`.
pub fn render_segments(steps: &[LifecycleStep]) -> String {
    let mut out = String::new();
    let mut prev: Option<Scope> = None;
    for step in steps {
        if prev.is_some_and(|p| p != step.scope) {
            out.push('│');
        }
        out.push(step.status.glyph());
        prev = Some(step.scope);
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn statuses(steps: &[LifecycleStep]) -> Vec<StepStatus> {
        steps.iter().map(|s| s.status).collect()
    }

    fn observed(total: Option<u32>, completed: &[bool]) -> Vec<LifecycleStep> {
        template(total)
            .into_iter()
            .zip(completed.iter().copied())
            .map(|(s, c)| s.observe(c, SkipMarker::Absent))
            .collect()
    }

    #[test]
    fn template_lengths() {
        assert_eq!(template(None).len(), 4);
        assert_eq!(template(Some(1)).len(), 4 + 5 + 1);
        assert_eq!(template(Some(3)).len(), 4 + 15 + 1);
    }

    #[test]
    fn template_ids_in_canonical_order() {
        let ids: Vec<_> = template(Some(1)).into_iter().map(|s| s.id).collect();
        assert_eq!(
            ids,
            vec![
                "project-defined",
                "project-discussed",
                "project-researched",
                "project-planned",
                "phase-1-discussed",
                "phase-1-researched",
                "phase-1-planned",
                "phase-1-executed",
                "phase-1-verified",
                "project-verified",
            ]
        );
    }

    #[test]
    fn leftmost_open_step_is_active() {
        let mut steps = observed(None, &[true, false, false, false]);
        let active = assign_statuses(&mut steps);
        assert_eq!(active, Some(1));
        assert_eq!(
            statuses(&steps),
            vec![
                StepStatus::Done,
                StepStatus::Active,
                StepStatus::Pending,
                StepStatus::Pending
            ]
        );
    }

    #[test]
    fn out_of_order_completion_skips_earlier_gaps() {
        let mut steps = observed(None, &[true, false, false, true]);
        let active = assign_statuses(&mut steps);
        assert_eq!(active, None);
        assert_eq!(
            statuses(&steps),
            vec![
                StepStatus::Done,
                StepStatus::Skipped,
                StepStatus::Skipped,
                StepStatus::Done
            ]
        );
    }

    #[test]
    fn nothing_completed_activates_first_step() {
        let mut steps = observed(None, &[false, false, false, false]);
        assert_eq!(assign_statuses(&mut steps), Some(0));
        assert_eq!(steps[0].status, StepStatus::Active);
    }

    #[test]
    fn empty_list_has_no_active_step() {
        let mut steps: Vec<LifecycleStep> = Vec::new();
        assert_eq!(assign_statuses(&mut steps), None);
        assert_eq!(current_phase(&steps), None);
    }

    #[test]
    fn explicit_markers_win_over_inference() {
        let mut steps: Vec<_> = template(None)
            .into_iter()
            .enumerate()
            .map(|(i, s)| match i {
                1 => s.observe(true, SkipMarker::Skipped),
                2 => s.observe(true, SkipMarker::NotSkipped),
                _ => s.observe(true, SkipMarker::Absent),
            })
            .collect();
        assign_statuses(&mut steps);
        assert_eq!(steps[1].status, StepStatus::Skipped);
        assert_eq!(steps[2].status, StepStatus::Done);
        assert_eq!(steps[1].skip_marker, Some(true));
        assert_eq!(steps[2].skip_marker, Some(false));
    }

    #[test]
    fn markers_ignored_on_non_skippable_steps() {
        let step = LifecycleStep::new(
            Stage::Plan,
            Scope::Phase(1),
            ArtifactCheck::File("PHASE-1-PLAN.md".into()),
        )
        .observe(true, SkipMarker::Skipped);
        assert_eq!(step.skip_marker, None);
        assert_eq!(step.marker(), SkipMarker::Absent);
    }

    #[test]
    fn at_most_one_active_for_every_prefix_pattern() {
        // Every completion pattern over a one-phase template.
        let len = template(Some(1)).len();
        for mask in 0u32..(1 << len) {
            let completed: Vec<bool> = (0..len).map(|i| mask & (1 << i) != 0).collect();
            let mut steps = observed(Some(1), &completed);
            let active = assign_statuses(&mut steps);
            let count = steps
                .iter()
                .filter(|s| s.status == StepStatus::Active)
                .count();
            assert!(count <= 1, "mask {mask:b} produced {count} active steps");
            if active.is_none() {
                assert!(steps.iter().all(|s| s.status.is_settled()));
            }
            for (i, s) in steps.iter().enumerate() {
                if s.completed {
                    assert!(active.map_or(true, |a| i < a));
                }
            }
        }
    }

    #[test]
    fn current_phase_from_active_step() {
        let mut completed = vec![true; 4];
        completed.extend([true, true, true, true, true]);
        completed.extend([false, false, false, false, false]);
        completed.push(false);
        let mut steps = observed(Some(2), &completed);
        assign_statuses(&mut steps);
        assert_eq!(current_phase(&steps), Some(2));
    }

    #[test]
    fn current_phase_none_for_project_step() {
        let mut steps = observed(None, &[true, false, false, false]);
        assign_statuses(&mut steps);
        assert_eq!(current_phase(&steps), None);
    }

    #[test]
    fn segments_group_by_phase() {
        let mut completed = vec![true, false, false, true];
        completed.extend([false, false, true, false, false]);
        completed.push(false);
        let mut steps = observed(Some(1), &completed);
        assign_statuses(&mut steps);
        assert_eq!(render_segments(&steps), "●○○●│○○●◆·│·");
    }

    #[test]
    fn segments_without_phases() {
        let mut steps = observed(None, &[true, false, false, false]);
        assign_statuses(&mut steps);
        assert_eq!(render_segments(&steps), "●◆··");
    }
}
