use crate::paths;
use crate::snapshot::ProjectSnapshot;
use crate::types::{Invocation, LifecycleCommand, Position};

// ---------------------------------------------------------------------------
// RouteContext / RouteRule
// ---------------------------------------------------------------------------

pub struct RouteContext<'a> {
    pub snapshot: &'a ProjectSnapshot,
    /// The phase under evaluation; `None` for project and completion rules.
    pub phase: Option<u32>,
}

impl RouteContext<'_> {
    fn n(&self) -> u32 {
        self.phase.unwrap_or(0)
    }

    fn has(&self, name: &str) -> bool {
        self.snapshot.has(name)
    }
}

/// A fn-pointer routing rule. Rules are evaluated in order, first match wins.
pub struct RouteRule {
    pub id: &'static str,
    pub condition: fn(&RouteContext) -> bool,
    pub position: fn(&RouteContext) -> Position,
    pub next_command: fn(&RouteContext) -> Option<Invocation>,
    pub context: fn(&RouteContext) -> String,
}

/// The outcome of the first matching rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub rule: &'static str,
    pub position: Position,
    pub next_command: Option<Invocation>,
    pub context: String,
}

impl RouteRule {
    fn apply(&self, ctx: &RouteContext) -> Route {
        Route {
            rule: self.id,
            position: (self.position)(ctx),
            next_command: (self.next_command)(ctx),
            context: (self.context)(ctx),
        }
    }
}

/// First rule whose condition holds.
pub fn first_match(rules: &[RouteRule], ctx: &RouteContext) -> Option<Route> {
    rules.iter().find(|r| (r.condition)(ctx)).map(|r| r.apply(ctx))
}

macro_rules! route {
    (
        id: $id:expr,
        when: $cond:expr,
        position: $pos:expr,
        next: $next:expr,
        context: $ctx:expr
    ) => {
        RouteRule {
            id: $id,
            condition: $cond,
            position: $pos,
            next_command: $next,
            context: $ctx,
        }
    };
}

fn project(cmd: LifecycleCommand) -> Option<Invocation> {
    Some(Invocation::project(cmd))
}

// ---------------------------------------------------------------------------
// Project-level rules
// ---------------------------------------------------------------------------

/// Routing before any phases are declared. Discussion and research presence
/// decides the recommendation; a later artifact always moves routing forward.
pub fn project_rules() -> Vec<RouteRule> {
    vec![
        // 1. Nothing to work with
        route! {
            id: "no_project",
            when: |ctx| !ctx.snapshot.has_project(),
            position: |_| Position::NoProject,
            next: |_| project(LifecycleCommand::NewProject),
            context: |_| "No project found.".to_string()
        },
        // 2. Defined, nothing discussed or researched
        route! {
            id: "project_needs_discussion",
            when: |ctx| !ctx.has(paths::PROJECT_PLAN)
                && !ctx.has(paths::PROJECT_DISCUSSION)
                && !ctx.has(paths::PROJECT_RESEARCH),
            position: |_| Position::ProjectDefined,
            next: |_| project(LifecycleCommand::DiscussProject),
            context: |_| "Project defined. Discuss implementation decisions. (skip: /plan-project)".to_string()
        },
        // 3. Discussed, not researched
        route! {
            id: "project_needs_research",
            when: |ctx| !ctx.has(paths::PROJECT_PLAN) && !ctx.has(paths::PROJECT_RESEARCH),
            position: |_| Position::ProjectDefined,
            next: |_| project(LifecycleCommand::ResearchProject),
            context: |_| "Project discussed. Research before planning. (skip: /plan-project)".to_string()
        },
        // 4. Researched, no plan
        route! {
            id: "project_needs_plan",
            when: |ctx| !ctx.has(paths::PROJECT_PLAN),
            position: |_| Position::ProjectDefined,
            next: |_| project(LifecycleCommand::PlanProject),
            context: |_| "Project researched. Create a project plan.".to_string()
        },
        // 5. A plan that declares no phases is not a plan yet
        route! {
            id: "plan_without_phases",
            when: |ctx| ctx.snapshot.total_phases().is_none(),
            position: |_| Position::ProjectDefined,
            next: |_| project(LifecycleCommand::PlanProject),
            context: |_| "Project plan has no phases. Create a project plan.".to_string()
        },
    ]
}

// ---------------------------------------------------------------------------
// Phase-level rules (evaluated once per phase, ascending)
// ---------------------------------------------------------------------------

pub fn phase_rules() -> Vec<RouteRule> {
    vec![
        // 1. No plan, no discussion, no research
        route! {
            id: "phase_needs_discussion",
            when: |ctx| !ctx.has(&paths::phase_plan(ctx.n()))
                && !ctx.has(&paths::phase_discussion(ctx.n()))
                && !ctx.has(&paths::phase_research(ctx.n())),
            position: |ctx| Position::PhaseUnplanned(ctx.n()),
            next: |ctx| Some(Invocation::phase(LifecycleCommand::DiscussPhase, ctx.n())),
            context: |ctx| format!(
                "Phase {n} needs planning. Discuss implementation decisions. (skip: /plan-phase {n})",
                n = ctx.n()
            )
        },
        // 2. Discussed, not researched
        route! {
            id: "phase_needs_research",
            when: |ctx| !ctx.has(&paths::phase_plan(ctx.n()))
                && !ctx.has(&paths::phase_research(ctx.n())),
            position: |ctx| Position::PhaseUnplanned(ctx.n()),
            next: |ctx| Some(Invocation::phase(LifecycleCommand::ResearchPhase, ctx.n())),
            context: |ctx| format!(
                "Phase {n} discussed. Research before planning. (skip: /plan-phase {n})",
                n = ctx.n()
            )
        },
        // 3. Researched, no phase plan
        route! {
            id: "phase_needs_plan",
            when: |ctx| !ctx.has(&paths::phase_plan(ctx.n())),
            position: |ctx| Position::PhaseUnplanned(ctx.n()),
            next: |ctx| Some(Invocation::phase(LifecycleCommand::PlanPhase, ctx.n())),
            context: |ctx| format!("Phase {} researched. Create a phase plan.", ctx.n())
        },
        // 4. Planned, no summary heading
        route! {
            id: "phase_needs_execution",
            when: |ctx| !ctx.snapshot.phase_executed(ctx.n()),
            position: |ctx| Position::PhasePlanned(ctx.n()),
            next: |ctx| Some(Invocation::phase(LifecycleCommand::ExecutePhase, ctx.n())),
            context: |ctx| format!("Phase {} planned. Ready to execute.", ctx.n())
        },
        // 5. Executed, not verified
        route! {
            id: "phase_needs_verification",
            when: |ctx| !ctx.has(&paths::phase_verification(ctx.n())),
            position: |ctx| Position::PhaseExecuted(ctx.n()),
            next: |ctx| Some(Invocation::phase(LifecycleCommand::VerifyPhase, ctx.n())),
            context: |ctx| format!("Phase {} executed. Ready for verification.", ctx.n())
        },
    ]
}

// ---------------------------------------------------------------------------
// Completion rules
// ---------------------------------------------------------------------------

pub fn completion_rules() -> Vec<RouteRule> {
    vec![
        route! {
            id: "needs_project_verification",
            when: |ctx| !ctx.has(paths::PROJECT_VERIFICATION),
            position: |_| Position::AllPhasesVerified,
            next: |_| project(LifecycleCommand::VerifyProject),
            context: |_| "All phases verified. Ready for project verification.".to_string()
        },
        route! {
            id: "project_verified",
            when: |_| true,
            position: |_| Position::ProjectVerified,
            next: |_| None,
            context: |_| "Project complete.".to_string()
        },
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
