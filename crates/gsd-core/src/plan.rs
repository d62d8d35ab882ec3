use regex::Regex;
use std::sync::OnceLock;

static PHASE_HEADING_RE: OnceLock<Regex> = OnceLock::new();

fn phase_heading_re() -> &'static Regex {
    PHASE_HEADING_RE.get_or_init(|| Regex::new(r"(?m)^#{2,3} Phase (\d+):").unwrap())
}

/// Largest phase number a heading may carry. Headings outside `1..=MAX_PHASE`
/// are malformed and ignored.
pub const MAX_PHASE: u32 = 999;

/// Highest phase number declared by `## Phase N:` or `### Phase N:` headings.
///
/// `None` means the plan declares no phases at all.
pub fn max_phase(plan: &str) -> Option<u32> {
    phase_heading_re()
        .captures_iter(plan)
        .filter_map(|c| c[1].parse::<u32>().ok())
        .filter(|n| (1..=MAX_PHASE).contains(n))
        .max()
}

/// True when `n` falls within the plan's phases, `1..=max_phase`. Gaps in the
/// numbering still count as phases, matching how the resolver walks them.
pub fn covers_phase(plan: &str, n: u32) -> bool {
    n >= 1 && max_phase(plan).is_some_and(|max| n <= max)
}

/// True when the summary carries the `## Phase N:` completion heading.
///
/// Only depth-2 headings count; a phase is executed once its summary section
/// has been appended.
pub fn summary_has_phase(summary: &str, n: u32) -> bool {
    let prefix = format!("## Phase {n}:");
    summary.lines().any(|line| line.starts_with(&prefix))
}
