use crate::output::{print_field, print_json};
use gsd_core::config::Config;
use gsd_core::resolver::resolve_state;
use gsd_core::step::render_segments;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let state = resolve_state(root);

    if json {
        return print_json(&state);
    }

    let config = Config::load_or_default(root);
    print_field("State", state.state);
    match &state.next_command {
        Some(next) => print_field("Next", next.qualified(&config.namespace)),
        None => print_field("Next", "(none)"),
    }
    print_field("Context", &state.context);
    if let Some(total) = state.total_phases {
        match state.current_phase {
            Some(current) => print_field("Phase", format!("{current} of {total}")),
            None => print_field("Phases", total),
        }
    }
    if !state.steps.is_empty() {
        print_field("Steps", render_segments(&state.steps));
        if let Some(active) = state.active_step() {
            print_field("Active", &active.id);
        }
    }
    Ok(())
}
