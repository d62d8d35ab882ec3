use crate::output::print_json;
use gsd_core::config::Config;
use gsd_core::resolver::resolve_state;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let state = resolve_state(root);

    if json {
        let value = serde_json::json!({
            "state": state.state,
            "nextCommand": state.next_command,
            "context": state.context,
        });
        return print_json(&value);
    }

    let config = Config::load_or_default(root);
    match &state.next_command {
        Some(next) => {
            println!("{}", next.qualified(&config.namespace));
            println!("{}", state.context);
        }
        None => println!("Project complete."),
    }
    Ok(())
}
