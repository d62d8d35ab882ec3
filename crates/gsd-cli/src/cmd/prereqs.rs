use crate::output::print_json;
use gsd_core::config::Config;
use gsd_core::gate;
use std::io::Read;
use std::path::Path;

const EXIT_BLOCKED: i32 = 2;

/// Run the gate and return the process exit code: 2 for a hard block, 0 for
/// everything else including the gate's own failures.
pub fn run(root: &Path, command: Option<&str>, args: Option<&str>, json: bool) -> i32 {
    let config = Config::load_or_default(root);

    let report = match command {
        Some(command) => gate::check(root, &config, command, args.unwrap_or("")),
        None => {
            let mut input = String::new();
            if let Err(e) = std::io::stdin().read_to_string(&mut input) {
                tracing::debug!(error = %e, "failed to read hook input");
                return 0;
            }
            match gate::check_hook_input(root, &config, &input) {
                Some(report) => report,
                None => return 0,
            }
        }
    };

    let code = if report.is_blocked() { EXIT_BLOCKED } else { 0 };

    if json {
        if let Err(e) = print_json(&report) {
            tracing::debug!(error = %e, "failed to print gate report");
        }
        return code;
    }

    if let Some(message) = report.block_message() {
        eprint!("{message}");
    } else if let Some(output) = report.hook_output() {
        match serde_json::to_string(&output) {
            Ok(s) => print!("{s}"),
            Err(e) => tracing::debug!(error = %e, "failed to encode hook output"),
        }
    }
    code
}
