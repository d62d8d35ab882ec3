use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

/// Print `label:` padded so values line up in a column.
pub fn print_field(label: &str, value: impl std::fmt::Display) {
    println!("{:<10}{value}", format!("{label}:"));
}
