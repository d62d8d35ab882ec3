use crate::output::{print_field, print_json};
use anyhow::Context;
use clap::Subcommand;
use gsd_core::config::{resolve_model, Config, ModelProfile};
use std::path::Path;

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show the effective configuration
    Show,

    /// Show the model alias an agent runs on under the configured profile
    Model {
        /// Agent type, e.g. gsd-planner
        agent: String,
        /// Override the configured profile
        #[arg(long)]
        profile: Option<ModelProfile>,
    },

    /// Set the model profile: quality, balanced or budget
    SetProfile { profile: ModelProfile },
}

pub fn run(root: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(root, json),
        ConfigSubcommand::Model { agent, profile } => model(root, &agent, profile, json),
        ConfigSubcommand::SetProfile { profile } => set_profile(root, profile),
    }
}

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    if json {
        return print_json(&config);
    }
    print_field("Profile", config.model_profile);
    if config.namespace.is_empty() {
        print_field("Namespace", "(none)");
    } else {
        print_field("Namespace", &config.namespace);
    }
    Ok(())
}

fn model(root: &Path, agent: &str, profile: Option<ModelProfile>, json: bool) -> anyhow::Result<()> {
    let (profile, model) = match profile {
        Some(p) => (p, resolve_model(p, agent)),
        None => {
            let config = Config::load(root).context("failed to load config")?;
            (config.model_profile, config.model_for(agent))
        }
    };
    if json {
        print_json(&serde_json::json!({
            "agent": agent,
            "profile": profile,
            "model": model,
        }))
    } else {
        println!("{model}");
        Ok(())
    }
}

fn set_profile(root: &Path, profile: ModelProfile) -> anyhow::Result<()> {
    let mut config = Config::load(root).context("failed to load config")?;
    config.model_profile = profile;
    config.save(root).context("failed to write config")?;
    println!("Model profile set to {profile}.");
    Ok(())
}
