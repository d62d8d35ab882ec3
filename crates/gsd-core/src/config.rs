use crate::error::{GsdError, Result};
use crate::{io, paths};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

// ---------------------------------------------------------------------------
// ModelProfile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelProfile {
    Quality,
    #[default]
    Balanced,
    Budget,
}

impl ModelProfile {
    pub fn as_str(self) -> &'static str {
        match self {
            ModelProfile::Quality => "quality",
            ModelProfile::Balanced => "balanced",
            ModelProfile::Budget => "budget",
        }
    }
}

impl fmt::Display for ModelProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ModelProfile {
    type Err = GsdError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "quality" => Ok(ModelProfile::Quality),
            "balanced" => Ok(ModelProfile::Balanced),
            "budget" => Ok(ModelProfile::Budget),
            _ => Err(GsdError::InvalidProfile(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Model table
// ---------------------------------------------------------------------------

/// (agent, quality, balanced, budget)
const MODEL_TABLE: &[(&str, &str, &str, &str)] = &[
    ("gsd-planner", "opus", "opus", "sonnet"),
    ("gsd-roadmapper", "opus", "sonnet", "sonnet"),
    ("gsd-executor", "opus", "sonnet", "sonnet"),
    ("gsd-phase-researcher", "opus", "sonnet", "haiku"),
    ("gsd-project-researcher", "opus", "sonnet", "haiku"),
    ("gsd-research-synthesizer", "sonnet", "sonnet", "haiku"),
    ("gsd-debugger", "opus", "sonnet", "sonnet"),
    ("gsd-codebase-mapper", "sonnet", "haiku", "haiku"),
    ("gsd-verifier", "sonnet", "sonnet", "haiku"),
    ("gsd-plan-checker", "sonnet", "sonnet", "haiku"),
    ("gsd-integration-checker", "sonnet", "sonnet", "haiku"),
];

const DEFAULT_MODELS: (&str, &str, &str) = ("opus", "sonnet", "haiku");

/// Model alias for an agent under a profile. `opus` is reported as `inherit`
/// so the agent runs on the caller's model.
pub fn resolve_model(profile: ModelProfile, agent: &str) -> &'static str {
    let (quality, balanced, budget) = MODEL_TABLE
        .iter()
        .find(|(name, ..)| *name == agent)
        .map(|&(_, q, m, b)| (q, m, b))
        .unwrap_or(DEFAULT_MODELS);
    let model = match profile {
        ModelProfile::Quality => quality,
        ModelProfile::Balanced => balanced,
        ModelProfile::Budget => budget,
    };
    if model == "opus" {
        "inherit"
    } else {
        model
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Per-invocation settings, loaded once from `.planning/config.yaml` and
/// passed explicitly to whatever needs them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub model_profile: ModelProfile,
    /// Prefix that namespaced command names carry, e.g. `gsd` in `gsd:plan-phase`.
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

fn default_namespace() -> String {
    "gsd".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_profile: ModelProfile::default(),
            namespace: default_namespace(),
        }
    }
}

impl Config {
    /// Load the config file. A missing file yields the defaults.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(&data)?)
    }

    /// Load the config file, falling back to the defaults on any error.
    pub fn load_or_default(root: &Path) -> Self {
        Self::load(root).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring unreadable .planning/config.yaml");
            Self::default()
        })
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        io::atomic_write(&paths::config_path(root), data.as_bytes())
    }

    pub fn model_for(&self, agent: &str) -> &'static str {
        resolve_model(self.model_profile, agent)
    }

    /// Strip a leading `/` and this config's namespace prefix from a command name.
    pub fn normalize_command<'a>(&self, raw: &'a str) -> &'a str {
        let name = raw.trim();
        let name = name.strip_prefix('/').unwrap_or(name);
        if self.namespace.is_empty() {
            return name;
        }
        name.strip_prefix(self.namespace.as_str())
            .and_then(|rest| rest.strip_prefix(':'))
            .unwrap_or(name)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.model_profile, ModelProfile::Balanced);
        assert_eq!(config.namespace, "gsd");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".planning")).unwrap();
        std::fs::write(dir.path().join(".planning/config.yaml"), "model_profile: budget\n").unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.model_profile, ModelProfile::Budget);
        assert_eq!(config.namespace, "gsd");
    }

    #[test]
    fn malformed_file_errors_but_load_or_default_recovers() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".planning")).unwrap();
        std::fs::write(dir.path().join(".planning/config.yaml"), "model_profile: [oops\n").unwrap();
        assert!(Config::load(dir.path()).is_err());
        assert_eq!(Config::load_or_default(dir.path()), Config::default());
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            model_profile: ModelProfile::Quality,
            namespace: "gsd".to_string(),
        };
        config.save(dir.path()).unwrap();
        assert_eq!(Config::load(dir.path()).unwrap(), config);
    }

    #[test]
    fn model_resolution() {
        assert_eq!(resolve_model(ModelProfile::Balanced, "gsd-planner"), "inherit");
        assert_eq!(resolve_model(ModelProfile::Budget, "gsd-planner"), "sonnet");
        assert_eq!(resolve_model(ModelProfile::Balanced, "gsd-codebase-mapper"), "haiku");
        assert_eq!(resolve_model(ModelProfile::Quality, "unknown-agent"), "inherit");
        assert_eq!(resolve_model(ModelProfile::Budget, "unknown-agent"), "haiku");
    }

    #[test]
    fn model_for_uses_configured_profile() {
        assert_eq!(Config::default().model_for("gsd-planner"), "inherit");
        let config = Config {
            model_profile: ModelProfile::Budget,
            ..Config::default()
        };
        assert_eq!(config.model_for("gsd-planner"), "sonnet");
    }

    #[test]
    fn profile_from_str() {
        assert_eq!("budget".parse::<ModelProfile>().unwrap(), ModelProfile::Budget);
        assert!("cheap".parse::<ModelProfile>().is_err());
    }

    #[test]
    fn normalize_strips_namespace_and_slash() {
        let config = Config::default();
        assert_eq!(config.normalize_command("gsd:plan-phase"), "plan-phase");
        assert_eq!(config.normalize_command("/gsd:plan-phase"), "plan-phase");
        assert_eq!(config.normalize_command("plan-phase"), "plan-phase");
        assert_eq!(config.normalize_command("gsdx:plan-phase"), "gsdx:plan-phase");
        assert_eq!(config.normalize_command("other:thing"), "other:thing");
    }
}
