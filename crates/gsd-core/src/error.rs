use thiserror::Error;

#[derive(Debug, Error)]
pub enum GsdError {
    #[error("no project defined: run /new-project")]
    NoProject,

    #[error("phase number is required for '{0}'")]
    PhaseNumberRequired(String),

    #[error("phase {0} is outside the phases declared in PROJECT-PLAN.md")]
    PhaseNotDeclared(u32),

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("'{0}' has no skippable step")]
    NotSkippable(String),

    #[error("artifact already exists: {0}")]
    ArtifactExists(String),

    #[error("invalid model profile '{0}': expected quality, balanced or budget")]
    InvalidProfile(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, GsdError>;
