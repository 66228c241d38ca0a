use thiserror::Error;

use crate::engine::state::MatchPhase;

#[derive(Error, Debug)]
pub enum MatchError {
    #[error("Command `{command}` is not accepted in phase {phase:?}")]
    InvalidCommand { command: &'static str, phase: MatchPhase },

    #[error("A skill check is already in progress")]
    CheckInProgress,

    #[error("No skill check is active")]
    NoCheckActive,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No match session has been created")]
    SessionNotInitialized,
}

impl MatchError {
    /// Rejected commands leave match state untouched; the caller may retry later.
    pub fn is_recoverable(&self) -> bool {
        match self {
            MatchError::InvalidCommand { .. } => true,
            MatchError::CheckInProgress => true,
            MatchError::NoCheckActive => true,
            MatchError::SessionNotInitialized => true,
            MatchError::InvalidConfig(_) => false,
            MatchError::JsonParse(_) => false,
            MatchError::ConfigParse(_) => false,
            MatchError::Io(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, MatchError>;
