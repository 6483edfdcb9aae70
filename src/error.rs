use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("invalid league settings: `{field}` {message}")]
    InvalidSettings { field: &'static str, message: String },

    #[error("invalid team `{team_id}`: {message}")]
    InvalidTeam { team_id: String, message: String },

    #[error("random source failed: {message}")]
    RandomSource { message: String },
}

impl SimError {
    pub(crate) fn settings(field: &'static str, message: impl Into<String>) -> Self {
        SimError::InvalidSettings {
            field,
            message: message.into(),
        }
    }

    pub(crate) fn team(team_id: &str, message: impl Into<String>) -> Self {
        SimError::InvalidTeam {
            team_id: team_id.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
