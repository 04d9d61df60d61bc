use ai_core::BeliefError;
use thiserror::Error;

/// Setup-time failures.
///
/// Runtime outcomes (no feasible plan, a strategy reporting failure) are not errors: the agent
/// falls back to idle and tries again later.
#[derive(Debug, Error)]
pub enum GoapError {
    #[error(transparent)]
    Belief(#[from] BeliefError),

    #[error("`{owner}` references unknown belief `{belief}`")]
    UnknownBelief { owner: String, belief: String },

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("unknown strategy for action `{action}`: {reason}")]
    Strategy { action: String, reason: String },

    #[error("failed to parse goap table (yaml): {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to parse goap table (json): {0}")]
    Json(#[from] serde_json::Error),
}

impl GoapError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        GoapError::Configuration(message.into())
    }
}

pub type Result<T, E = GoapError> = core::result::Result<T, E>;
