use thiserror::Error;

/// Errors raised by the belief registry.
///
/// Both variants indicate an authoring bug in the agent setup, not a runtime condition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BeliefError {
    #[error("belief `{0}` is already registered")]
    Duplicate(String),
    #[error("belief `{0}` is not registered")]
    Unknown(String),
}
