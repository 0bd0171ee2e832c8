//! Engine error taxonomy

/// Errors surfaced by engine operations.
///
/// Configuration problems are not represented here: they are logged and
/// replaced by their documented defaults.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The caller passed a value the operation cannot accept
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An operation was invoked out of order
    #[error("illegal state: {0}")]
    IllegalState(String),

    /// A registry lookup found nothing under the given identifier
    #[error("no {kind} registered as '{id}'")]
    MissingEntry { kind: &'static str, id: String },
}

impl EngineError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn illegal_state(message: impl Into<String>) -> Self {
        Self::IllegalState(message.into())
    }

    pub fn missing(kind: &'static str, id: impl Into<String>) -> Self {
        Self::MissingEntry {
            kind,
            id: id.into(),
        }
    }
}

/// Result alias used across the engine crates
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            EngineError::illegal_state("Not scheduled yet").to_string(),
            "illegal state: Not scheduled yet"
        );
        assert_eq!(
            EngineError::missing("skill handler", "fireball").to_string(),
            "no skill handler registered as 'fireball'"
        );
    }
}
