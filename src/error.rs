//! Error types for configuration, run lifecycle and score submission.

use thiserror::Error;

use crate::sim::RunStatus;

/// Convenient result alias for lifecycle operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Invalid or malformed configuration. Rejected before any state is touched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A numeric field must be finite and strictly positive.
    #[error("{field} must be a positive finite number (got {value})")]
    NotPositive {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Value that failed validation.
        value: f64,
    },
    /// A count-like field must be at least one.
    #[error("{field} must be at least 1")]
    Zero {
        /// Dotted path of the offending field.
        field: &'static str,
    },
    /// An entity does not fit inside the arena.
    #[error("{entity} ({size}) does not fit in an arena of {arena}")]
    DoesNotFit {
        /// Entity or layout that overflows.
        entity: &'static str,
        /// Extent of the entity along the failing axis.
        size: f32,
        /// Arena extent along the same axis.
        arena: f32,
    },
    /// The speed cap is below the starting speed.
    #[error("max bug speed {max} is below base speed {base}")]
    SpeedCapBelowBase {
        /// Starting speed.
        base: f32,
        /// Configured cap.
        max: f32,
    },
    /// JSON could not be parsed into a configuration.
    #[error("malformed config: {msg}")]
    Malformed {
        /// Parser message.
        msg: String,
    },
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Malformed { msg: e.to_string() }
    }
}

/// Rejected lifecycle calls on the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Configuration or mode failed validation at `start()`.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
    /// `start()` requires an idle engine.
    #[error("cannot start a run while {status:?}")]
    NotIdle {
        /// Status at the time of the call.
        status: RunStatus,
    },
    /// `restart()` needs a run that was started and not cancelled.
    #[error("no run to restart")]
    NotStarted,
}

/// Failures while handing a final score to the score sink.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// Only won runs can be submitted.
    #[error("only won runs can be submitted")]
    NotWon,
    /// No identity is available for the submission.
    #[error("sign in to submit a score")]
    NoIdentity,
    /// This run already has an accepted submission.
    #[error("run {run_id} was already submitted")]
    AlreadySubmitted {
        /// Run that was already recorded.
        run_id: u64,
    },
    /// The sink rejected or failed to store the score.
    #[error("score sink failed: {message}")]
    Sink {
        /// Sink-provided reason.
        message: String,
    },
}

impl SubmitError {
    /// Whether calling submit again may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SubmitError::Sink { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_sink_failures_are_retryable() {
        assert!(SubmitError::Sink { message: "offline".into() }.is_retryable());
        assert!(!SubmitError::NotWon.is_retryable());
        assert!(!SubmitError::NoIdentity.is_retryable());
        assert!(!SubmitError::AlreadySubmitted { run_id: 3 }.is_retryable());
    }

    #[test]
    fn test_config_error_wraps_into_engine_error() {
        let err: EngineError = ConfigError::Zero { field: "lives" }.into();
        assert_eq!(err.to_string(), "invalid configuration: lives must be at least 1");
    }
}
