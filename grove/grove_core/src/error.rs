//! Error types for the Grove permissions engine.
//!
//! Lookup misses (an unknown group or ladder name) are never errors; they
//! resolve to `None` and contribute nothing. The variants here cover the
//! cases a caller has to branch on.

use thiserror::Error;

/// Root error type for Grove.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

/// Errors caused by the declarative configuration itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Neither a context-specific nor a global default group is defined.
    #[error("Default group missing for context '{context}'")]
    DefaultGroupMissing { context: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors reported by a declarative store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Failed to read declarative data: {0}")]
    ReadFailed(String),

    #[error("Failed to write declarative data: {0}")]
    WriteFailed(String),

    #[error("Malformed declarative data: {0}")]
    Parse(String),
}

/// Errors raised by the attachment runtime.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Attachment manager is not running")]
    NotStarted,

    #[error("Attachment manager is already running")]
    AlreadyStarted,

    #[error("Failed to spawn worker lane: {0}")]
    SpawnFailed(#[from] std::io::Error),

    /// The worker lane stopped accepting work, usually because a task panicked.
    #[error("Worker lane is gone")]
    WorkerGone,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_config_error_converts_into_root() {
        let err: Error = ConfigError::DefaultGroupMissing {
            context: "world".to_string(),
        }
        .into();
        assert_matches!(err, Error::Config(ConfigError::DefaultGroupMissing { .. }));
        assert_eq!(
            err.to_string(),
            "Configuration error: Default group missing for context 'world'"
        );
    }

    #[test]
    fn test_store_error_display() {
        let err = StoreError::WriteFailed("disk full".to_string());
        assert_eq!(err.to_string(), "Failed to write declarative data: disk full");
    }
}
