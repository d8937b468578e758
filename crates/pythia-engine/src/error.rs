//! Failure taxonomy for engine queries.

use std::io;
use std::sync::Arc;

use thiserror::Error;

/// Errors raised while querying the analysis engine.
///
/// [`EngineError::NotFound`] is the one recoverable variant: it reports that
/// the engine resolved nothing at the cursor, and callers decide whether
/// that fails their operation. Everything else is operational.
#[derive(Debug, Error, Clone)]
pub enum EngineError {
    /// The engine process could not be spawned.
    #[error("failed to spawn analysis process: {source}")]
    Spawn {
        /// Underlying spawn failure.
        #[source]
        source: Arc<io::Error>,
    },
    /// Reading from or writing to the engine process failed.
    #[error("analysis process i/o failed: {source}")]
    Io {
        /// Underlying exchange failure.
        #[source]
        source: Arc<io::Error>,
    },
    /// The engine process exited unsuccessfully.
    #[error("analysis process exited with status {status}: {stderr}")]
    Exited {
        /// Exit code of the process, `-1` when killed by a signal.
        status: i32,
        /// Captured stderr output, trimmed.
        stderr: String,
    },
    /// The engine produced output that was not a valid reply.
    #[error("invalid engine output: {message}")]
    InvalidOutput {
        /// Description of the malformed output.
        message: String,
    },
    /// The engine resolved no symbol at the requested position.
    #[error("no symbol found at the requested position")]
    NotFound,
    /// The engine reported an analysis failure.
    #[error("analysis failed: {message}")]
    Failed {
        /// Failure description reported by the engine.
        message: String,
    },
}

impl EngineError {
    /// Wraps a spawn failure.
    #[must_use]
    pub fn spawn(source: io::Error) -> Self {
        Self::Spawn {
            source: Arc::new(source),
        }
    }

    /// Wraps an exchange I/O failure.
    #[must_use]
    pub fn io(source: io::Error) -> Self {
        Self::Io {
            source: Arc::new(source),
        }
    }

    /// Creates an invalid-output error.
    #[must_use]
    pub fn invalid_output(message: impl Into<String>) -> Self {
        Self::InvalidOutput {
            message: message.into(),
        }
    }

    /// Creates an engine-reported failure.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }
}
