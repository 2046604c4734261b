//! Error types for the twentyone crate

use thiserror::Error;

use crate::types::State;

/// Main error type for the twentyone crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("state {state} is not in the declared state universe")]
    UnknownState { state: State },

    #[error("trajectory has no elements")]
    EmptyTrajectory,

    #[error("terminal trajectory element carries no reward")]
    MissingTerminalReward,

    #[error("environment reported no reward for state {state}")]
    MissingReward { state: State },

    #[error("epsilon {value} must be within [0.0, 1.0]")]
    InvalidEpsilon { value: f64 },

    #[error("save file has {got} table blocks, expected {expected}")]
    BlockCount { expected: usize, got: usize },

    #[error("line {line_number}: expected '<key> <value>', got '{line}'")]
    MalformedLine { line_number: usize, line: String },

    #[error("line {line_number}: malformed state key '{key}'")]
    ParseKey { line_number: usize, key: String },

    #[error("line {line_number}: malformed {kind} value '{value}'")]
    ParseValue {
        line_number: usize,
        kind: &'static str,
        value: String,
    },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
