//! Error types for the extraction pipeline and its collaborators.
//!
//! Only configuration and storage I/O can fail. Classification never fails —
//! every input yields a valid (possibly empty) result — and executor lookups
//! that resolve to nothing are reported as tagged outcomes, not errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NudgeError {
    /// Missing or invalid required configuration (e.g. mail credentials).
    /// Fatal and explicit: never degraded into a silent empty result.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Failed to parse {context}: {message}")]
    Parse { context: String, message: String },
}

impl NudgeError {
    pub fn parse(context: &str, err: impl std::fmt::Display) -> Self {
        NudgeError::Parse {
            context: context.to_string(),
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for NudgeError {
    fn from(err: std::io::Error) -> Self {
        NudgeError::Io(err.to_string())
    }
}
