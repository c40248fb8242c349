//! Application layer error types

use serde_json::{Value as JsonValue, json};
use thiserror::Error;

use crate::generation::GenerationError;
use crate::infrastructure::shell::CommandError;

/// Application layer errors
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error(transparent)]
    GenerationError(#[from] GenerationError),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationError),

    #[error(transparent)]
    CommandError(#[from] CommandError),

    #[error("Command exited with status {exit_code}: {stderr}")]
    CommandFailed { exit_code: i32, stderr: String },

    #[error("Output error: {0}")]
    OutputError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ApplicationError {
    /// Stable machine-readable code for reporting
    pub fn code(&self) -> &'static str {
        match self {
            ApplicationError::GenerationError(e) => e.code(),
            ApplicationError::ValidationError(_) => "VALIDATION_ERROR",
            ApplicationError::CommandError(_) | ApplicationError::CommandFailed { .. } => {
                "COMMAND_ERROR"
            }
            ApplicationError::OutputError(_) => "OUTPUT_ERROR",
            ApplicationError::IoError(_) => "IO_ERROR",
        }
    }

    pub fn details(&self) -> Option<JsonValue> {
        match self {
            ApplicationError::GenerationError(e) => e.details(),
            ApplicationError::CommandFailed { exit_code, stderr } => Some(json!({
                "exitCode": exit_code,
                "stderr": stderr,
            })),
            _ => None,
        }
    }
}

/// Validation errors for requests
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Exactly one curl command source is required, got {0}")]
    CurlSource(usize),

    #[error("At most one response source may be given, got {0}")]
    ResponseSource(usize),

    #[error("Timeout must be greater than zero")]
    ZeroTimeout,

    #[error("Output path cannot be empty")]
    EmptyOutputPath,
}
