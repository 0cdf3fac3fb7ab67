//! Error types for todo
//!
//! The task core never returns these for invalid indices or persistence
//! failures; those are no-ops and warnings. Errors surface from configuration,
//! the CLI layer, and terminal setup.
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, nothing to undo)
//! - 4: Operation failed (I/O, serialization)

use thiserror::Error;

/// Exit codes for the todo CLI
pub mod exit_codes {
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for todo operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("No task at index {index} (list has {len} tasks)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    // Operation failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidConfig(_)
            | Error::InvalidArgument(_)
            | Error::IndexOutOfRange { .. }
            | Error::NothingToUndo
            | Error::NothingToRedo => exit_codes::USER_ERROR,

            Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Error class reported as `kind` in JSON output
    pub fn kind(&self) -> &'static str {
        match self.exit_code() {
            exit_codes::USER_ERROR => "user_error",
            _ => "operation_failed",
        }
    }

    /// Structured details for JSON error output, when the variant carries any
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::IndexOutOfRange { index, len } => Some(serde_json::json!({
                "index": index,
                "len": len,
            })),
            Error::InvalidConfig(message) | Error::InvalidArgument(message) => {
                Some(serde_json::json!({ "message": message }))
            }
            _ => None,
        }
    }
}

/// Result type alias for todo operations
pub type Result<T> = std::result::Result<T, Error>;

/// The `error` object of the JSON error envelope
#[derive(serde::Serialize)]
pub struct JsonError {
    pub message: String,
    pub code: i32,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            message: err.to_string(),
            code: err.exit_code(),
            kind: err.kind(),
            details: err.details(),
        }
    }
}
