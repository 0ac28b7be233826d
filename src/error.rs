//! Error types for hausplan
//!
//! Exit codes:
//! - 0: Success (a declined confirmation is not an error)
//! - 2: User error (validation, unknown member/task, bad config)
//! - 4: Operation failed (I/O, serialization, lock contention)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the hausplan CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for hausplan operations
#[derive(Error, Debug)]
pub enum Error {
    // Validation errors (exit code 2)
    #[error("Member name cannot be empty.")]
    EmptyMemberName,

    #[error("Create members first.")]
    NoMembers,

    #[error("Title and date are required.")]
    MissingTitleOrDate,

    // User errors (exit code 2)
    #[error("Member not found: {0}")]
    MemberNotFound(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Operation failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::EmptyMemberName
            | Error::NoMembers
            | Error::MissingTitleOrDate
            | Error::MemberNotFound(_)
            | Error::TaskNotFound(_)
            | Error::InvalidDate(_)
            | Error::InvalidArgument(_)
            | Error::InvalidConfig(_) => exit_codes::USER_ERROR,

            Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_)
            | Error::LockFailed(_)
            | Error::OperationFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Validation failures are surfaced to the user as alerts, never logged
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::EmptyMemberName | Error::NoMembers | Error::MissingTitleOrDate
        )
    }

    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::MemberNotFound(reference) => Some(serde_json::json!({ "member": reference })),
            Error::TaskNotFound(reference) => Some(serde_json::json!({ "task": reference })),
            Error::LockFailed(path) => Some(serde_json::json!({ "path": path })),
            _ => None,
        }
    }
}

/// Result type alias for hausplan operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            error: err.to_string(),
            code: err.exit_code(),
            details: err.details(),
        }
    }
}
