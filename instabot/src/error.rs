//! Bot-specific error types

use shared::SharedError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InstabotError {
    #[error("Relationship state at {path} is corrupt: {reason}")]
    CorruptState { path: String, reason: String },

    #[error("No followed record for account: {username}")]
    UnknownAccount { username: String },

    #[error("Target hashtags should be provided")]
    NoTagsProvided,

    #[error("UI element not found: {locator}")]
    ElementNotFound { locator: String },

    #[error("Page driver failure: {message}")]
    DriverError { message: String },

    #[error("Unexpected page state: {message}")]
    PageState { message: String },

    #[error("Configuration error: {field}")]
    ConfigurationError { field: String },

    #[error("{action} aborted after {completed}/{requested}: {source}")]
    RunAborted {
        action: String,
        completed: usize,
        requested: usize,
        #[source]
        source: Box<InstabotError>,
    },

    #[error("Shared component error: {0}")]
    SharedError(#[from] SharedError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
}

impl InstabotError {
    pub fn config(field: impl Into<String>) -> Self {
        InstabotError::ConfigurationError { field: field.into() }
    }

    pub fn driver(message: impl Into<String>) -> Self {
        InstabotError::DriverError { message: message.into() }
    }

    pub fn corrupt(path: impl Into<String>, reason: impl Into<String>) -> Self {
        InstabotError::CorruptState {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Progress reached before the run aborted, as `(completed, requested)`
    pub fn partial_progress(&self) -> Option<(usize, usize)> {
        match self {
            InstabotError::RunAborted {
                completed, requested, ..
            } => Some((*completed, *requested)),
            _ => None,
        }
    }
}

pub type InstabotResult<T> = Result<T, InstabotError>;
