//! Error types for the sentry toggle agent

use thiserror::Error;

/// Main error type for the sentry toggle agent
#[derive(Error, Debug)]
pub enum ToggleError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    InputError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Vehicle failed to come online after {rounds} wake_up tries")]
    WakeTimeout { rounds: u32 },

    #[error("Command failed: {0}")]
    CommandFailure(String),

    #[error("Transient API error: {0}")]
    Transient(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid vehicle snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToggleError {
    /// Whether a later attempt may succeed where this one failed
    pub fn is_retryable(&self) -> bool {
        match self {
            ToggleError::WakeTimeout { .. }
            | ToggleError::CommandFailure(_)
            | ToggleError::Transient(_) => true,
            ToggleError::HttpError(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            _ => false,
        }
    }
}

impl From<anyhow::Error> for ToggleError {
    fn from(err: anyhow::Error) -> Self {
        ToggleError::Internal(err.to_string())
    }
}
