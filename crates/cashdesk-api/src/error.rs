//! Error types for cashdesk-api

use cashdesk_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl ApiError {
    /// Report this error as a failed store call
    pub fn into_core(self, operation: &str) -> CoreError {
        CoreError::request_failed(operation, self.to_string())
    }
}

impl From<ApiError> for CoreError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::InvalidConfig { message } => CoreError::ConfigError { message },
            other => other.into_core("http"),
        }
    }
}
