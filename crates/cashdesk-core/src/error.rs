//! Error types for cashdesk-core
//!
//! Every failure the editing surface can run into maps to a `CoreError`,
//! which carries an error code and user-facing suggestions.

use thiserror::Error;
use serde::{Deserialize, Serialize};

use crate::validation::FieldErrors;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Form values did not pass validation
    ValidationFailed,
    /// The record store rejected the call or could not be reached
    RequestFailed,
    /// Transaction not found in the displayed list
    TransactionNotFound,
    /// Operation not allowed in the current form state
    InvalidState,
    /// A submission is already in flight for this form
    SubmissionInProgress,
    /// Configuration error
    ConfigError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::ValidationFailed => write!(f, "VALIDATION_FAILED"),
            ErrorCode::RequestFailed => write!(f, "REQUEST_FAILED"),
            ErrorCode::TransactionNotFound => write!(f, "TRANSACTION_NOT_FOUND"),
            ErrorCode::InvalidState => write!(f, "INVALID_STATE"),
            ErrorCode::SubmissionInProgress => write!(f, "SUBMISSION_IN_PROGRESS"),
            ErrorCode::ConfigError => write!(f, "CONFIG_ERROR"),
        }
    }
}

/// Detailed error information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Main error type for cashdesk-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Validation failed for {} field(s)", .errors.len())]
    ValidationFailed { errors: FieldErrors },

    #[error("Request failed ({operation}): {message}")]
    RequestFailed { operation: String, message: String },

    #[error("Transaction not found: {id}")]
    TransactionNotFound { id: String },

    #[error("Invalid state: {message}")]
    InvalidState { message: String },

    #[error("A submission is already in progress")]
    SubmissionInProgress,

    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}

impl CoreError {
    /// Shorthand for a failed store call
    pub fn request_failed(operation: &str, message: impl Into<String>) -> Self {
        CoreError::RequestFailed {
            operation: operation.to_string(),
            message: message.into(),
        }
    }

    /// Shorthand for a disallowed state transition
    pub fn invalid_state(message: impl Into<String>) -> Self {
        CoreError::InvalidState { message: message.into() }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            CoreError::RequestFailed { .. } => ErrorCode::RequestFailed,
            CoreError::TransactionNotFound { .. } => ErrorCode::TransactionNotFound,
            CoreError::InvalidState { .. } => ErrorCode::InvalidState,
            CoreError::SubmissionInProgress => ErrorCode::SubmissionInProgress,
            CoreError::ConfigError { .. } => ErrorCode::ConfigError,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::ValidationFailed { errors } => {
                let fields: serde_json::Map<String, serde_json::Value> = errors
                    .iter()
                    .map(|(field, message)| (field.to_string(), serde_json::json!(message)))
                    .collect();
                details = details.with_detail(serde_json::Value::Object(fields));
                details = details.with_suggestion(
                    "Correct the highlighted fields and save again.".to_string()
                );
            }
            CoreError::RequestFailed { operation, .. } => {
                details = details.with_detail(serde_json::json!({ "operation": operation }));
                details = details.with_suggestion(
                    "Check that the record store is reachable and try again.".to_string()
                );
            }
            CoreError::TransactionNotFound { .. } => {
                details = details.with_suggestion(
                    "Reload the transaction list; the record may have been deleted.".to_string()
                );
            }
            CoreError::ConfigError { message } => {
                details = details.with_suggestion(message.clone());
            }
            _ => {}
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Operation being performed
    pub operation: String,
    /// Record the operation targets, if any
    pub record_id: Option<String>,
}

impl ErrorContext {
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            record_id: None,
        }
    }

    pub fn with_record_id(mut self, record_id: &str) -> Self {
        self.record_id = Some(record_id.to_string());
        self
    }
}

/// Error logger trait
pub trait ErrorLogger {
    /// Log an error
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        log::error!(
            target: "cashdesk::error",
            "ERROR [{}] {} - Operation: {} - Record: {:?}",
            error.code(),
            error,
            context.operation,
            context.record_id
        );
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FormField;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::ValidationFailed.to_string(), "VALIDATION_FAILED");
        assert_eq!(ErrorCode::RequestFailed.to_string(), "REQUEST_FAILED");
        assert_eq!(ErrorCode::SubmissionInProgress.to_string(), "SUBMISSION_IN_PROGRESS");
    }

    #[test]
    fn test_core_error_codes() {
        assert_eq!(CoreError::SubmissionInProgress.code(), ErrorCode::SubmissionInProgress);
        assert_eq!(
            CoreError::request_failed("delete_transaction", "timeout").code(),
            ErrorCode::RequestFailed
        );
        assert_eq!(
            CoreError::ConfigError { message: "x".to_string() }.code(),
            ErrorCode::ConfigError
        );
    }

    #[test]
    fn test_validation_details_list_fields() {
        let mut errors = FieldErrors::default();
        errors.insert(FormField::Amount, "amount must be at least 0.10");
        let error = CoreError::ValidationFailed { errors };
        let details = error.to_details();

        assert_eq!(details.code, ErrorCode::ValidationFailed);
        assert_eq!(details.message, "Validation failed for 1 field(s)");
        assert_eq!(
            details.details.unwrap()["amount"],
            serde_json::json!("amount must be at least 0.10")
        );
    }

    #[test]
    fn test_request_failed_details() {
        let error = CoreError::request_failed("create_transaction", "status 500");
        let details = error.to_details();
        assert!(details.message.contains("create_transaction"));
        assert!(!details.suggestions.is_empty());
        assert!(details.to_string().starts_with("[REQUEST_FAILED]"));
    }

    #[test]
    fn test_error_context() {
        let context = ErrorContext::new("delete_transaction").with_record_id("t-1");
        assert_eq!(context.operation, "delete_transaction");
        assert_eq!(context.record_id.as_deref(), Some("t-1"));
    }
}
