//! Error types for console operations.
//!
//! Three classes, matching how failures surface to staff:
//! - Network: the request never reached the server or the response was
//!   unreadable at the transport level
//! - Api: the server answered with a non-2xx and (usually) a structured detail
//! - Validation: malformed local input, caught before any network call

use thiserror::Error;

/// A single field-scoped validation failure, shown inline next to its field.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors from console API operations.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {status}: {detail}")]
    Api { status: u16, detail: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldError>),
}

impl ApiError {
    /// Transport failures are worth a user-initiated retry; application
    /// errors and validation failures are not until the input changes.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }

    /// Single user-visible failure line for the screen's error state.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => {
                "Could not reach the server. Check your connection and retry.".to_string()
            }
            ApiError::Api { detail, .. } => detail.clone(),
            ApiError::Parse(_) => "The server returned an unexpected response.".to_string(),
            ApiError::Validation(fields) => fields
                .first()
                .map(|f| format!("{}: {}", f.field, f.message))
                .unwrap_or_else(|| "Invalid input".to_string()),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Parse(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_network_errors_are_retryable() {
        assert!(ApiError::Network("timeout".into()).is_retryable());
        assert!(!ApiError::Api {
            status: 400,
            detail: "Invalid stage: warp".into()
        }
        .is_retryable());
        assert!(!ApiError::Validation(vec![]).is_retryable());
    }

    #[test]
    fn api_detail_is_surfaced_verbatim() {
        let err = ApiError::Api {
            status: 404,
            detail: "Intake not found".into(),
        };
        assert_eq!(err.user_message(), "Intake not found");
    }

    #[test]
    fn validation_message_is_field_scoped() {
        let err = ApiError::Validation(vec![FieldError::new("email", "formato inválido")]);
        assert_eq!(err.user_message(), "email: formato inválido");
    }
}
