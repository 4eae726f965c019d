//! Error types for the evaluation provider client.

use thiserror::Error;

/// Errors from the evaluation/preferences provider.
#[derive(Debug, Error, Clone)]
pub enum EvaluationError {
    /// Network/HTTP request failed
    #[error("Network error: {message}")]
    Network { message: String },

    /// Provider URL could not be constructed
    #[error("URL error: {message}")]
    Url { message: String },

    /// Provider returned an unexpected status
    #[error("Unexpected status {status} from evaluation provider")]
    UnexpectedStatus { status: u16 },

    /// Provider returned a body that did not parse
    #[error("Malformed provider response: {message}")]
    Malformed { message: String },
}

impl EvaluationError {
    /// Returns true if this error is potentially transient.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            EvaluationError::Network { .. } | EvaluationError::UnexpectedStatus { .. }
        )
    }
}

impl From<reqwest::Error> for EvaluationError {
    fn from(err: reqwest::Error) -> Self {
        EvaluationError::Network {
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for EvaluationError {
    fn from(err: url::ParseError) -> Self {
        EvaluationError::Url {
            message: err.to_string(),
        }
    }
}
