//! # Error Handling
//!
//! Error taxonomy for a smoke run. Every failure, from a refused registration to
//! a missing reaction, surfaces as a [`SmokeError`] tagged with the step that
//! produced it, so the CLI reports all of them through one path.

use reqwest::StatusCode;

use crate::client::models::ErrorBody;
use crate::scenario::Step;

/// Custom result type for smoke-run operations
pub type Result<T> = std::result::Result<T, SmokeError>;

/// Main error type for the smoke runner
#[derive(thiserror::Error, Debug)]
pub enum SmokeError {
    /// Invalid base URL, unusable HTTP client, unreadable config
    #[error("Configuration error: {0}")]
    Config(String),

    /// The request never produced a complete response
    #[error("{step} request failed")]
    Transport {
        step: Step,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a status other than the one the step requires
    #[error("{step} failed with {actual} (expected {expected}): {body}")]
    UnexpectedStatus { step: Step, expected: StatusCode, actual: StatusCode, body: String },

    /// The response body was not the JSON shape the step reads from
    #[error("{step} returned an unreadable response: {body}")]
    Decode {
        step: Step,
        #[source]
        source: serde_json::Error,
        body: String,
    },

    /// A semantic check on a decoded response did not hold
    #[error("{step} failed: {message}")]
    Assertion { step: Step, message: String },
}

impl SmokeError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new assertion failure for a step
    pub fn assertion<S: Into<String>>(step: Step, message: S) -> Self {
        Self::Assertion { step, message: message.into() }
    }

    /// The step the failure belongs to, if any
    pub fn step(&self) -> Option<Step> {
        match self {
            SmokeError::Config(_) => None,
            SmokeError::Transport { step, .. }
            | SmokeError::UnexpectedStatus { step, .. }
            | SmokeError::Decode { step, .. }
            | SmokeError::Assertion { step, .. } => Some(*step),
        }
    }

    /// HTTP status observed when the failure came from a status mismatch
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            SmokeError::UnexpectedStatus { actual, .. } => Some(*actual),
            _ => None,
        }
    }

    /// Raw response body attached to the failure, if one was received
    pub fn body(&self) -> Option<&str> {
        match self {
            SmokeError::UnexpectedStatus { body, .. } | SmokeError::Decode { body, .. } => {
                Some(body)
            }
            _ => None,
        }
    }

    /// The backend's `{error, code}` pair, when the attached body carries one
    pub fn error_body(&self) -> Option<ErrorBody> {
        self.body().and_then(ErrorBody::parse)
    }
}
