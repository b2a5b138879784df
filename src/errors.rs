use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::fmt;

use crate::models::ErrorBody;

/// Message returned to callers when the CPF fails validation.
pub const INVALID_IDENTIFIER_MESSAGE: &str = "invalid identifier";
/// Message returned to callers for every server-side failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "internal error";

/// Failures of a lead submission.
#[derive(Debug)]
pub enum SubmissionError {
    /// The CPF failed the check-digit validation. Client-correctable.
    InvalidIdentifier,
    /// The store could not complete the write (timeout, lock contention, closed pool).
    StorageFailure(sqlx::Error),
    /// Anything else. Logged, never exposed to the caller.
    UnexpectedFailure(String),
    /// Refused before reaching the workflow (oversized body, rate limited).
    /// Keeps its status, answers with the generic message.
    Rejected(StatusCode),
    /// Error with context chain for better debugging.
    WithContext {
        /// The underlying source of the error.
        source: Box<SubmissionError>,
        /// Additional context message.
        context: String,
    },
}

impl SubmissionError {
    /// HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            SubmissionError::InvalidIdentifier => StatusCode::BAD_REQUEST,
            SubmissionError::StorageFailure(_) | SubmissionError::UnexpectedFailure(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            SubmissionError::Rejected(status) => *status,
            SubmissionError::WithContext { source, .. } => source.status(),
        }
    }

    /// Caller-visible message. Server faults collapse to one generic text.
    pub fn public_message(&self) -> &'static str {
        match self {
            SubmissionError::InvalidIdentifier => INVALID_IDENTIFIER_MESSAGE,
            SubmissionError::StorageFailure(_)
            | SubmissionError::UnexpectedFailure(_)
            | SubmissionError::Rejected(_) => INTERNAL_ERROR_MESSAGE,
            SubmissionError::WithContext { source, .. } => source.public_message(),
        }
    }

    /// Whether the error is a client mistake rather than a server fault.
    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }
}

impl fmt::Display for SubmissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionError::InvalidIdentifier => write!(f, "Invalid identifier"),
            SubmissionError::StorageFailure(e) => write!(f, "Storage failure: {}", e),
            SubmissionError::UnexpectedFailure(msg) => write!(f, "Unexpected failure: {}", msg),
            SubmissionError::Rejected(status) => write!(f, "Request rejected: {}", status),
            SubmissionError::WithContext { source, context } => {
                write!(f, "{}: {}", context, source)
            }
        }
    }
}

impl std::error::Error for SubmissionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SubmissionError::StorageFailure(e) => Some(e),
            SubmissionError::WithContext { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl IntoResponse for SubmissionError {
    /// Converts the error into an HTTP response.
    ///
    /// Server faults are logged with their full cause; the body only ever
    /// carries the generic message.
    fn into_response(self) -> Response {
        match &self {
            SubmissionError::InvalidIdentifier => {
                tracing::warn!("Rejected submission: invalid CPF");
            }
            SubmissionError::StorageFailure(e) => {
                tracing::error!("Storage failure: {:?}", e);
            }
            SubmissionError::UnexpectedFailure(msg) => {
                tracing::error!("Unexpected failure: {}", msg);
            }
            SubmissionError::Rejected(status) => {
                tracing::warn!("Request rejected: {}", status);
            }
            SubmissionError::WithContext { .. } => {
                tracing::error!("Error with context: {}", self);
            }
        }

        let body = Json(ErrorBody {
            success: false,
            message: self.public_message().to_string(),
        });

        (self.status(), body).into_response()
    }
}

impl From<sqlx::Error> for SubmissionError {
    fn from(err: sqlx::Error) -> Self {
        SubmissionError::StorageFailure(err)
    }
}

/// Extension trait for adding context to errors.
/// Similar to `anyhow::Context` but for our `SubmissionError` type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T, SubmissionError>;
}

/// Extension for sqlx::Error to add context
impl<T> ResultExt<T> for Result<T, sqlx::Error> {
    fn context(self, context: impl Into<String>) -> Result<T, SubmissionError> {
        self.map_err(|e| SubmissionError::WithContext {
            source: Box::new(SubmissionError::StorageFailure(e)),
            context: context.into(),
        })
    }
}
