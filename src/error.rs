//! Error types for the book administration client

use thiserror::Error;

use crate::models::book::BookField;

/// Message shown to the user for any transport or server-side failure
pub const SERVER_ERROR_MESSAGE: &str = "A server error occurred.";

/// Message shown to the user when the server answered without the expected outcome
pub const PROCESSING_ERROR_MESSAGE: &str = "An error occurred while processing the request.";

/// Client-side rule violations, detected before anything is sent
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required fields are missing: {}", join_fields(.0))]
    MissingFields(Vec<BookField>),

    #[error("Description is limited to {max} characters ({actual} given)")]
    DescriptionTooLong { actual: usize, max: usize },

    #[error("Price must be a number, got {0:?}")]
    InvalidPrice(String),

    #[error("Book id must not be empty")]
    EmptyId,

    #[error("Unknown field: {0}")]
    UnknownField(String),
}

fn join_fields(fields: &[BookField]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("A submission is already in progress")]
    Busy,

    #[error("No book is loaded")]
    NotLoaded,

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl AppError {
    /// Text that can be shown to the user.
    ///
    /// Transport and response failures are reduced to a generic message; the
    /// detail stays in the error for the caller to log.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(e) => e.to_string(),
            AppError::Transport(_) => SERVER_ERROR_MESSAGE.to_string(),
            AppError::UnexpectedResponse(_) => PROCESSING_ERROR_MESSAGE.to_string(),
            AppError::Busy => "Please wait for the current request to finish.".to_string(),
            AppError::NotLoaded => "The book has not been loaded yet.".to_string(),
            AppError::Config(_) => "Invalid configuration".to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Transport(e.to_string())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
