// src/errors.rs
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Completion API request failed with status {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Completion API returned an error: {0}")]
    ApiResponse(String),

    #[error("Unexpected response format in choices: {0}")]
    UnexpectedResponse(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No top-level function definition found in the submitted code")]
    FunctionNotFound,

    #[error("Test run exceeded the {0:?} limit")]
    TestTimeout(Duration),

    #[error("PDF generation failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Template error: {0}")]
    Template(String),
}

impl GenError {
    /// True when the failure came from the completion API rather than from us.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            GenError::Request(_)
                | GenError::ApiError { .. }
                | GenError::ApiResponse(_)
                | GenError::UnexpectedResponse(_)
                | GenError::InvalidResponse(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, GenError>;
