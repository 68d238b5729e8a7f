//! Error types for appo-engine operations.

use thiserror::Error;

use crate::request::ResponseStatus;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Caller is not authenticated")]
    Unauthenticated,

    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    #[error("Event source error: {0}")]
    UpstreamFetch(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ExtractError {
    /// The response category this error is reported under.
    pub fn status(&self) -> ResponseStatus {
        match self {
            ExtractError::Unauthenticated => ResponseStatus::Unauthorized,
            ExtractError::InvalidDateRange(_) => ResponseStatus::BadRequest,
            ExtractError::UpstreamFetch(_)
            | ExtractError::Config(_)
            | ExtractError::InvalidTimezone(_)
            | ExtractError::Internal(_) => ResponseStatus::ServerError,
        }
    }

    /// The message placed in a failure response. Details stay in the logs.
    pub fn public_message(&self) -> &'static str {
        match self.status() {
            ResponseStatus::Unauthorized => "Unauthorized",
            ResponseStatus::BadRequest => "Invalid dates",
            _ => "Failed to extract appointments",
        }
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
