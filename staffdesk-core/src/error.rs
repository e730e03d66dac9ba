//! Error types for the staffdesk crates.

use thiserror::Error;

/// Errors that can occur in staffdesk-core operations.
#[derive(Error, Debug)]
pub enum StaffDeskError {
    #[error("Invalid month '{0}'. Expected YYYY-MM")]
    InvalidMonth(String),

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// Result type alias for staffdesk-core operations.
pub type StaffDeskResult<T> = Result<T, StaffDeskError>;
