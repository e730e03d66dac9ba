//! Error type surfaced by failed store operations.

use thiserror::Error;

use crate::ledger::Operation;

/// A service rejection, converted at the store boundary. Never escapes as a
/// panic; the store also records the message on its `error` field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct StoreError {
    pub operation: Operation,
    pub message: String,
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
