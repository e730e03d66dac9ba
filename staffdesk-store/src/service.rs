//! The abstract service boundary the store mutates against.
//!
//! Records travel as plain JSON objects so one store implementation serves
//! every collection; the typed record shapes live in staffdesk-core and are
//! serde-mapped at the service edge.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One item of a collection: a JSON object keyed by field name.
pub type Record = serde_json::Map<String, Value>;

/// A record identifier. Services assign strings or numbers; the store only
/// ever compares ids for equality.
pub type RecordId = Value;

/// Filter parameters passed through to `fetch` untouched.
pub type FetchParams = serde_json::Map<String, Value>;

/// Envelope every service call resolves to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response<T> {
    Success { data: T },
    Error { error: String },
}

impl<T> Response<T> {
    pub fn success(data: T) -> Self {
        Response::Success { data }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Response::Error {
            error: message.into(),
        }
    }

    pub fn into_result(self) -> Result<T, String> {
        match self {
            Response::Success { data } => Ok(data),
            Response::Error { error } => Err(error),
        }
    }
}

/// Asynchronous CRUD backend for one collection.
///
/// Calls never block the caller beyond their own await point and never
/// panic; rejection travels inside the [`Response`] envelope.
#[async_trait]
pub trait CrudService: Send + Sync {
    /// Fetch the full collection, optionally filtered.
    async fn fetch(&self, params: FetchParams) -> Response<Vec<Record>>;

    /// Create a record. The service assigns the permanent id and returns the
    /// stored record.
    async fn create(&self, data: Record) -> Response<Record>;

    /// Apply a shallow patch to the record with the given id. `None` means
    /// the service acknowledged without a body; the store then keeps its own
    /// merged record.
    async fn update(&self, id: &RecordId, patch: Record) -> Response<Option<Record>>;

    /// Delete the record with the given id.
    async fn delete(&self, id: &RecordId) -> Response<()>;
}
