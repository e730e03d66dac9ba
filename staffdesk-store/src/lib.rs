//! Optimistic client-side collection over an abstract CRUD service.
//!
//! [`OptimisticStore`] wraps any [`CrudService`] implementation and keeps a
//! local, synchronously readable collection of records: mutations apply to
//! the collection before the service resolves and roll back to a snapshot if
//! it fails, while an operation ledger exposes granular loading state.

pub mod error;
pub mod ledger;
pub mod options;
pub mod service;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use ledger::{Operation, OperationLedger};
pub use options::StoreOptions;
pub use service::{CrudService, FetchParams, Record, RecordId, Response};
pub use store::OptimisticStore;
