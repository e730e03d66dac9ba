//! Store configuration.

use serde_json::Value;

use crate::ledger::Operation;
use crate::service::Record;

/// Called after an operation commits, with the operation and its result
/// payload (the affected record, or the fetched collection).
pub type SuccessCallback = Box<dyn Fn(Operation, &Value) + Send + Sync>;

/// Called after an operation fails, with the operation and the service's
/// error message.
pub type ErrorCallback = Box<dyn Fn(Operation, &str) + Send + Sync>;

/// Configuration for an [`OptimisticStore`](crate::OptimisticStore).
pub struct StoreOptions {
    /// Collection contents before the first fetch.
    pub initial_data: Vec<Record>,
    /// Whether `init` performs the mount-time fetch.
    pub auto_fetch: bool,
    /// Apply mutations locally before the service resolves. When disabled,
    /// the collection only changes on success.
    pub optimistic_updates: bool,
    /// Field that carries a record's unique id.
    pub id_field: String,
    pub on_success: Option<SuccessCallback>,
    pub on_error: Option<ErrorCallback>,
}

impl Default for StoreOptions {
    fn default() -> Self {
        StoreOptions {
            initial_data: Vec::new(),
            auto_fetch: true,
            optimistic_updates: true,
            id_field: "id".to_string(),
            on_success: None,
            on_error: None,
        }
    }
}

impl StoreOptions {
    pub fn with_initial_data(mut self, data: Vec<Record>) -> Self {
        self.initial_data = data;
        self
    }

    pub fn with_auto_fetch(mut self, auto_fetch: bool) -> Self {
        self.auto_fetch = auto_fetch;
        self
    }

    pub fn with_optimistic_updates(mut self, optimistic: bool) -> Self {
        self.optimistic_updates = optimistic;
        self
    }

    pub fn with_id_field(mut self, field: impl Into<String>) -> Self {
        self.id_field = field.into();
        self
    }

    pub fn on_success(mut self, f: impl Fn(Operation, &Value) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Box::new(f));
        self
    }

    pub fn on_error(mut self, f: impl Fn(Operation, &str) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }
}
