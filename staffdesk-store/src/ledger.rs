//! In-flight operation tracking.
//!
//! The ledger answers "is this operation currently running, optionally for
//! this specific record" so hosts can render per-row spinners. Entries exist
//! only while an operation is in flight; they are removed when it settles,
//! success or failure alike.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::service::RecordId;

/// The four store operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Fetch,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Fetch => "fetch",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct OperationKey {
    operation: Operation,
    item: Option<String>,
}

impl OperationKey {
    fn new(operation: Operation, item: Option<&RecordId>) -> Self {
        OperationKey {
            operation,
            item: item.map(id_key),
        }
    }
}

// String and number ids compare equal under the same key, matching how ids
// stringify in wire payloads.
fn id_key(id: &RecordId) -> String {
    match id {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Transient map of in-flight operations.
#[derive(Debug, Default)]
pub struct OperationLedger {
    in_flight: HashSet<OperationKey>,
}

impl OperationLedger {
    pub fn begin(&mut self, operation: Operation, item: Option<&RecordId>) {
        self.in_flight.insert(OperationKey::new(operation, item));
    }

    pub fn finish(&mut self, operation: Operation, item: Option<&RecordId>) {
        self.in_flight.remove(&OperationKey::new(operation, item));
    }

    pub fn is_loading(&self, operation: Operation, item: Option<&RecordId>) -> bool {
        self.in_flight.contains(&OperationKey::new(operation, item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_begin_finish_round_trip() {
        let mut ledger = OperationLedger::default();
        let id = json!("t-1");

        assert!(!ledger.is_loading(Operation::Update, Some(&id)));
        ledger.begin(Operation::Update, Some(&id));
        assert!(ledger.is_loading(Operation::Update, Some(&id)));
        ledger.finish(Operation::Update, Some(&id));
        assert!(!ledger.is_loading(Operation::Update, Some(&id)));
    }

    #[test]
    fn test_keys_scope_by_operation_and_item() {
        let mut ledger = OperationLedger::default();
        ledger.begin(Operation::Delete, Some(&json!("t-1")));

        assert!(!ledger.is_loading(Operation::Update, Some(&json!("t-1"))));
        assert!(!ledger.is_loading(Operation::Delete, Some(&json!("t-2"))));
        assert!(!ledger.is_loading(Operation::Delete, None));
    }

    #[test]
    fn test_numeric_and_string_ids_share_a_key() {
        let mut ledger = OperationLedger::default();
        ledger.begin(Operation::Update, Some(&json!(1)));
        assert!(ledger.is_loading(Operation::Update, Some(&json!("1"))));
    }
}
