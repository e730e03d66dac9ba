//! Optimistic CRUD store over an abstract async service.
//!
//! Each mutation follows `Idle -> Optimistic -> {Committed | RolledBack}`:
//! the local collection changes immediately (when optimistic updates are
//! enabled), a snapshot of the pre-mutation state is held while the service
//! call is in flight, and a rejection restores the snapshot in place. The
//! caller decides whether to retry; the store never does.

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::ledger::{Operation, OperationLedger};
use crate::options::StoreOptions;
use crate::service::{CrudService, FetchParams, Record, RecordId, Response};

/// Marker field carried by records inserted optimistically while their
/// create call is in flight. Replaced records never carry it.
pub const PROVISIONAL_FIELD: &str = "_provisional";

/// A local collection mirroring one service-backed collection.
///
/// One store owns one collection; operations take `&mut self`, so a single
/// store's mutations are naturally serialized by the borrow rules.
pub struct OptimisticStore<S: CrudService> {
    service: S,
    options: StoreOptions,
    items: Vec<Record>,
    loading: bool,
    error: Option<String>,
    ledger: OperationLedger,
}

impl<S: CrudService> OptimisticStore<S> {
    pub fn new(service: S, mut options: StoreOptions) -> Self {
        let items = std::mem::take(&mut options.initial_data);
        OptimisticStore {
            service,
            options,
            items,
            loading: false,
            error: None,
            ledger: OperationLedger::default(),
        }
    }

    /// Mount-time initialization: performs the initial fetch when
    /// `auto_fetch` is set.
    pub async fn init(&mut self) -> StoreResult<()> {
        if self.options.auto_fetch {
            self.fetch_items(FetchParams::new()).await?;
        }
        Ok(())
    }

    /// Replace the collection with the service's data. On failure the
    /// existing collection is left untouched and only the error surfaces.
    pub async fn fetch_items(&mut self, params: FetchParams) -> StoreResult<Vec<Record>> {
        self.loading = true;
        self.error = None;

        let response = self.service.fetch(params).await;
        self.loading = false;

        match response {
            Response::Success { data } => {
                debug!(count = data.len(), "fetched collection");
                self.items = data.clone();
                let payload = Value::Array(data.iter().cloned().map(Value::Object).collect());
                self.report_success(Operation::Fetch, &payload);
                Ok(data)
            }
            Response::Error { error } => Err(self.fail(Operation::Fetch, error)),
        }
    }

    /// Alias for [`fetch_items`](Self::fetch_items).
    pub async fn refresh(&mut self, params: FetchParams) -> StoreResult<Vec<Record>> {
        self.fetch_items(params).await
    }

    /// Create a record. In optimistic mode a provisional record with a
    /// time-based temp id appears immediately and is replaced by the server
    /// record on success, or removed on failure.
    pub async fn create_item(&mut self, data: Record) -> StoreResult<Record> {
        self.ledger.begin(Operation::Create, None);
        self.error = None;

        let id_field = self.options.id_field.clone();
        let temp_id = self
            .options
            .optimistic_updates
            .then(|| Value::String(format!("temp_{}", Utc::now().timestamp_millis())));

        if let Some(temp_id) = &temp_id {
            let mut provisional = data.clone();
            provisional.insert(id_field.clone(), temp_id.clone());
            provisional.insert(PROVISIONAL_FIELD.to_string(), Value::Bool(true));
            self.items.push(provisional);
        }

        let response = self.service.create(data).await;
        self.ledger.finish(Operation::Create, None);

        match response {
            Response::Success { data: created } => {
                match &temp_id {
                    Some(temp_id) => {
                        // Swap the provisional entry for the server record
                        if let Some(slot) = self.items.iter_mut().find(|item| {
                            item.contains_key(PROVISIONAL_FIELD)
                                && item.get(&id_field) == Some(temp_id)
                        }) {
                            *slot = created.clone();
                        }
                    }
                    None => self.items.push(created.clone()),
                }
                self.report_success(Operation::Create, &Value::Object(created.clone()));
                Ok(created)
            }
            Response::Error { error } => {
                if let Some(temp_id) = &temp_id {
                    self.items.retain(|item| {
                        !(item.contains_key(PROVISIONAL_FIELD)
                            && item.get(&id_field) == Some(temp_id))
                    });
                }
                Err(self.fail(Operation::Create, error))
            }
        }
    }

    /// Shallow-merge a patch into the record with the given id. On failure
    /// the pre-mutation record is restored verbatim at its position.
    pub async fn update_item(&mut self, id: &RecordId, patch: Record) -> StoreResult<Record> {
        self.ledger.begin(Operation::Update, Some(id));
        self.error = None;

        let id_field = self.options.id_field.clone();
        let snapshot = self
            .items
            .iter()
            .position(|item| item.get(&id_field) == Some(id))
            .map(|index| (index, self.items[index].clone()));

        if self.options.optimistic_updates
            && let Some((index, _)) = &snapshot
        {
            self.items[*index].extend(patch.clone().into_iter());
        }

        let response = self.service.update(id, patch.clone()).await;
        self.ledger.finish(Operation::Update, Some(id));

        match response {
            Response::Success { data } => {
                let updated = data.unwrap_or_else(|| {
                    // Service acknowledged without a body: keep the local
                    // merge of snapshot and patch
                    let mut merged = snapshot
                        .as_ref()
                        .map(|(_, original)| original.clone())
                        .unwrap_or_default();
                    merged.extend(patch.into_iter());
                    merged
                });
                if let Some(index) = self
                    .items
                    .iter()
                    .position(|item| item.get(&id_field) == Some(id))
                {
                    self.items[index] = updated.clone();
                }
                self.report_success(Operation::Update, &Value::Object(updated.clone()));
                Ok(updated)
            }
            Response::Error { error } => {
                if self.options.optimistic_updates
                    && let Some((index, original)) = snapshot
                {
                    self.items[index] = original;
                }
                Err(self.fail(Operation::Update, error))
            }
        }
    }

    /// Delete the record with the given id. On failure the record is
    /// reinserted at its original index.
    pub async fn delete_item(&mut self, id: &RecordId) -> StoreResult<()> {
        self.ledger.begin(Operation::Delete, Some(id));
        self.error = None;

        let id_field = self.options.id_field.clone();
        let snapshot = self
            .items
            .iter()
            .position(|item| item.get(&id_field) == Some(id))
            .map(|index| (index, self.items[index].clone()));

        if self.options.optimistic_updates {
            self.items.retain(|item| item.get(&id_field) != Some(id));
        }

        let response = self.service.delete(id).await;
        self.ledger.finish(Operation::Delete, Some(id));

        match response {
            Response::Success { .. } => {
                if !self.options.optimistic_updates {
                    self.items.retain(|item| item.get(&id_field) != Some(id));
                }
                let payload = Value::Object(Record::from_iter([(id_field, id.clone())]));
                self.report_success(Operation::Delete, &payload);
                Ok(())
            }
            Response::Error { error } => {
                if self.options.optimistic_updates
                    && let Some((index, original)) = snapshot
                {
                    self.items.insert(index.min(self.items.len()), original);
                }
                Err(self.fail(Operation::Delete, error))
            }
        }
    }

    /// Read-only snapshot of the collection, in display order.
    pub fn items(&self) -> &[Record] {
        &self.items
    }

    pub fn get_item_by_id(&self, id: &RecordId) -> Option<&Record> {
        self.items
            .iter()
            .find(|item| item.get(&self.options.id_field) == Some(id))
    }

    /// Whether a mutation is in flight for the given operation, optionally
    /// scoped to one record.
    pub fn is_operation_loading(&self, operation: Operation, id: Option<&RecordId>) -> bool {
        self.ledger.is_loading(operation, id)
    }

    /// Whether a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn fail(&mut self, operation: Operation, message: String) -> StoreError {
        warn!(%operation, %message, "service call rejected");
        self.error = Some(message.clone());
        if let Some(on_error) = &self.options.on_error {
            on_error(operation, &message);
        }
        StoreError { operation, message }
    }

    fn report_success(&self, operation: Operation, payload: &Value) {
        if let Some(on_success) = &self.options.on_success {
            on_success(operation, payload);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn record(value: Value) -> Record {
        value.as_object().cloned().expect("test records are objects")
    }

    /// Test double with per-operation failure switches.
    #[derive(Default)]
    struct ScriptedService {
        fetch_data: Vec<Record>,
        fail_fetch: bool,
        fail_create: bool,
        fail_update: bool,
        fail_delete: bool,
        /// Body returned by `update`; `None` simulates an acknowledgement
        /// without a body.
        update_body: Option<Record>,
    }

    #[async_trait]
    impl CrudService for ScriptedService {
        async fn fetch(&self, _params: FetchParams) -> Response<Vec<Record>> {
            if self.fail_fetch {
                return Response::error("fetch rejected");
            }
            Response::success(self.fetch_data.clone())
        }

        async fn create(&self, data: Record) -> Response<Record> {
            if self.fail_create {
                return Response::error("create rejected");
            }
            let mut created = data;
            created.insert("id".to_string(), json!("srv-1"));
            Response::success(created)
        }

        async fn update(&self, _id: &RecordId, _patch: Record) -> Response<Option<Record>> {
            if self.fail_update {
                return Response::error("update rejected");
            }
            Response::success(self.update_body.clone())
        }

        async fn delete(&self, _id: &RecordId) -> Response<()> {
            if self.fail_delete {
                return Response::error("delete rejected");
            }
            Response::success(())
        }
    }

    fn store_with(service: ScriptedService, initial: Vec<Record>) -> OptimisticStore<ScriptedService> {
        OptimisticStore::new(
            service,
            StoreOptions::default()
                .with_auto_fetch(false)
                .with_initial_data(initial),
        )
    }

    #[tokio::test]
    async fn test_fetch_replaces_collection() {
        let service = ScriptedService {
            fetch_data: vec![record(json!({"id": "t-1"})), record(json!({"id": "t-2"}))],
            ..Default::default()
        };
        let mut store = store_with(service, vec![record(json!({"id": "stale"}))]);

        let fetched = store.fetch_items(FetchParams::new()).await.unwrap();
        assert_eq!(fetched.len(), 2);
        assert_eq!(store.items().len(), 2);
        assert_eq!(store.items()[0]["id"], "t-1");
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_existing_collection() {
        let service = ScriptedService {
            fail_fetch: true,
            ..Default::default()
        };
        let mut store = store_with(service, vec![record(json!({"id": "t-1"}))]);

        let result = store.fetch_items(FetchParams::new()).await;
        assert!(result.is_err());
        assert_eq!(store.items().len(), 1);
        assert_eq!(store.error(), Some("fetch rejected"));
    }

    #[tokio::test]
    async fn test_create_replaces_provisional_with_server_record() {
        let mut store = store_with(ScriptedService::default(), vec![]);

        let created = store
            .create_item(record(json!({"title": "Restock minibar"})))
            .await
            .unwrap();
        assert_eq!(created["id"], "srv-1");
        assert_eq!(store.items().len(), 1);
        assert_eq!(store.items()[0]["id"], "srv-1");
        assert!(!store.items()[0].contains_key(PROVISIONAL_FIELD));
    }

    #[tokio::test]
    async fn test_create_rollback_removes_provisional() {
        let service = ScriptedService {
            fail_create: true,
            ..Default::default()
        };
        let mut store = store_with(service, vec![]);

        let result = store.create_item(record(json!({"title": "x"}))).await;
        assert!(result.is_err());
        assert!(store.items().is_empty());
        assert_eq!(store.error(), Some("create rejected"));
        assert!(!store.is_operation_loading(Operation::Create, None));
    }

    #[tokio::test]
    async fn test_non_optimistic_create_appends_only_on_success() {
        let mut store = OptimisticStore::new(
            ScriptedService::default(),
            StoreOptions::default()
                .with_auto_fetch(false)
                .with_optimistic_updates(false),
        );

        let created = store
            .create_item(record(json!({"title": "x"})))
            .await
            .unwrap();
        assert_eq!(store.items().len(), 1);
        assert_eq!(store.items()[0], created);
    }

    #[tokio::test]
    async fn test_update_success_replaces_in_place() {
        let service = ScriptedService {
            update_body: Some(record(json!({"id": 1, "x": 2}))),
            ..Default::default()
        };
        let mut store = store_with(service, vec![record(json!({"id": 1, "x": 1}))]);

        let updated = store
            .update_item(&json!(1), record(json!({"x": 2})))
            .await
            .unwrap();
        assert_eq!(updated["x"], 2);
        assert_eq!(store.items(), &[record(json!({"id": 1, "x": 2}))]);
    }

    #[tokio::test]
    async fn test_update_without_body_keeps_local_merge() {
        let mut store = store_with(
            ScriptedService::default(),
            vec![record(json!({"id": 1, "title": "A", "status": "pending"}))],
        );

        let updated = store
            .update_item(&json!(1), record(json!({"status": "completed"})))
            .await
            .unwrap();
        assert_eq!(updated["title"], "A");
        assert_eq!(updated["status"], "completed");
        assert_eq!(store.items()[0]["status"], "completed");
    }

    #[tokio::test]
    async fn test_update_rollback_restores_snapshot() {
        let service = ScriptedService {
            fail_update: true,
            ..Default::default()
        };
        let mut store = store_with(service, vec![record(json!({"id": 1, "title": "A"}))]);

        let result = store.update_item(&json!(1), record(json!({"title": "B"}))).await;
        assert!(result.is_err());
        assert_eq!(store.items(), &[record(json!({"id": 1, "title": "A"}))]);
        assert_eq!(store.error(), Some("update rejected"));
    }

    #[tokio::test]
    async fn test_delete_success_removes_record() {
        let mut store = store_with(
            ScriptedService::default(),
            vec![record(json!({"id": "a"})), record(json!({"id": "b"}))],
        );

        store.delete_item(&json!("a")).await.unwrap();
        assert_eq!(store.items().len(), 1);
        assert_eq!(store.items()[0]["id"], "b");
    }

    #[tokio::test]
    async fn test_delete_rollback_restores_position() {
        let service = ScriptedService {
            fail_delete: true,
            ..Default::default()
        };
        let initial = vec![
            record(json!({"id": "a"})),
            record(json!({"id": "b"})),
            record(json!({"id": "c"})),
        ];
        let mut store = store_with(service, initial.clone());

        let result = store.delete_item(&json!("b")).await;
        assert!(result.is_err());
        assert_eq!(store.items(), initial.as_slice());
    }

    #[tokio::test]
    async fn test_update_missing_record_leaves_collection_untouched() {
        let mut store = store_with(
            ScriptedService::default(),
            vec![record(json!({"id": 1, "title": "A"}))],
        );

        let updated = store
            .update_item(&json!(99), record(json!({"title": "B"})))
            .await
            .unwrap();
        // The call still settles with the merged patch as its result
        assert_eq!(updated["title"], "B");
        assert_eq!(store.items(), &[record(json!({"id": 1, "title": "A"}))]);
    }

    #[tokio::test]
    async fn test_custom_id_field() {
        let mut store = OptimisticStore::new(
            ScriptedService {
                update_body: Some(record(json!({"uuid": "u-1", "done": true}))),
                ..Default::default()
            },
            StoreOptions::default()
                .with_auto_fetch(false)
                .with_id_field("uuid")
                .with_initial_data(vec![record(json!({"uuid": "u-1", "done": false}))]),
        );

        store
            .update_item(&json!("u-1"), record(json!({"done": true})))
            .await
            .unwrap();
        assert_eq!(store.get_item_by_id(&json!("u-1")).unwrap()["done"], true);
    }

    #[tokio::test]
    async fn test_error_resets_on_next_operation() {
        let service = ScriptedService {
            fail_update: true,
            ..Default::default()
        };
        let mut store = store_with(service, vec![record(json!({"id": 1}))]);

        assert!(store.update_item(&json!(1), Record::new()).await.is_err());
        assert!(store.has_error());

        store.create_item(record(json!({"title": "x"}))).await.unwrap();
        assert!(!store.has_error());
    }

    #[tokio::test]
    async fn test_callbacks_fire_per_outcome() {
        let successes: Arc<Mutex<Vec<Operation>>> = Arc::default();
        let errors: Arc<Mutex<Vec<(Operation, String)>>> = Arc::default();

        let recorded = Arc::clone(&successes);
        let recorded_errors = Arc::clone(&errors);
        let mut store = OptimisticStore::new(
            ScriptedService {
                fail_delete: true,
                ..Default::default()
            },
            StoreOptions::default()
                .with_auto_fetch(false)
                .with_initial_data(vec![record(json!({"id": "a"}))])
                .on_success(move |op, _payload| recorded.lock().unwrap().push(op))
                .on_error(move |op, message| {
                    recorded_errors
                        .lock()
                        .unwrap()
                        .push((op, message.to_string()))
                }),
        );

        store.create_item(record(json!({"title": "x"}))).await.unwrap();
        let _ = store.delete_item(&json!("a")).await;

        assert_eq!(successes.lock().unwrap().as_slice(), &[Operation::Create]);
        assert_eq!(
            errors.lock().unwrap().as_slice(),
            &[(Operation::Delete, "delete rejected".to_string())]
        );
    }
}
