//! In-memory mock services with simulated latency.
//!
//! Stand-ins for a real backend: data lives in a process-local cache and
//! every call sleeps briefly so spinners and optimistic updates behave the
//! way they would against a network API. Nothing persists across runs.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use serde::Serialize;
use serde_json::{Value, json};
use tokio::time::sleep;
use uuid::Uuid;

use staffdesk_core::MonthView;
use staffdesk_core::date::DateRange;
use staffdesk_core::roster::{
    Absence, AbsenceKind, RosterItems, Shift, StaffEvent, StaffMember, Task, TaskPriority,
    TaskStatus,
};
use staffdesk_store::{CrudService, FetchParams, Record, RecordId, Response};

const FETCH_DELAY: Duration = Duration::from_millis(500);
const MUTATION_DELAY: Duration = Duration::from_millis(300);

/// Serialize a typed record into its wire shape.
fn to_record<T: Serialize>(value: &T) -> Record {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => map,
        _ => Record::new(),
    }
}

fn seed_tasks() -> Vec<Record> {
    let tasks = [
        Task {
            id: "t-1".to_string(),
            title: "Fix leaking faucet in room 312".to_string(),
            description: Some("Guest reported dripping overnight".to_string()),
            priority: TaskPriority::High,
            status: TaskStatus::Pending,
            assigned_to: Some("Mike Rodriguez".to_string()),
            created_at: Utc::now(),
        },
        Task {
            id: "t-2".to_string(),
            title: "Deep clean suite 501".to_string(),
            description: None,
            priority: TaskPriority::Medium,
            status: TaskStatus::InProgress,
            assigned_to: Some("Emma Davis".to_string()),
            created_at: Utc::now(),
        },
        Task {
            id: "t-3".to_string(),
            title: "Restock minibar on floor 2".to_string(),
            description: None,
            priority: TaskPriority::Low,
            status: TaskStatus::Pending,
            assigned_to: None,
            created_at: Utc::now(),
        },
        Task {
            id: "t-4".to_string(),
            title: "Test fire alarm panel".to_string(),
            description: Some("Monthly safety check".to_string()),
            priority: TaskPriority::High,
            status: TaskStatus::Completed,
            assigned_to: Some("Carlos Martinez".to_string()),
            created_at: Utc::now(),
        },
    ];
    tasks.iter().map(to_record).collect()
}

/// Task backend backed by a process-local cache.
pub struct MockTaskService {
    cache: Mutex<Vec<Record>>,
}

impl MockTaskService {
    pub fn new() -> Self {
        MockTaskService {
            cache: Mutex::new(seed_tasks()),
        }
    }
}

#[async_trait]
impl CrudService for MockTaskService {
    async fn fetch(&self, params: FetchParams) -> Response<Vec<Record>> {
        sleep(FETCH_DELAY).await;
        let cache = self.cache.lock().expect("task cache poisoned");
        let mut data = cache.clone();
        if let Some(status) = params.get("status") {
            data.retain(|task| task.get("status") == Some(status));
        }
        Response::success(data)
    }

    async fn create(&self, data: Record) -> Response<Record> {
        sleep(MUTATION_DELAY).await;
        let mut task = data;
        task.insert("id".to_string(), json!(Uuid::new_v4().to_string()));
        task.entry("status".to_string()).or_insert(json!("pending"));
        task.insert("createdAt".to_string(), json!(Utc::now().to_rfc3339()));
        let mut cache = self.cache.lock().expect("task cache poisoned");
        cache.push(task.clone());
        Response::success(task)
    }

    async fn update(&self, id: &RecordId, patch: Record) -> Response<Option<Record>> {
        sleep(MUTATION_DELAY).await;
        let mut cache = self.cache.lock().expect("task cache poisoned");
        match cache.iter_mut().find(|task| task.get("id") == Some(id)) {
            Some(task) => {
                task.extend(patch.into_iter());
                Response::success(Some(task.clone()))
            }
            None => Response::error(format!("No task with id {id}")),
        }
    }

    async fn delete(&self, id: &RecordId) -> Response<()> {
        sleep(MUTATION_DELAY).await;
        let mut cache = self.cache.lock().expect("task cache poisoned");
        let before = cache.len();
        cache.retain(|task| task.get("id") != Some(id));
        if cache.len() == before {
            return Response::error(format!("No task with id {id}"));
        }
        Response::success(())
    }
}

/// The staff directory. Static mock data; no CRUD surface.
pub fn staff_directory() -> Vec<StaffMember> {
    let member = |id: &str, name: &str, position: &str, department: &str, on_shift| StaffMember {
        id: id.to_string(),
        name: name.to_string(),
        position: position.to_string(),
        department: department.to_string(),
        on_shift,
    };
    vec![
        member("s-1", "Sarah Johnson", "Reception Manager", "Reception", true),
        member("s-2", "Mike Rodriguez", "Maintenance Staff", "Housekeeping", true),
        member("s-3", "Lisa Chen", "HR Manager", "Management", false),
        member("s-4", "Carlos Martinez", "Security Guard", "Security", true),
        member("s-5", "Emma Davis", "Housekeeping Staff", "Housekeeping", false),
    ]
}

/// Roster overlay for the displayed month: a few shifts, an absence, and a
/// one-off event at fixed day offsets.
pub fn sample_roster(view: MonthView) -> RosterItems {
    let day = |d: u32| view.date_of(d.min(view.days_in_month()));
    let now = Utc::now();

    RosterItems {
        shifts: vec![
            Shift {
                id: "sh-1".to_string(),
                staff: vec!["Sarah Johnson".to_string(), "Emma Davis".to_string()],
                date_range: DateRange::new(day(3), day(6)),
                created_at: now,
            },
            Shift {
                id: "sh-2".to_string(),
                staff: vec!["Carlos Martinez".to_string()],
                date_range: DateRange::new(day(17), day(19)),
                created_at: now,
            },
        ],
        absences: vec![Absence {
            id: "ab-1".to_string(),
            staff: "Mike Rodriguez".to_string(),
            date_range: DateRange::new(day(12), day(14)),
            kind: AbsenceKind::Vacation,
            created_at: now,
        }],
        events: vec![StaffEvent {
            id: "ev-1".to_string(),
            title: "Fire drill".to_string(),
            date: day(20),
            created_at: now,
        }],
    }
}

/// True when the given date falls in the current month (used to underline
/// today's cell).
pub fn is_today(view: MonthView, day: u32) -> bool {
    let today = chrono::Local::now().date_naive();
    view.year == today.year() && view.month == today.month() && day == today.day()
}
