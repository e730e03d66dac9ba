//! Task board commands.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use indicatif::ProgressBar;
use owo_colors::OwoColorize;
use serde_json::{Value, json};

use staffdesk_core::roster::Task;
use staffdesk_store::{OptimisticStore, Record, StoreOptions};

use crate::render::Render;
use crate::services::MockTaskService;

type TaskStore = OptimisticStore<MockTaskService>;

/// Build the store and run the mount-time fetch behind a spinner.
async fn load_store() -> Result<TaskStore> {
    let mut store = OptimisticStore::new(MockTaskService::new(), StoreOptions::default());

    let spinner = ProgressBar::new_spinner();
    spinner.set_message("Loading tasks…");
    spinner.enable_steady_tick(Duration::from_millis(80));
    let loaded = store.init().await;
    spinner.finish_and_clear();

    loaded.context("Failed to load tasks")?;
    Ok(store)
}

fn typed(record: &Record) -> Option<Task> {
    serde_json::from_value(Value::Object(record.clone())).ok()
}

fn print_board(store: &TaskStore) {
    if store.is_empty() {
        println!("{}", "No tasks".dimmed());
        return;
    }
    for record in store.items() {
        match typed(record) {
            Some(task) => println!("{}", task.render()),
            // Records created through the raw store API may not decode into
            // a Task; show their title rather than nothing
            None => println!(
                "? {}",
                record
                    .get("title")
                    .and_then(Value::as_str)
                    .unwrap_or("(untitled)")
            ),
        }
    }
}

pub async fn list(status: Option<&str>) -> Result<()> {
    let mut store = load_store().await?;

    if let Some(status) = status {
        let mut params = Record::new();
        params.insert("status".to_string(), json!(status));
        store.fetch_items(params).await.context("Failed to filter tasks")?;
    }

    print_board(&store);
    Ok(())
}

pub async fn add(
    title: String,
    description: Option<String>,
    priority: &str,
    assign: Option<String>,
) -> Result<()> {
    if !matches!(priority, "low" | "medium" | "high") {
        bail!("Unknown priority '{priority}'. Expected low, medium or high");
    }

    let mut store = load_store().await?;

    let mut data = Record::new();
    data.insert("title".to_string(), json!(title));
    data.insert("description".to_string(), json!(description));
    data.insert("priority".to_string(), json!(priority));
    data.insert("assignedTo".to_string(), json!(assign));

    let created = store.create_item(data).await.context("Failed to create task")?;
    let id = created.get("id").and_then(Value::as_str).unwrap_or("?");
    println!("Created task {}", id.bold());

    print_board(&store);
    Ok(())
}

pub async fn set_status(id: &str, status: &str) -> Result<()> {
    let mut store = load_store().await?;
    require_task(&store, id)?;

    let mut patch = Record::new();
    patch.insert("status".to_string(), json!(status));

    store
        .update_item(&json!(id), patch)
        .await
        .with_context(|| format!("Failed to update task {id}"))?;
    println!("Task {} is now {}", id.bold(), status);

    print_board(&store);
    Ok(())
}

pub async fn remove(id: &str) -> Result<()> {
    let mut store = load_store().await?;
    require_task(&store, id)?;

    store
        .delete_item(&json!(id))
        .await
        .with_context(|| format!("Failed to remove task {id}"))?;
    println!("Removed task {}", id.bold());

    print_board(&store);
    Ok(())
}

fn require_task(store: &TaskStore, id: &str) -> Result<()> {
    if store.get_item_by_id(&json!(id)).is_none() {
        let known: Vec<_> = store
            .items()
            .iter()
            .filter_map(|r| r.get("id").and_then(Value::as_str))
            .collect();
        bail!("Task '{}' not found. Known tasks: {}", id, known.join(", "));
    }
    Ok(())
}
