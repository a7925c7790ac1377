//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose task-list use cases to Dart via FRB.
//! - Own the single process-wide `TaskStore`.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Calls are serialized through one mutex, so saves reach storage in
//!   mutation order.
//! - Store calls made before `init_store` return a failure envelope.
//! - Once `init_store` has run, task calls succeed even when the database
//!   could not be opened; the list then lives in memory only.

use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use taskflow_core::db::{open_db, open_db_in_memory};
use taskflow_core::{
    core_version as core_version_inner, default_category as default_category_inner,
    find_category, init_logging as init_logging_inner, ping as ping_inner, Category, KvTaskStorage, SqliteKvRepository, SqliteTaskStore, Task,
    TaskFilter, TaskStats, TaskStore, CATEGORIES,
};

struct StoreHandle {
    db_path: PathBuf,
    store: SqliteTaskStore,
    /// Why the file could not be used; set when running in memory.
    open_error: Option<String>,
}

static STORE: Mutex<Option<StoreHandle>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Opens the task database and loads the task list.
///
/// Input semantics:
/// - `db_path`: absolute path of the SQLite file owned by the app sandbox.
///
/// # FFI contract
/// - Must complete before the UI accepts task mutations.
/// - Idempotent for the same path; a different path is rejected.
/// - If the file cannot be opened, an empty in-memory list is installed and
///   the open error is returned as a diagnostic; task calls keep working.
/// - Never panics; returns empty string on success and error message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn init_store(db_path: String) -> String {
    match init_store_inner(db_path.trim()) {
        Ok(()) => String::new(),
        Err(err) => {
            error!("event=store_open module=ffi status=error error={err}");
            err
        }
    }
}

/// Task row returned to the UI, with its category already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: String,
    pub title: String,
    pub details: String,
    /// Stored category id (may be unknown to this build).
    pub category: String,
    pub category_label: String,
    pub category_color: String,
    pub category_icon: String,
    pub completed: bool,
    /// RFC 3339 UTC creation time.
    pub created_at: String,
}

/// Category option for the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryItem {
    pub id: String,
    pub label: String,
    pub color: String,
    pub icon: String,
}

/// Generic action response envelope for task mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskActionResponse {
    /// Whether the operation was applied.
    pub ok: bool,
    /// Created task for `task_add`; `None` otherwise.
    pub task: Option<TaskItem>,
    /// Human-readable message for diagnostics/UI.
    pub message: String,
}

impl TaskActionResponse {
    fn success(message: impl Into<String>, task: Option<TaskItem>) -> Self {
        Self {
            ok: true,
            task,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            task: None,
            message: message.into(),
        }
    }
}

/// Filtered list response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListResponse {
    pub ok: bool,
    pub items: Vec<TaskItem>,
    /// Effective filter (`all|active|completed`).
    pub applied_filter: String,
    pub message: String,
}

/// Progress counters for the stats bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskStatsResponse {
    pub ok: bool,
    pub total: u32,
    pub completed_count: u32,
    pub active_count: u32,
    pub progress_percent: u32,
    pub message: String,
}

/// Creates a task from the add-task form.
///
/// # FFI contract
/// - Blank titles are rejected with `ok=false` and nothing is stored.
/// - Returns the created task on success.
#[flutter_rust_bridge::frb(sync)]
pub fn task_add(title: String, details: String, category: String) -> TaskActionResponse {
    match with_store(|store| store.add(&title, &details, &category)) {
        Ok(Ok(task)) => TaskActionResponse::success("Task created.", Some(to_task_item(&task))),
        Ok(Err(err)) => TaskActionResponse::failure(format!("task_add rejected: {err}")),
        Err(err) => TaskActionResponse::failure(format!("task_add failed: {err}")),
    }
}

/// Flips the completion state of a task.
///
/// # FFI contract
/// - Unknown ids are a no-op and still return `ok=true`.
#[flutter_rust_bridge::frb(sync)]
pub fn task_toggle(id: String) -> TaskActionResponse {
    match with_store(|store| store.toggle(&id)) {
        Ok(true) => TaskActionResponse::success("Task updated.", None),
        Ok(false) => TaskActionResponse::success("No matching task.", None),
        Err(err) => TaskActionResponse::failure(format!("task_toggle failed: {err}")),
    }
}

/// Deletes a task permanently.
///
/// # FFI contract
/// - The UI must confirm with the user before calling.
/// - Unknown ids are a no-op and still return `ok=true`.
#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(id: String) -> TaskActionResponse {
    match with_store(|store| store.delete(&id)) {
        Ok(true) => TaskActionResponse::success("Task deleted.", None),
        Ok(false) => TaskActionResponse::success("No matching task.", None),
        Err(err) => TaskActionResponse::failure(format!("task_delete failed: {err}")),
    }
}

/// Lists tasks for one of the `all|active|completed` tabs, newest first.
#[flutter_rust_bridge::frb(sync)]
pub fn task_list(filter: String) -> TaskListResponse {
    let filter = match filter.parse::<TaskFilter>() {
        Ok(filter) => filter,
        Err(err) => {
            return TaskListResponse {
                ok: false,
                items: Vec::new(),
                applied_filter: String::new(),
                message: err.to_string(),
            };
        }
    };

    match with_store(|store| store.filtered(filter)) {
        Ok(tasks) => TaskListResponse {
            ok: true,
            items: tasks.iter().map(to_task_item).collect(),
            applied_filter: filter.as_str().to_string(),
            message: format!("Found {} task(s).", tasks.len()),
        },
        Err(err) => TaskListResponse {
            ok: false,
            items: Vec::new(),
            applied_filter: filter.as_str().to_string(),
            message: format!("task_list failed: {err}"),
        },
    }
}

/// Returns aggregate progress for the whole list.
#[flutter_rust_bridge::frb(sync)]
pub fn task_stats() -> TaskStatsResponse {
    match with_store(|store| store.stats()) {
        Ok(stats) => to_stats_response(stats),
        Err(err) => TaskStatsResponse {
            ok: false,
            total: 0,
            completed_count: 0,
            active_count: 0,
            progress_percent: 0,
            message: format!("task_stats failed: {err}"),
        },
    }
}

/// Returns the category the add-task form preselects.
#[flutter_rust_bridge::frb(sync)]
pub fn default_category() -> CategoryItem {
    to_category_item(default_category_inner())
}

/// Returns the fixed category registry in display order.
#[flutter_rust_bridge::frb(sync)]
pub fn list_categories() -> Vec<CategoryItem> {
    CATEGORIES.iter().map(to_category_item).collect()
}

fn init_store_inner(db_path: &str) -> Result<(), String> {
    if db_path.is_empty() {
        return Err("db_path cannot be empty".to_string());
    }
    let path = Path::new(db_path);
    if !path.is_absolute() {
        return Err(format!("db_path must be an absolute path, got `{db_path}`"));
    }

    let mut slot = lock_store();
    if let Some(handle) = slot.as_ref() {
        if handle.db_path != path {
            return Err(format!(
                "task store already open at `{}`; refusing to switch to `{db_path}`",
                handle.db_path.display()
            ));
        }
        return handle.open_error.clone().map_or(Ok(()), Err);
    }

    let (store, open_error) = open_store(path)?;
    info!(
        "event=store_open module=ffi status=ok count={} in_memory={}",
        store.tasks().len(),
        open_error.is_some()
    );

    *slot = Some(StoreHandle {
        db_path: path.to_path_buf(),
        store,
        open_error: open_error.clone(),
    });
    open_error.map_or(Ok(()), Err)
}

/// Opens the store at `path`, falling back to an empty in-memory store.
///
/// Returns the file open error alongside the fallback store.
fn open_store(path: &Path) -> Result<(SqliteTaskStore, Option<String>), String> {
    match open_file_repo(path) {
        Ok(repo) => Ok((TaskStore::open(KvTaskStorage::new(repo)), None)),
        Err(err) => {
            warn!("event=store_open module=ffi status=fallback mode=memory error={err}");
            let conn =
                open_db_in_memory().map_err(|err| format!("in-memory DB open failed: {err}"))?;
            let repo = SqliteKvRepository::try_new(conn)
                .map_err(|err| format!("in-memory repo init failed: {err}"))?;
            Ok((TaskStore::open(KvTaskStorage::new(repo)), Some(err)))
        }
    }
}

fn open_file_repo(path: &Path) -> Result<SqliteKvRepository, String> {
    let conn = open_db(path).map_err(|err| format!("task DB open failed: {err}"))?;
    SqliteKvRepository::try_new(conn).map_err(|err| format!("task repo init failed: {err}"))
}

fn with_store<T>(f: impl FnOnce(&mut SqliteTaskStore) -> T) -> Result<T, String> {
    let mut slot = lock_store();
    match slot.as_mut() {
        Some(handle) => Ok(f(&mut handle.store)),
        None => Err("task store is not initialized; call init_store first".to_string()),
    }
}

// A panic while holding the lock must not brick later calls.
fn lock_store() -> MutexGuard<'static, Option<StoreHandle>> {
    STORE.lock().unwrap_or_else(PoisonError::into_inner)
}

fn to_task_item(task: &Task) -> TaskItem {
    let category = find_category(&task.category);
    TaskItem {
        id: task.id.clone(),
        title: task.title.clone(),
        details: task.details.clone(),
        category: task.category.clone(),
        category_label: category.label.to_string(),
        category_color: category.color.to_string(),
        category_icon: category.icon.to_string(),
        completed: task.completed,
        created_at: task.created_at.clone(),
    }
}

fn to_category_item(category: &Category) -> CategoryItem {
    CategoryItem {
        id: category.id.to_string(),
        label: category.label.to_string(),
        color: category.color.to_string(),
        icon: category.icon.to_string(),
    }
}

fn to_stats_response(stats: TaskStats) -> TaskStatsResponse {
    let count = |value: usize| u32::try_from(value).unwrap_or(u32::MAX);
    TaskStatsResponse {
        ok: true,
        total: count(stats.total),
        completed_count: count(stats.completed_count),
        active_count: count(stats.active_count),
        progress_percent: u32::from(stats.progress_percent),
        message: String::new(),
    }
}
