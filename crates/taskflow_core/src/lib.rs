//! Core domain logic for TaskFlow.
//! This crate is the single source of truth for task-list invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod storage;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::category::{
    default_category, fallback_category, find_category, Category, CATEGORIES,
    DEFAULT_CATEGORY_ID,
};
pub use model::task::{Task, TaskId, TaskValidationError};
pub use model::view::{TaskFilter, TaskStats, UnknownFilter};
pub use repo::kv_repo::{KeyValueRepository, RepoError, RepoResult, SqliteKvRepository};
pub use service::task_store::TaskStore;
pub use storage::task_storage::{KvTaskStorage, TaskPersistence, TASKS_STORAGE_KEY};

/// Task store wired to the on-device SQLite key-value store.
pub type SqliteTaskStore = TaskStore<KvTaskStorage<SqliteKvRepository>>;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
