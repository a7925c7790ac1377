//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record and its JSON wire shape.
//! - Build new tasks with trimmed input, fresh id and creation time.
//!
//! # Invariants
//! - `title` is never empty or whitespace-only for tasks built by `Task::new`.
//! - Only `completed` changes after creation.

use crate::model::category::{find_category, Category};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable task identifier.
///
/// Kept as a string so ids written by older builds (for example
/// millisecond timestamps) still load unchanged.
pub type TaskId = String;

/// Validation failures for task input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty after trimming.
    EmptyTitle,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title must not be empty"),
        }
    }
}

impl Error for TaskValidationError {}

/// One unit of work in the list.
///
/// Field names are serialized in camelCase to match the stored blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    /// Free text, may be empty.
    pub details: String,
    /// Category id; unknown values resolve to the fallback category.
    pub category: String,
    pub completed: bool,
    /// RFC 3339 UTC timestamp, e.g. `2026-02-13T10:00:00.000Z`.
    pub created_at: String,
}

impl Task {
    /// Builds a new, not yet completed task.
    ///
    /// # Errors
    /// - Returns `TaskValidationError::EmptyTitle` when `title` trims to empty.
    pub fn new(
        title: &str,
        details: &str,
        category: impl Into<String>,
    ) -> Result<Self, TaskValidationError> {
        Self::with_id(Uuid::new_v4().to_string(), title, details, category)
    }

    /// Builds a new task with a caller-chosen id.
    pub fn with_id(
        id: impl Into<TaskId>,
        title: &str,
        details: &str,
        category: impl Into<String>,
    ) -> Result<Self, TaskValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }

        Ok(Self {
            id: id.into(),
            title: title.to_string(),
            details: details.trim().to_string(),
            category: category.into(),
            completed: false,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        })
    }

    /// Flips the completion flag.
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }

    /// Resolves this task's category, falling back when unknown.
    pub fn resolved_category(&self) -> &'static Category {
        find_category(&self.category)
    }
}
