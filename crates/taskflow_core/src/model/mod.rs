//! Domain model for the task list.
//!
//! # Responsibility
//! - Define the persisted `Task` record and its validation rules.
//! - Hold the fixed category registry and the derived list views.
//!
//! # Invariants
//! - Task ids are assigned once at creation and never change.
//! - Deletion is a hard delete; there are no tombstones.

pub mod category;
pub mod task;
pub mod view;
