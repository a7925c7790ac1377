//! Persistence adapter for the whole task collection.
//!
//! # Responsibility
//! - Store the full task list as one JSON value under a fixed key.
//! - Absorb storage failures so the in-memory store keeps working.
//!
//! # Invariants
//! - `load` and `save` never return errors to the caller.
//! - Stored order is the in-memory order; nothing is re-sorted.

pub mod task_storage;
