//! Core use-case services.
//!
//! # Responsibility
//! - Own the canonical in-memory task collection.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod task_store;
