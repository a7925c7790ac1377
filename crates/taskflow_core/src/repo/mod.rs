//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the key-value contract the persistence adapter writes through.
//! - Isolate SQLite query details from store orchestration.
//!
//! # Invariants
//! - Every `set` fully replaces the previous value for that key.
//! - Repository APIs return semantic errors (`InvalidData`) in addition to
//!   DB transport errors.

pub mod kv_repo;
