//! Flutter-facing bindings for TaskFlow core.

pub mod api;
