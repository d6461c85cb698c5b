//! Entity models and the write-side DTOs the services hand to the store.
//!
//! Write DTOs carry already-validated values; request shapes with optional
//! fields live in the services crate.

pub mod email_reminder;
pub mod milestone;
pub mod project;
pub mod weekly_progress;
