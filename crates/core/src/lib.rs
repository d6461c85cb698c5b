//! Waypoint domain core.
//!
//! Pure domain logic with no I/O and no internal dependencies, shared by the
//! persistence, service, HTTP and worker crates:
//!
//! - [`access`] -- the ownership authorization predicate.
//! - [`rotation`] -- the bounded current-milestone rotation rule.
//! - [`cascade`] -- project cascade-delete step order.
//! - [`ordering`] -- milestone display order.
//! - [`tasks`] -- weekly progress task lists and their text encoding.

pub mod access;
pub mod cascade;
pub mod error;
pub mod ordering;
pub mod roles;
pub mod rotation;
pub mod status;
pub mod tasks;
pub mod types;
pub mod validation;
pub mod week;
