//! Background delivery of due e-mail reminders.
//!
//! [`ReminderSweeper`] runs
//! [`ReminderService::process_due`](waypoint_services::ReminderService::process_due)
//! on a fixed interval until cancelled. The binary wires it to Postgres and
//! SMTP.

pub mod config;
pub mod sweeper;

pub use config::WorkerConfig;
pub use sweeper::{ReminderSweeper, SweepSummary};
