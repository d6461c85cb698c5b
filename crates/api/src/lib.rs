//! Waypoint HTTP API.
//!
//! Bearer-authenticated axum routes over [`waypoint_services::Services`].
//! The binary in `main.rs` wires a Postgres store and the SMTP mailer; the
//! integration tests build the same router over an in-memory store.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
