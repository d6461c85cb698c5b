//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the authenticated [`Actor`](waypoint_core::roles::Actor) from a Bearer token.
//! - [`rbac::RequireManager`] -- requires the `manager` role.

pub mod auth;
pub mod rbac;
