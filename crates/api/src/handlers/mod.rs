//! Request handlers, one module per resource.
//!
//! Handlers extract the [`AuthUser`](crate::middleware::auth::AuthUser),
//! call the matching service and wrap the result in
//! [`DataResponse`](crate::response::DataResponse). Ownership checks live in
//! the services.

pub mod dashboard;
pub mod milestone;
pub mod progress;
pub mod project;
pub mod reminder;
