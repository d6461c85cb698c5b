use std::sync::Arc;

use waypoint_db::RecordStore;
use waypoint_services::Services;

use crate::config::ServerConfig;

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind an `Arc` or already `Clone`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub services: Services,
    /// Used directly only by the health check.
    pub store: Arc<dyn RecordStore>,
}
