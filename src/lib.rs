pub mod config;
pub mod rest;
pub mod tasks;

use std::sync::Arc;

use config::ServerConfig;
use tasks::TaskService;

/// Shared application state passed to every request handler.
///
/// The store lives inside the service and is injected at startup — there is
/// no module-level shared state anywhere in the crate.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub tasks: Arc<TaskService>,
    pub started_at: std::time::Instant,
}
