use std::sync::Arc;

use crate::config::Config;
use crate::orchestrator::CareerOrchestrator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Owns every agent. Built once in `main`.
    pub orchestrator: Arc<CareerOrchestrator>,
}
