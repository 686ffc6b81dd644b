//! Shared application state threaded through every handler via
//! [`axum::extract::State`].

use std::sync::Arc;

use thai_search_orchestrator::Orchestrator;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self { orchestrator: Arc::new(orchestrator) }
    }
}
