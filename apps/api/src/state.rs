use std::sync::Arc;

use crate::config::Config;
use crate::optimizer::ResumeOptimizer;
use crate::sessions::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    /// Model-backed operations. Default: GeminiOptimizer; tests script a fake.
    pub optimizer: Arc<dyn ResumeOptimizer>,
    pub config: Config,
}
