use std::sync::Arc;

use crate::ai::FallbackAi;
use crate::storage::Storage;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Explicitly constructed store; tests build their own.
    pub store: Arc<dyn Storage>,
    /// Selected AI provider wrapped with canned-data fallback.
    pub ai: FallbackAi,
}

impl AppState {
    pub fn new(store: Arc<dyn Storage>, ai: FallbackAi) -> Self {
        Self { store, ai }
    }
}
