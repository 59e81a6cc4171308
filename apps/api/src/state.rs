use std::sync::Arc;

use crate::config::Config;
use crate::letter::LetterGenerator;
use crate::render::DocumentRenderer;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable letter generator. Default: MockGenerator. Swap via GENERATION_BACKEND.
    pub generator: Arc<dyn LetterGenerator>,
    pub renderer: Arc<dyn DocumentRenderer>,
    pub sessions: SessionStore,
}
