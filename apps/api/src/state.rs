use std::sync::Arc;

use crate::config::Config;
use crate::qa_client::QuestionService;
use crate::store::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The Question/Answer Service adapter. Trait object so controller flows
    /// can be exercised against a scripted fake.
    pub qa: Arc<dyn QuestionService>,
    /// Session snapshot store — in-memory by default, redis via SESSION_STORE.
    pub store: Arc<dyn SessionStore>,
    pub config: Config,
}
