// src/state.rs

use std::sync::Arc;

use axum::extract::FromRef;

use crate::{config::Config, gemini::QuizGenerator, store::QuizStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn QuizStore>,
    /// `None` when no API key is configured.
    pub generator: Option<Arc<dyn QuizGenerator>>,
    pub config: Config,
}

impl FromRef<AppState> for Arc<dyn QuizStore> {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
