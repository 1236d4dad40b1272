//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use curri_builder_core::ports::{CurriculumGenerationService, DatabaseService};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DatabaseService>,
    pub generator: Arc<dyn CurriculumGenerationService>,
    pub config: Arc<Config>,
}
