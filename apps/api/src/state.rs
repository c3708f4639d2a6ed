use std::sync::Arc;

use crate::collaborators::{DocumentEvaluator, SummaryGenerator};
use crate::config::Config;
use crate::form::store::SessionStore;
use crate::theme::ThemeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Startup configuration, kept alongside the stores it seeded.
    #[allow(dead_code)]
    pub config: Config,
    /// In-memory form sessions — the only mutable state in the service.
    pub sessions: SessionStore,
    /// Pluggable summary collaborator. Production: AnthropicClient.
    pub summarizer: Arc<dyn SummaryGenerator>,
    /// Pluggable evaluation collaborator. Production: AnthropicClient.
    pub evaluator: Arc<dyn DocumentEvaluator>,
    /// Durable theme preference, file-backed under `config.data_dir`.
    pub theme: ThemeStore,
}
