use std::sync::Arc;

use crate::config::Config;
use crate::job_description::JobDescriptionAcquirer;
use crate::llm_client::GenerativeModel;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds only immutable collaborators; per-request data travels in `BatchRequest`.
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<dyn GenerativeModel>,
    pub job_descriptions: Arc<JobDescriptionAcquirer>,
    pub config: Config,
}
