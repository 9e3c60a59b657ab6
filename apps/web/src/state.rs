use std::sync::Arc;

use skimtube_core::SkimPipeline;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<SkimPipeline>,
    pub html_links: bool,
    pub default_chunk_minutes: u32,
}
