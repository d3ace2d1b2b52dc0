//! Application state shared across handlers

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::context::AppContext;
use crate::domain::GraphStore;
use crate::infrastructure::pipeline::QueryPipeline;
use crate::infrastructure::services::SemanticQueryCache;

#[derive(Clone, Debug)]
pub struct AppState {
    pub pipeline: Arc<QueryPipeline>,
    pub cache: Arc<SemanticQueryCache>,
    pub graph: Arc<dyn GraphStore>,
    /// Parent of every per-request cancellation token
    pub shutdown: CancellationToken,
    pub max_question_chars: usize,
}

impl AppState {
    pub fn from_context(context: &AppContext) -> Self {
        Self {
            pipeline: context.pipeline.clone(),
            cache: context.cache.clone(),
            graph: context.graph.clone(),
            shutdown: context.shutdown.clone(),
            max_question_chars: context.config.pipeline.max_question_chars,
        }
    }
}
