//! Semantic cache statistics

use axum::extract::State;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::infrastructure::services::SemanticCacheStats;

/// GET /v1/cache/stats
pub async fn cache_stats(State(state): State<AppState>) -> Result<Json<SemanticCacheStats>, ApiError> {
    let stats = state.cache.stats().await?;
    Ok(Json(stats))
}
