//! v1 API endpoints

pub mod ask;
pub mod cache;

use axum::{
    Router,
    routing::{get, post},
};

use super::state::AppState;

pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/ask", post(ask::ask))
        .route("/cache/stats", get(cache::cache_stats))
}
