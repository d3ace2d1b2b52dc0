//! Infrastructure layer - External service implementations

pub mod embedding;
pub mod graph;
pub mod http_client;
pub mod llm;
pub mod logging;
pub mod observability;
pub mod pipeline;
pub mod query;
pub mod semantic_cache;
pub mod services;

pub use http_client::{HttpClient, HttpClientTrait};
