//! Semantic cache domain models and traits
//!
//! Stores previously answered questions by embedding so that a near-identical
//! question can reuse the stored answer template and graph query.

mod config;
mod repository;

pub use config::{CacheBackend, SemanticCacheConfig};
pub use repository::{CachedAnswer, CachedEntry, SemanticCache, SemanticSearchResult};

#[cfg(test)]
pub use repository::mock::FailingSemanticCache;
