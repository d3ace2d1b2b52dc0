//! Application services built on the domain traits

mod semantic_query_cache;

pub use semantic_query_cache::{CacheLookup, SemanticCacheStats, SemanticQueryCache};
