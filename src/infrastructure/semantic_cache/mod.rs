//! Semantic cache implementations

mod in_memory;
mod neo4j;

pub use in_memory::InMemorySemanticCache;
pub use neo4j::Neo4jSemanticCache;
