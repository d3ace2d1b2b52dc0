//! Graph store implementations

mod client;
mod neo4j;

pub use client::{Neo4jClient, StatementResult};
pub use neo4j::{Neo4jGraphStore, format_schema};
