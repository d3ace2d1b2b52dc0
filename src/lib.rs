//! Graph QA
//!
//! Answers natural-language questions over a Neo4j graph:
//! - Cypher generation and answer templating with OpenAI-compatible models
//! - Dry-run validation before execution
//! - A semantic cache that reuses queries and templates for similar questions

pub mod api;
pub mod cli;
pub mod config;
pub mod context;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use context::AppContext;
