//! Query resolution pipeline

mod query_pipeline;

pub use query_pipeline::QueryPipeline;
