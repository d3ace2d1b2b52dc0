//! Query resolution pipeline domain types
//!
//! A question moves through six stages: cache lookup, query generation,
//! validation and execution, answer synthesis, cache write and rendering.
//! Each stage reads and updates one [`PipelineContext`]; the first terminal
//! error sticks and turns every later stage into a no-op.

mod config;
mod context;
mod error;

pub use config::PipelineConfig;
pub use context::{PipelineContext, PipelineOutcome, PipelineStage};
pub use error::PipelineError;
