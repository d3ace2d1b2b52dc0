//! Chat model provider implementations

mod openai;

pub use openai::{DEFAULT_BASE_URL, OpenAiProvider};
