//! Model-backed query generation and answer synthesis

mod llm_generator;
mod llm_synthesizer;
mod prompts;

pub use llm_generator::LlmQueryGenerator;
pub use llm_synthesizer::LlmResponseSynthesizer;
pub use prompts::PromptSet;
