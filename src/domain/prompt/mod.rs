//! Prompt templates for the model-backed stages

mod template;

pub use template::{PromptTemplate, PromptVariable, TemplateError};
