//! Domain layer - core types and the traits adapters implement

pub mod embedding;
pub mod error;
pub mod graph;
pub mod llm;
pub mod pipeline;
pub mod prompt;
pub mod query;
pub mod semantic_cache;
pub mod template;

pub use embedding::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};
pub use error::DomainError;
pub use graph::{FieldValue, GraphStore, Row, ScalarValue};
pub use llm::{LlmProvider, LlmRequest, LlmResponse, Message, MessageRole, Usage};
pub use pipeline::{PipelineConfig, PipelineContext, PipelineError, PipelineOutcome, PipelineStage};
pub use prompt::{PromptTemplate, PromptVariable, TemplateError};
pub use query::{GenerationRequest, QueryGenerator, ResponseSynthesizer, strip_code_fences};
pub use semantic_cache::{
    CacheBackend, CachedAnswer, CachedEntry, SemanticCache, SemanticCacheConfig,
    SemanticSearchResult,
};
pub use template::{RenderOutput, TemplateRenderer};
