//! Embedding provider domain models and traits

mod provider;
mod similarity;
mod types;

pub use provider::EmbeddingProvider;
pub use similarity::{cosine_similarity, normalized_similarity};
pub use types::{EmbeddingRequest, EmbeddingResponse};

#[cfg(test)]
pub use provider::mock::MockEmbeddingProvider;
