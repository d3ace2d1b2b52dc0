//! Embedding provider trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use super::{EmbeddingRequest, EmbeddingResponse};
use crate::domain::DomainError;

/// Trait for embedding providers (OpenAI-compatible endpoints, Ollama, etc.)
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug {
    /// Generate embeddings for the given input
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Deterministic embedder: identical texts map to identical vectors,
    /// unrelated texts to near-orthogonal ones. Specific vectors can be pinned.
    #[derive(Debug)]
    pub struct MockEmbeddingProvider {
        dimensions: usize,
        pinned: HashMap<String, Vec<f32>>,
        error: Option<String>,
        calls: AtomicUsize,
    }

    impl MockEmbeddingProvider {
        pub fn new(dimensions: usize) -> Self {
            Self {
                dimensions,
                pinned: HashMap::new(),
                error: None,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn with_vector(mut self, text: impl Into<String>, vector: Vec<f32>) -> Self {
            self.pinned.insert(text.into(), vector);
            self
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn vector_for(&self, text: &str) -> Vec<f32> {
            if let Some(vector) = self.pinned.get(text) {
                return vector.clone();
            }

            (0..self.dimensions)
                .map(|i| {
                    let mut hash: u64 = 0xcbf2_9ce4_8422_2325 ^ (i as u64);
                    for byte in text.bytes() {
                        hash ^= byte as u64;
                        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
                    }
                    ((hash % 2001) as f32 / 1000.0) - 1.0
                })
                .collect()
        }
    }

    #[async_trait]
    impl EmbeddingProvider for MockEmbeddingProvider {
        async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if let Some(ref error) = self.error {
                return Err(DomainError::provider("mock", error));
            }

            let vectors = request.inputs().iter().map(|t| self.vector_for(t)).collect();
            Ok(EmbeddingResponse::new(request.model(), vectors))
        }

        fn provider_name(&self) -> &'static str {
            "mock"
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::domain::embedding::cosine_similarity;

        #[tokio::test]
        async fn test_deterministic_embeddings() {
            let provider = MockEmbeddingProvider::new(64);

            let a = provider
                .embed(EmbeddingRequest::single("m", "Hello"))
                .await
                .unwrap()
                .into_first()
                .unwrap();
            let b = provider
                .embed(EmbeddingRequest::single("m", "Hello"))
                .await
                .unwrap()
                .into_first()
                .unwrap();

            assert_eq!(a, b);
            assert_eq!(a.len(), 64);
            assert_eq!(provider.calls(), 2);
        }

        #[tokio::test]
        async fn test_pinned_vector() {
            let provider = MockEmbeddingProvider::new(3).with_vector("X", vec![1.0, 0.0, 0.0]);

            let vector = provider
                .embed(EmbeddingRequest::single("m", "X"))
                .await
                .unwrap()
                .into_first()
                .unwrap();

            assert!((cosine_similarity(&vector, &[1.0, 0.0, 0.0]) - 1.0).abs() < 0.0001);
        }

        #[tokio::test]
        async fn test_mock_provider_error() {
            let provider = MockEmbeddingProvider::new(8).with_error("connection refused");
            let result = provider.embed(EmbeddingRequest::single("m", "Hello")).await;

            assert!(result.is_err());
        }
    }
}
