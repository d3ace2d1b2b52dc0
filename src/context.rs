//! Process-scoped resources
//!
//! Built once at startup and passed explicitly to the HTTP server or the
//! one-shot CLI command. [`AppContext::shutdown`] releases everything.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::domain::semantic_cache::{CacheBackend, SemanticCache, SemanticCacheConfig};
use crate::domain::{DomainError, GraphStore, LlmProvider};
use crate::infrastructure::embedding::OpenAiEmbeddingProvider;
use crate::infrastructure::graph::{Neo4jClient, Neo4jGraphStore};
use crate::infrastructure::http_client::HttpClient;
use crate::infrastructure::llm::OpenAiProvider;
use crate::infrastructure::pipeline::QueryPipeline;
use crate::infrastructure::query::{LlmQueryGenerator, LlmResponseSynthesizer, PromptSet};
use crate::infrastructure::semantic_cache::{InMemorySemanticCache, Neo4jSemanticCache};
use crate::infrastructure::services::SemanticQueryCache;

#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub graph: Arc<dyn GraphStore>,
    pub cache: Arc<SemanticQueryCache>,
    pub pipeline: Arc<QueryPipeline>,
    /// Cancelled on shutdown; requests run under child tokens
    pub shutdown: CancellationToken,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        graph: Arc<dyn GraphStore>,
        cache: Arc<SemanticQueryCache>,
        pipeline: Arc<QueryPipeline>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            graph,
            cache,
            pipeline,
            shutdown: CancellationToken::new(),
        }
    }

    /// Wire the Neo4j, model and cache adapters from configuration
    pub async fn build(config: AppConfig) -> Result<Self, DomainError> {
        let http = HttpClient::with_timeout(Duration::from_secs(config.models.request_timeout_secs))?;

        let neo4j = Arc::new(Neo4jClient::new(
            http.clone(),
            &config.neo4j.url,
            &config.neo4j.database,
            &config.neo4j.username,
            &config.neo4j.password,
        ));
        let graph: Arc<dyn GraphStore> = Arc::new(Neo4jGraphStore::new(neo4j.clone()));

        let embedder = Arc::new(
            OpenAiEmbeddingProvider::with_base_url(http.clone(), &config.models.base_url)
                .with_api_key(&config.models.api_key),
        );
        let llm: Arc<dyn LlmProvider> = Arc::new(
            OpenAiProvider::with_base_url(http, &config.models.base_url)
                .with_api_key(&config.models.api_key),
        );

        let backend: Arc<dyn SemanticCache> = match config.semantic_cache.backend {
            CacheBackend::Memory => memory_cache(&config.semantic_cache),
            CacheBackend::Neo4j => match Neo4jSemanticCache::open(neo4j, &config.semantic_cache).await {
                Ok(cache) => Arc::new(cache),
                Err(e) => {
                    match config.semantic_cache.snapshot_path {
                        Some(ref path) => warn!(
                            error = %e,
                            snapshot = %path,
                            "Vector index unavailable, falling back to the in-memory cache snapshot"
                        ),
                        None => warn!(
                            error = %e,
                            "Vector index unavailable, falling back to an in-memory cache; \
                             entries will not persist (set semantic_cache.snapshot_path to keep them)"
                        ),
                    }
                    memory_cache(&config.semantic_cache)
                }
            },
        };

        let prompts = PromptSet::load(config.pipeline.prompts_dir.as_deref().map(Path::new))
            .map_err(|e| DomainError::configuration(e.to_string()))?;
        let prompts = Arc::new(prompts);

        let generator = LlmQueryGenerator::new(llm.clone(), &config.models.coder_model, prompts.clone())
            .with_temperature(config.models.temperature);
        let synthesizer = LlmResponseSynthesizer::new(llm, &config.models.nlp_model, prompts)
            .with_temperature(config.models.temperature);

        let cache = Arc::new(SemanticQueryCache::new(
            backend,
            embedder,
            &config.models.embedding_model,
            config.semantic_cache.clone(),
        ));

        let pipeline = Arc::new(QueryPipeline::new(
            cache.clone(),
            graph.clone(),
            Arc::new(generator),
            Arc::new(synthesizer),
            config.pipeline.clone(),
        ));

        info!(
            neo4j = %config.neo4j.url,
            models = %config.models.base_url,
            cache_backend = ?config.semantic_cache.backend,
            "Application context ready"
        );

        Ok(Self::new(config, graph, cache, pipeline))
    }

    /// Cancel in-flight requests, flush the cache and close the graph store
    pub async fn shutdown(&self) {
        self.shutdown.cancel();

        if let Err(e) = self.cache.persist().await {
            warn!(error = %e, "Failed to persist semantic cache");
        }

        if let Err(e) = self.graph.close().await {
            warn!(error = %e, "Failed to close graph store");
        }

        info!("Application context shut down");
    }
}

/// In-memory backend, restored from and saved to the snapshot path when one is set
fn memory_cache(config: &SemanticCacheConfig) -> Arc<dyn SemanticCache> {
    match config.snapshot_path {
        Some(ref path) => Arc::new(InMemorySemanticCache::open(path)),
        None => Arc::new(InMemorySemanticCache::new()),
    }
}

#[cfg(test)]
pub mod test_support {
    use super::*;
    use crate::domain::embedding::MockEmbeddingProvider;
    use crate::domain::graph::MockGraphStore;
    use crate::domain::pipeline::PipelineConfig;
    use crate::domain::query::{MockQueryGenerator, MockResponseSynthesizer};

    /// Context over mocks: one `{name: "Ann"}` row and a fixed template
    pub fn mock_context(graph: MockGraphStore) -> AppContext {
        let cache = Arc::new(SemanticQueryCache::new(
            Arc::new(InMemorySemanticCache::new()),
            Arc::new(MockEmbeddingProvider::new(16)),
            "nomic-embed-text",
            SemanticCacheConfig::default(),
        ));
        let graph: Arc<dyn GraphStore> = Arc::new(graph);

        let pipeline = Arc::new(QueryPipeline::new(
            cache.clone(),
            graph.clone(),
            Arc::new(MockQueryGenerator::returning("MATCH (p:Person) RETURN p.name AS name")),
            Arc::new(MockResponseSynthesizer::returning("Hello {name}")),
            PipelineConfig::default(),
        ));

        AppContext::new(AppConfig::default(), graph, cache, pipeline)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::mock_context;
    use super::*;
    use crate::domain::graph::MockGraphStore;
    use crate::domain::semantic_cache::CachedEntry;

    #[tokio::test]
    async fn test_shutdown_cancels_requests() {
        let ctx = mock_context(MockGraphStore::new());
        let request = ctx.shutdown.child_token();

        ctx.shutdown().await;

        assert!(request.is_cancelled());
    }

    #[tokio::test]
    async fn test_build_with_memory_backend() {
        let ctx = super::AppContext::build(crate::config::AppConfig::default())
            .await
            .unwrap();

        assert_eq!(ctx.cache.stats().await.unwrap().backend, "memory");
    }

    #[tokio::test]
    async fn test_unreachable_neo4j_falls_back_to_snapshot() {
        let path = std::env::temp_dir().join(format!("graph-qa-fallback-{}.json", uuid::Uuid::new_v4()));

        let mut config = crate::config::AppConfig::default();
        config.neo4j.url = "http://127.0.0.1:1".to_string();
        config.semantic_cache.backend = CacheBackend::Neo4j;
        config.semantic_cache.snapshot_path = Some(path.to_string_lossy().into_owned());

        let ctx = super::AppContext::build(config.clone()).await.unwrap();
        assert_eq!(ctx.cache.stats().await.unwrap().backend, "memory");

        let cache = memory_cache(&config.semantic_cache);
        cache
            .store(CachedEntry::new("Who is enrolled?", vec![1.0, 0.0], "Hello {name}", "MATCH (n) RETURN n"))
            .await
            .unwrap();
        cache.persist().await.unwrap();

        let restored = memory_cache(&config.semantic_cache);
        assert_eq!(restored.size().await.unwrap(), 1);

        let _ = std::fs::remove_file(&path);
    }
}
