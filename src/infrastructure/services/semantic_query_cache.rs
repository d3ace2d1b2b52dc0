//! Question cache service
//!
//! Embeds questions and looks up or stores their answer template and graph
//! query in a [`SemanticCache`] backend.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tracing::debug;

use crate::domain::DomainError;
use crate::domain::embedding::{EmbeddingProvider, EmbeddingRequest};
use crate::domain::semantic_cache::{CachedEntry, SemanticCache, SemanticCacheConfig};
use crate::infrastructure::observability::record_cache_lookup;

/// Outcome of a cache lookup
#[derive(Debug, Clone)]
pub enum CacheLookup {
    Hit { entry: CachedEntry, score: f32 },
    /// `best_score` is the nearest entry's score, `None` for an empty cache
    Miss { best_score: Option<f32> },
}

/// Counters exposed on `/v1/cache/stats`
#[derive(Debug, Clone, Serialize)]
pub struct SemanticCacheStats {
    pub backend: &'static str,
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub errors: u64,
    pub writes: u64,
    pub similarity_threshold: f32,
}

impl SemanticCacheStats {
    pub fn hit_rate(&self) -> f32 {
        let total = self.hits + self.misses;

        if total == 0 {
            return 0.0;
        }

        self.hits as f32 / total as f32
    }
}

#[derive(Debug)]
pub struct SemanticQueryCache {
    cache: Arc<dyn SemanticCache>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    embedding_model: String,
    config: SemanticCacheConfig,
    hits: AtomicU64,
    misses: AtomicU64,
    errors: AtomicU64,
    writes: AtomicU64,
}

impl SemanticQueryCache {
    pub fn new(
        cache: Arc<dyn SemanticCache>,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        embedding_model: impl Into<String>,
        config: SemanticCacheConfig,
    ) -> Self {
        Self {
            cache,
            embedding_provider,
            embedding_model: embedding_model.into(),
            config,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            errors: AtomicU64::new(0),
            writes: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &SemanticCacheConfig {
        &self.config
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let request = EmbeddingRequest::single(&self.embedding_model, text);
        let response = self.embedding_provider.embed(request).await?;

        response
            .into_first()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| DomainError::provider(self.embedding_provider.provider_name(), "No embedding returned"))
    }

    /// Find the nearest cached question. A hit requires a score strictly
    /// above the configured threshold. Failures are returned as errors and
    /// are never reported as a miss.
    pub async fn lookup(&self, question: &str) -> Result<CacheLookup, DomainError> {
        let result = async {
            let embedding = self.embed(question).await?;
            self.cache.nearest(&embedding).await
        }
        .await;

        let nearest = match result {
            Ok(nearest) => nearest,
            Err(e) => {
                self.errors.fetch_add(1, Ordering::Relaxed);
                record_cache_lookup("error");
                return Err(e);
            }
        };

        match nearest {
            Some(found) if self.config.is_hit(found.score) => {
                debug!(score = found.score, id = found.entry.id(), "Semantic cache hit");
                self.hits.fetch_add(1, Ordering::Relaxed);
                record_cache_lookup("hit");

                Ok(CacheLookup::Hit {
                    entry: found.entry,
                    score: found.score,
                })
            }
            other => {
                let best_score = other.map(|found| found.score);
                debug!(?best_score, "Semantic cache miss");
                self.misses.fetch_add(1, Ordering::Relaxed);
                record_cache_lookup("miss");

                Ok(CacheLookup::Miss { best_score })
            }
        }
    }

    /// Embed the question and store it with its template and query
    pub async fn add(
        &self,
        question: &str,
        answer_template: &str,
        generator_query: &str,
    ) -> Result<CachedEntry, DomainError> {
        let embedding = self.embed(question).await?;
        let entry = CachedEntry::new(question, embedding, answer_template, generator_query);

        self.cache.store(entry.clone()).await?;
        self.writes.fetch_add(1, Ordering::Relaxed);
        debug!(id = entry.id(), "Stored question in semantic cache");

        Ok(entry)
    }

    pub async fn size(&self) -> Result<usize, DomainError> {
        self.cache.size().await
    }

    pub async fn stats(&self) -> Result<SemanticCacheStats, DomainError> {
        Ok(SemanticCacheStats {
            backend: self.cache.backend_name(),
            entries: self.cache.size().await?,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            similarity_threshold: self.config.similarity_threshold,
        })
    }

    pub async fn persist(&self) -> Result<(), DomainError> {
        self.cache.persist().await
    }
}
