//! Semantic cache trait and types

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// What a cached question resolves to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedAnswer {
    pub answer_template: String,
    pub generator_query: String,
}

/// A previously answered question
///
/// Serializes as `{ id, text, embedding, metadata: { answerTemplate,
/// generatorQuery }, createdAt }`, the shape both backends persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedEntry {
    id: String,
    text: String,
    embedding: Vec<f32>,
    metadata: CachedAnswer,
    created_at: DateTime<Utc>,
}

impl CachedEntry {
    /// Create an entry with a fresh id, stamped now
    pub fn new(
        question: impl Into<String>,
        embedding: Vec<f32>,
        answer_template: impl Into<String>,
        generator_query: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: question.into(),
            embedding,
            metadata: CachedAnswer {
                answer_template: answer_template.into(),
                generator_query: generator_query.into(),
            },
            created_at: Utc::now(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn question_text(&self) -> &str {
        &self.text
    }

    pub fn embedding(&self) -> &[f32] {
        &self.embedding
    }

    pub fn answer_template(&self) -> &str {
        &self.metadata.answer_template
    }

    pub fn generator_query(&self) -> &str {
        &self.metadata.generator_query
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Nearest cached question and its similarity score in [0, 1]
#[derive(Debug, Clone)]
pub struct SemanticSearchResult {
    pub entry: CachedEntry,
    pub score: f32,
}

impl SemanticSearchResult {
    pub fn new(entry: CachedEntry, score: f32) -> Self {
        Self { entry, score }
    }
}

/// Storage for cached questions, searchable by embedding
#[async_trait]
pub trait SemanticCache: Send + Sync + Debug {
    /// Return the single most similar entry, or `None` when the store is empty
    async fn nearest(&self, embedding: &[f32]) -> Result<Option<SemanticSearchResult>, DomainError>;

    /// Store a new entry. Entries are never updated or expired.
    async fn store(&self, entry: CachedEntry) -> Result<(), DomainError>;

    /// Number of stored entries
    async fn size(&self) -> Result<usize, DomainError>;

    /// Flush to durable storage, if the backend needs it
    async fn persist(&self) -> Result<(), DomainError> {
        Ok(())
    }

    /// Name used in logs and stats
    fn backend_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;

    /// Backend that fails every operation
    #[derive(Debug, Default)]
    pub struct FailingSemanticCache;

    #[async_trait]
    impl SemanticCache for FailingSemanticCache {
        async fn nearest(&self, _embedding: &[f32]) -> Result<Option<SemanticSearchResult>, DomainError> {
            Err(DomainError::cache("backend offline"))
        }

        async fn store(&self, _entry: CachedEntry) -> Result<(), DomainError> {
            Err(DomainError::cache("backend offline"))
        }

        async fn size(&self) -> Result<usize, DomainError> {
            Err(DomainError::cache("backend offline"))
        }

        fn backend_name(&self) -> &'static str {
            "failing"
        }
    }
}
