//! Semantic cache configuration

use serde::{Deserialize, Serialize};

/// Storage backend for cached questions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Process-local store, optionally snapshotted to a JSON file
    #[default]
    Memory,
    /// Vector index inside the graph database
    Neo4j,
}

/// Configuration for the question cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticCacheConfig {
    #[serde(default)]
    pub backend: CacheBackend,

    /// A lookup is a hit only when the top score is strictly above this value
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,

    /// Name of the vector index (neo4j backend)
    #[serde(default = "default_index_name")]
    pub index_name: String,

    /// Label of the cache nodes (neo4j backend)
    #[serde(default = "default_node_label")]
    pub node_label: String,

    /// Embedding dimensions used when the vector index has to be created
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,

    /// JSON snapshot file (memory backend)
    #[serde(default)]
    pub snapshot_path: Option<String>,
}

fn default_similarity_threshold() -> f32 {
    0.95
}

fn default_index_name() -> String {
    "vector_index".to_string()
}

fn default_node_label() -> String {
    "QuestionCache".to_string()
}

fn default_dimensions() -> usize {
    768
}

impl Default for SemanticCacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            similarity_threshold: default_similarity_threshold(),
            index_name: default_index_name(),
            node_label: default_node_label(),
            dimensions: default_dimensions(),
            snapshot_path: None,
        }
    }
}

impl SemanticCacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a lookup score counts as a cache hit
    pub fn is_hit(&self, score: f32) -> bool {
        score > self.similarity_threshold
    }

    pub fn with_backend(mut self, backend: CacheBackend) -> Self {
        self.backend = backend;
        self
    }

    /// Set the similarity threshold
    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn with_index_name(mut self, name: impl Into<String>) -> Self {
        self.index_name = name.into();
        self
    }

    pub fn with_node_label(mut self, label: impl Into<String>) -> Self {
        self.node_label = label.into();
        self
    }

    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    pub fn with_snapshot_path(mut self, path: impl Into<String>) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }
}
