//! In-memory semantic cache with an optional JSON snapshot

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::DomainError;
use crate::domain::embedding::normalized_similarity;
use crate::domain::semantic_cache::{CachedEntry, SemanticCache, SemanticSearchResult};

/// In-memory semantic cache using linear search
///
/// Scores are normalized cosine similarity, the same scale the Neo4j vector
/// index reports.
#[derive(Debug, Default)]
pub struct InMemorySemanticCache {
    entries: RwLock<Vec<CachedEntry>>,
    snapshot_path: Option<PathBuf>,
}

impl InMemorySemanticCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load entries from a snapshot file. A missing or unreadable snapshot
    /// starts an empty cache that will be written to `path` on persist.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();

        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<Vec<CachedEntry>>(&content) {
                Ok(entries) => {
                    info!(path = %path.display(), entries = entries.len(), "Loaded cache snapshot");
                    entries
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Cache snapshot unreadable, starting empty");
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No cache snapshot, starting empty");
                Vec::new()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cache snapshot unavailable, starting empty");
                Vec::new()
            }
        };

        Self {
            entries: RwLock::new(entries),
            snapshot_path: Some(path),
        }
    }

    fn snapshot(&self) -> Result<Vec<CachedEntry>, DomainError> {
        self.entries
            .read()
            .map(|entries| entries.clone())
            .map_err(|e| DomainError::internal(format!("Failed to acquire read lock: {}", e)))
    }
}

#[async_trait]
impl SemanticCache for InMemorySemanticCache {
    async fn nearest(&self, embedding: &[f32]) -> Result<Option<SemanticSearchResult>, DomainError> {
        let entries = self.entries.read().map_err(|e| {
            DomainError::internal(format!("Failed to acquire read lock: {}", e))
        })?;

        let best = entries
            .iter()
            .map(|entry| (entry, normalized_similarity(embedding, entry.embedding())))
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        Ok(best.map(|(entry, score)| SemanticSearchResult::new(entry.clone(), score)))
    }

    async fn store(&self, entry: CachedEntry) -> Result<(), DomainError> {
        let mut entries = self.entries.write().map_err(|e| {
            DomainError::internal(format!("Failed to acquire write lock: {}", e))
        })?;

        debug!(id = entry.id(), "Storing cache entry");
        entries.push(entry);
        Ok(())
    }

    async fn size(&self) -> Result<usize, DomainError> {
        let entries = self.entries.read().map_err(|e| {
            DomainError::internal(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(entries.len())
    }

    async fn persist(&self) -> Result<(), DomainError> {
        let Some(ref path) = self.snapshot_path else {
            return Ok(());
        };

        let entries = self.snapshot()?;
        let json = serde_json::to_vec_pretty(&entries)
            .map_err(|e| DomainError::internal(format!("Failed to serialize cache: {}", e)))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DomainError::cache(format!("Failed to create {}: {}", parent.display(), e)))?;
        }

        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to write {}: {}", tmp.display(), e)))?;
        tokio::fs::rename(&tmp, path)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to replace {}: {}", path.display(), e)))?;

        info!(path = %path.display(), entries = entries.len(), "Cache snapshot saved");
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
