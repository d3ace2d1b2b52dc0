//! Semantic cache stored as vector-indexed nodes in Neo4j

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::domain::DomainError;
use crate::domain::semantic_cache::{
    CachedEntry, SemanticCache, SemanticCacheConfig, SemanticSearchResult,
};
use crate::infrastructure::graph::Neo4jClient;
use crate::infrastructure::http_client::HttpClientTrait;

/// Index names and labels are interpolated into Cypher, so only plain
/// identifiers are accepted
static IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Cached questions as `(:QuestionCache)` nodes searched through a cosine
/// vector index
#[derive(Debug)]
pub struct Neo4jSemanticCache<C: HttpClientTrait> {
    client: Arc<Neo4jClient<C>>,
    index_name: String,
    node_label: String,
}

impl<C: HttpClientTrait> Neo4jSemanticCache<C> {
    /// Use the configured vector index, creating it when it does not exist
    pub async fn open(
        client: Arc<Neo4jClient<C>>,
        config: &SemanticCacheConfig,
    ) -> Result<Self, DomainError> {
        for name in [&config.index_name, &config.node_label] {
            if !IDENTIFIER.is_match(name) {
                return Err(DomainError::configuration(format!(
                    "Invalid index or label name: {}",
                    name
                )));
            }
        }

        let cache = Self {
            client,
            index_name: config.index_name.clone(),
            node_label: config.node_label.clone(),
        };

        let existing = cache
            .client
            .run(
                "SHOW INDEXES YIELD name, type WHERE name = $name RETURN type",
                json!({ "name": cache.index_name }),
            )
            .await?;

        if existing.rows.is_empty() {
            info!(index = %cache.index_name, "Vector index not found, creating it");
            let statement = format!(
                "CREATE VECTOR INDEX {index} IF NOT EXISTS \
                 FOR (n:{label}) ON (n.embedding) \
                 OPTIONS {{indexConfig: {{`vector.dimensions`: {dims}, `vector.similarity_function`: 'cosine'}}}}",
                index = cache.index_name,
                label = cache.node_label,
                dims = config.dimensions,
            );
            cache.client.run(&statement, Value::Null).await?;
        } else {
            info!(index = %cache.index_name, "Using existing vector index");
        }

        Ok(cache)
    }
}

#[async_trait]
impl<C: HttpClientTrait> SemanticCache for Neo4jSemanticCache<C> {
    async fn nearest(&self, embedding: &[f32]) -> Result<Option<SemanticSearchResult>, DomainError> {
        let result = self
            .client
            .run(
                "CALL db.index.vector.queryNodes($index, 1, $embedding) YIELD node, score \
                 RETURN node.id AS id, node.text AS text, node.embedding AS embedding, \
                 node.answerTemplate AS answerTemplate, node.generatorQuery AS generatorQuery, \
                 node.createdAt AS createdAt, score",
                json!({ "index": self.index_name, "embedding": embedding }),
            )
            .await?;

        let value = |column: &str| result.first_value(column).cloned().unwrap_or(Value::Null);
        if result.rows.is_empty() {
            return Ok(None);
        }

        let vector: Vec<f32> = serde_json::from_value(value("embedding")).unwrap_or_default();
        let text = |column: &str| value(column).as_str().unwrap_or_default().to_string();
        let created_at = value("createdAt")
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(Utc::now);

        let entry = CachedEntry::new(
            text("text"),
            vector,
            text("answerTemplate"),
            text("generatorQuery"),
        )
        .with_id(text("id"))
        .with_created_at(created_at);

        let score = value("score").as_f64().unwrap_or_default() as f32;
        debug!(score, id = entry.id(), "Vector index lookup");

        Ok(Some(SemanticSearchResult::new(entry, score)))
    }

    async fn store(&self, entry: CachedEntry) -> Result<(), DomainError> {
        let statement = format!(
            "CREATE (n:{label} {{id: $id, text: $text, embedding: $embedding, \
             answerTemplate: $answerTemplate, generatorQuery: $generatorQuery, createdAt: $createdAt}})",
            label = self.node_label,
        );

        self.client
            .run(
                &statement,
                json!({
                    "id": entry.id(),
                    "text": entry.question_text(),
                    "embedding": entry.embedding(),
                    "answerTemplate": entry.answer_template(),
                    "generatorQuery": entry.generator_query(),
                    "createdAt": entry.created_at().to_rfc3339(),
                }),
            )
            .await
            .map(|_| ())
    }

    async fn size(&self) -> Result<usize, DomainError> {
        let result = self
            .client
            .run(
                &format!("MATCH (n:{}) RETURN count(n) AS size", self.node_label),
                Value::Null,
            )
            .await?;

        Ok(result
            .first_value("size")
            .and_then(Value::as_u64)
            .unwrap_or_default() as usize)
    }

    fn backend_name(&self) -> &'static str {
        "neo4j"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http_client::mock::MockHttpClient;

    const COMMIT_URL: &str = "http://neo4j:7474/db/neo4j/tx/commit";

    fn client(mock: MockHttpClient) -> Arc<Neo4jClient<MockHttpClient>> {
        Arc::new(Neo4jClient::new(mock, "http://neo4j:7474", "neo4j", "neo4j", "pw"))
    }

    fn empty() -> Value {
        json!({"results": [{"columns": [], "data": []}], "errors": []})
    }

    fn statements(client: &Neo4jClient<MockHttpClient>) -> Vec<String> {
        client
            .http()
            .bodies()
            .into_iter()
            .map(|(_, body)| body["statements"][0]["statement"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_open_creates_missing_index() {
        let client = client(MockHttpClient::new().with_response(COMMIT_URL, empty()));

        Neo4jSemanticCache::open(client.clone(), &SemanticCacheConfig::default())
            .await
            .unwrap();

        let statements = statements(&client);
        assert_eq!(statements.len(), 2);
        assert!(statements[0].starts_with("SHOW INDEXES"));
        assert!(statements[1].starts_with("CREATE VECTOR INDEX vector_index IF NOT EXISTS"));
        assert!(statements[1].contains("`vector.dimensions`: 768"));
    }

    #[tokio::test]
    async fn test_open_reuses_existing_index() {
        let client = client(MockHttpClient::new().with_response(
            COMMIT_URL,
            json!({"results": [{"columns": ["type"], "data": [{"row": ["VECTOR"]}]}], "errors": []}),
        ));

        Neo4jSemanticCache::open(client.clone(), &SemanticCacheConfig::default())
            .await
            .unwrap();

        assert_eq!(statements(&client).len(), 1);
    }

    #[tokio::test]
    async fn test_open_rejects_unsafe_label() {
        let client = client(MockHttpClient::new());
        let config = SemanticCacheConfig::default().with_node_label("Cache) DETACH DELETE (n");

        let result = Neo4jSemanticCache::open(client, &config).await;
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[tokio::test]
    async fn test_nearest_maps_node() {
        let client = client(
            MockHttpClient::new()
                .with_response(COMMIT_URL, json!({"results": [{"columns": ["type"], "data": [{"row": ["VECTOR"]}]}], "errors": []}))
                .with_response(
                    COMMIT_URL,
                    json!({
                        "results": [{
                            "columns": ["id", "text", "embedding", "answerTemplate", "generatorQuery", "createdAt", "score"],
                            "data": [{"row": [
                                "e-1", "who studies rust?", [0.1, 0.2], "{name} studies Rust.",
                                "MATCH (s:Student) RETURN s.name AS name", "2025-01-01T00:00:00+00:00", 0.97
                            ]}]
                        }],
                        "errors": []
                    }),
                ),
        );
        let cache = Neo4jSemanticCache::open(client, &SemanticCacheConfig::default())
            .await
            .unwrap();

        let result = cache.nearest(&[0.1, 0.2]).await.unwrap().unwrap();

        assert_eq!(result.entry.id(), "e-1");
        assert_eq!(result.entry.answer_template(), "{name} studies Rust.");
        assert_eq!(result.entry.generator_query(), "MATCH (s:Student) RETURN s.name AS name");
        assert!((result.score - 0.97).abs() < 0.0001);
    }

    #[tokio::test]
    async fn test_store_and_size() {
        let client = client(
            MockHttpClient::new()
                .with_response(COMMIT_URL, json!({"results": [{"columns": ["type"], "data": [{"row": ["VECTOR"]}]}], "errors": []}))
                .with_response(COMMIT_URL, empty())
                .with_response(COMMIT_URL, json!({"results": [{"columns": ["size"], "data": [{"row": [3]}]}], "errors": []})),
        );
        let cache = Neo4jSemanticCache::open(client.clone(), &SemanticCacheConfig::default())
            .await
            .unwrap();

        cache
            .store(CachedEntry::new("q", vec![1.0], "t", "MATCH (n) RETURN n"))
            .await
            .unwrap();
        assert_eq!(cache.size().await.unwrap(), 3);

        let bodies = client.http().bodies();
        let params = &bodies[1].1["statements"][0]["parameters"];
        assert_eq!(params["text"], "q");
        assert_eq!(params["generatorQuery"], "MATCH (n) RETURN n");
        assert!(statements(&client)[1].starts_with("CREATE (n:QuestionCache"));
    }
}
