use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::{Neo4jClient, StatementResult};
use crate::domain::{DomainError, GraphStore, Row};
use crate::infrastructure::http_client::HttpClientTrait;

const NODE_PROPERTIES_QUERY: &str = "CALL db.schema.nodeTypeProperties() \
     YIELD nodeLabels, propertyName, propertyTypes \
     RETURN nodeLabels, propertyName, propertyTypes";

const REL_PROPERTIES_QUERY: &str = "CALL db.schema.relTypeProperties() \
     YIELD relType, propertyName, propertyTypes \
     RETURN relType, propertyName, propertyTypes";

const RELATIONSHIPS_QUERY: &str = "MATCH (a)-[r]->(b) \
     WITH DISTINCT labels(a) AS start, type(r) AS type, labels(b) AS end \
     RETURN start, type, end LIMIT 200";

/// Graph store backed by Neo4j's HTTP API
#[derive(Debug)]
pub struct Neo4jGraphStore<C: HttpClientTrait> {
    client: Arc<Neo4jClient<C>>,
}

impl<C: HttpClientTrait> Neo4jGraphStore<C> {
    pub fn new(client: Arc<Neo4jClient<C>>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C: HttpClientTrait> GraphStore for Neo4jGraphStore<C> {
    async fn schema(&self) -> Result<String, DomainError> {
        let nodes = self.client.run(NODE_PROPERTIES_QUERY, Value::Null).await?;
        let rels = self.client.run(REL_PROPERTIES_QUERY, Value::Null).await?;
        let patterns = self.client.run(RELATIONSHIPS_QUERY, Value::Null).await?;

        Ok(format_schema(&nodes, &rels, &patterns))
    }

    async fn explain(&self, query: &str) -> Result<(), DomainError> {
        self.client
            .run(&format!("EXPLAIN {}", query), Value::Null)
            .await
            .map(|_| ())
    }

    async fn execute(&self, query: &str) -> Result<Vec<Row>, DomainError> {
        let result = self.client.run(query, Value::Null).await?;
        debug!(rows = result.rows.len(), "Graph query executed");
        Ok(result.into_rows())
    }

    async fn ping(&self) -> Result<(), DomainError> {
        self.client.run("RETURN 1", Value::Null).await.map(|_| ())
    }

    async fn close(&self) -> Result<(), DomainError> {
        // Auto-commit HTTP requests hold no server-side session
        debug!(url = self.client.commit_url(), "Neo4j graph store closed");
        Ok(())
    }

    fn store_name(&self) -> &'static str {
        "neo4j"
    }
}

/// Render schema introspection results as the text handed to the query
/// generator
pub fn format_schema(
    nodes: &StatementResult,
    rels: &StatementResult,
    patterns: &StatementResult,
) -> String {
    let node_props = collect_properties(nodes, "nodeLabels", |v| {
        string_list(v).join(":")
    });
    let rel_props = collect_properties(rels, "relType", |v| {
        v.as_str()
            .unwrap_or_default()
            .trim_start_matches(':')
            .trim_matches('`')
            .to_string()
    });

    let mut out = String::from("Node properties:\n");
    for (label, props) in &node_props {
        out.push_str(&format!("{} {{{}}}\n", label, props.join(", ")));
    }

    out.push_str("Relationship properties:\n");
    for (rel, props) in rel_props.iter().filter(|(_, props)| !props.is_empty()) {
        out.push_str(&format!("{} {{{}}}\n", rel, props.join(", ")));
    }

    out.push_str("The relationships:\n");
    let index = |name: &str| patterns.columns.iter().position(|c| c == name);
    if let (Some(start), Some(rel), Some(end)) = (index("start"), index("type"), index("end")) {
        for row in &patterns.rows {
            let label = |i: usize| row.get(i).map(string_list).unwrap_or_default().join(":");
            let rel_type = row.get(rel).and_then(Value::as_str).unwrap_or_default();
            out.push_str(&format!(
                "(:{})-[:{}]->(:{})\n",
                label(start),
                rel_type,
                label(end)
            ));
        }
    }

    out.trim_end().to_string()
}

/// Group `propertyName: TYPE` pairs by the value of `key_column`, sorted by key
fn collect_properties(
    result: &StatementResult,
    key_column: &str,
    key_of: impl Fn(&Value) -> String,
) -> BTreeMap<String, Vec<String>> {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let index = |name: &str| result.columns.iter().position(|c| c == name);

    let (Some(key_idx), Some(name_idx), Some(types_idx)) =
        (index(key_column), index("propertyName"), index("propertyTypes"))
    else {
        return grouped;
    };

    for row in &result.rows {
        let Some(key) = row.get(key_idx).map(&key_of).filter(|k| !k.is_empty()) else {
            continue;
        };
        let props = grouped.entry(key).or_default();

        if let Some(name) = row.get(name_idx).and_then(Value::as_str) {
            let types = row
                .get(types_idx)
                .map(string_list)
                .unwrap_or_default()
                .join("|")
                .to_uppercase();
            props.push(format!("{}: {}", name, types));
        }
    }

    grouped
}

fn string_list(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
