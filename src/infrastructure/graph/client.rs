//! Minimal client for the Neo4j HTTP transaction API

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::{DomainError, Row};
use crate::infrastructure::http_client::HttpClientTrait;

/// Columns and raw cell values of one statement
#[derive(Debug, Clone, Default)]
pub struct StatementResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl StatementResult {
    pub fn into_rows(self) -> Vec<Row> {
        let columns = self.columns;
        self.rows
            .into_iter()
            .map(|values| Row::from_columns(&columns, values))
            .collect()
    }

    /// Value of `column` in the first row
    pub fn first_value(&self, column: &str) -> Option<&Value> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.rows.first().and_then(|row| row.get(index))
    }
}

/// Runs Cypher statements through `POST {url}/db/{database}/tx/commit`
#[derive(Debug)]
pub struct Neo4jClient<C: HttpClientTrait> {
    client: C,
    commit_url: String,
    auth_header: String,
}

impl<C: HttpClientTrait> Neo4jClient<C> {
    pub fn new(
        client: C,
        url: &str,
        database: &str,
        username: &str,
        password: &str,
    ) -> Self {
        let credentials = STANDARD.encode(format!("{}:{}", username, password));

        Self {
            client,
            commit_url: format!("{}/db/{}/tx/commit", url.trim_end_matches('/'), database),
            auth_header: format!("Basic {}", credentials),
        }
    }

    pub fn commit_url(&self) -> &str {
        &self.commit_url
    }

    #[cfg(test)]
    pub fn http(&self) -> &C {
        &self.client
    }

    /// Run one statement in an auto-commit transaction
    pub async fn run(&self, statement: &str, parameters: Value) -> Result<StatementResult, DomainError> {
        let parameters = match parameters {
            Value::Null => Value::Object(Default::default()),
            other => other,
        };

        let body = serde_json::json!({
            "statements": [{
                "statement": statement,
                "parameters": parameters,
                "resultDataContents": ["row"],
            }]
        });

        let headers = vec![
            ("Authorization", self.auth_header.as_str()),
            ("Accept", "application/json;charset=UTF-8"),
        ];

        let response = self.client.post_json(&self.commit_url, headers, &body).await?;

        let response: CommitResponse = serde_json::from_value(response).map_err(|e| {
            DomainError::graph("Response", format!("Failed to parse Neo4j response: {}", e))
        })?;

        if let Some(error) = response.errors.into_iter().next() {
            return Err(DomainError::graph(error.code, error.message));
        }

        let result = response.results.into_iter().next().unwrap_or_default();

        Ok(StatementResult {
            columns: result.columns,
            rows: result.data.into_iter().map(|d| d.row).collect(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct CommitResponse {
    #[serde(default)]
    results: Vec<CommitResult>,
    #[serde(default)]
    errors: Vec<CommitError>,
}

#[derive(Debug, Default, Deserialize)]
struct CommitResult {
    #[serde(default)]
    columns: Vec<String>,
    #[serde(default)]
    data: Vec<CommitRow>,
}

#[derive(Debug, Deserialize)]
struct CommitRow {
    row: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct CommitError {
    code: String,
    message: String,
}
