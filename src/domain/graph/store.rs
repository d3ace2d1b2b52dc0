use async_trait::async_trait;
use std::fmt::Debug;

use super::Row;
use crate::domain::DomainError;

/// Trait for graph databases that run Cypher queries
#[async_trait]
pub trait GraphStore: Send + Sync + Debug {
    /// Human-readable description of labels, properties and relationships
    async fn schema(&self) -> Result<String, DomainError>;

    /// Plan the query without running it
    async fn explain(&self, query: &str) -> Result<(), DomainError>;

    /// Dry-run check; any planner or transport error counts as invalid
    async fn validate(&self, query: &str) -> bool {
        match self.explain(query).await {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(error = %e, "Query failed dry-run validation");
                false
            }
        }
    }

    /// Run the query and return its rows in result order
    async fn execute(&self, query: &str) -> Result<Vec<Row>, DomainError>;

    /// Check connectivity
    async fn ping(&self) -> Result<(), DomainError>;

    /// Release the session
    async fn close(&self) -> Result<(), DomainError> {
        Ok(())
    }

    fn store_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Graph store returning canned rows and recording the queries it sees
    #[derive(Debug, Default)]
    pub struct MockGraphStore {
        schema: String,
        rows: Vec<Row>,
        invalid: bool,
        execute_error: Option<String>,
        executed: Mutex<Vec<String>>,
        explains: AtomicUsize,
    }

    impl MockGraphStore {
        pub fn new() -> Self {
            Self {
                schema: "Node properties:\nStudent {name: STRING}".to_string(),
                ..Default::default()
            }
        }

        pub fn with_rows(mut self, rows: Vec<Row>) -> Self {
            self.rows = rows;
            self
        }

        /// Make every dry-run fail
        pub fn rejecting_queries(mut self) -> Self {
            self.invalid = true;
            self
        }

        pub fn with_execute_error(mut self, error: impl Into<String>) -> Self {
            self.execute_error = Some(error.into());
            self
        }

        pub fn executed(&self) -> Vec<String> {
            self.executed.lock().unwrap().clone()
        }

        pub fn explain_calls(&self) -> usize {
            self.explains.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GraphStore for MockGraphStore {
        async fn schema(&self) -> Result<String, DomainError> {
            Ok(self.schema.clone())
        }

        async fn explain(&self, _query: &str) -> Result<(), DomainError> {
            self.explains.fetch_add(1, Ordering::SeqCst);

            if self.invalid {
                return Err(DomainError::graph(
                    "Neo.ClientError.Statement.SyntaxError",
                    "Invalid input",
                ));
            }
            Ok(())
        }

        async fn execute(&self, query: &str) -> Result<Vec<Row>, DomainError> {
            self.executed.lock().unwrap().push(query.to_string());

            if let Some(ref error) = self.execute_error {
                return Err(DomainError::graph("Neo.DatabaseError.General", error));
            }
            Ok(self.rows.clone())
        }

        async fn ping(&self) -> Result<(), DomainError> {
            Ok(())
        }

        fn store_name(&self) -> &'static str {
            "mock"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockGraphStore;
    use super::*;

    #[tokio::test]
    async fn test_validate_maps_errors_to_false() {
        let store = MockGraphStore::new().rejecting_queries();
        assert!(!store.validate("MATC (n) RETURN n").await);

        let store = MockGraphStore::new();
        assert!(store.validate("MATCH (n) RETURN n").await);
        assert_eq!(store.explain_calls(), 1);
    }
}
