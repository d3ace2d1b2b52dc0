use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::DomainError;
use crate::domain::graph::Row;

/// Turns one result row into an answer template with `{field}` placeholders
#[async_trait]
pub trait ResponseSynthesizer: Send + Sync + Debug {
    async fn synthesize(&self, question: &str, sample: &Row) -> Result<String, DomainError>;
}
