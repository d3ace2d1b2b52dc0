use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Debug;

use crate::domain::DomainError;

/// Opening fence with an optional language tag, e.g. "```cypher"
static OPENING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*```[a-z]*[ \t]*\r?\n?").unwrap());

static CLOSING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r?\n?```\s*$").unwrap());

/// Inputs for turning a question into a graph query
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub question: String,
    pub schema: String,
    pub context: Option<String>,
}

impl GenerationRequest {
    pub fn new(question: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            schema: schema.into(),
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// Produces one Cypher query for a question
#[async_trait]
pub trait QueryGenerator: Send + Sync + Debug {
    /// Returns query text with code fences and language tags removed
    async fn generate(&self, request: GenerationRequest) -> Result<String, DomainError>;
}

/// Remove markdown code fences and a leading `cypher` tag from model output
pub fn strip_code_fences(text: &str) -> String {
    let without_open = OPENING_FENCE.replace(text, "");
    let without_close = CLOSING_FENCE.replace(&without_open, "");
    let trimmed = without_close.trim();

    let untagged = match trimmed.get(..6) {
        Some(prefix) if prefix.eq_ignore_ascii_case("cypher") => {
            let rest = &trimmed[6..];
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                rest
            } else {
                trimmed
            }
        }
        _ => trimmed,
    };

    untagged.replace("```", "").trim().to_string()
}

#[cfg(test)]
pub mod mock {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Returns a fixed query and counts invocations
    #[derive(Debug)]
    pub struct MockQueryGenerator {
        query: Option<String>,
        calls: AtomicUsize,
    }

    impl MockQueryGenerator {
        pub fn returning(query: impl Into<String>) -> Self {
            Self {
                query: Some(query.into()),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn failing() -> Self {
            Self {
                query: None,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl QueryGenerator for MockQueryGenerator {
        async fn generate(&self, _request: GenerationRequest) -> Result<String, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            self.query
                .clone()
                .ok_or_else(|| DomainError::provider("mock", "generator unavailable"))
        }
    }
}
