use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::PromptSet;
use crate::domain::query::{GenerationRequest, QueryGenerator, strip_code_fences};
use crate::domain::{DomainError, LlmProvider, LlmRequest, Message};

const SYSTEM_PROMPT: &str = "You are a coding assistant. Do not return 'thinking' or similar \
     placeholder texts. Only return the direct response.";

/// Generates Cypher with a chat model
#[derive(Debug)]
pub struct LlmQueryGenerator {
    provider: Arc<dyn LlmProvider>,
    model: String,
    temperature: f32,
    prompts: Arc<PromptSet>,
}

impl LlmQueryGenerator {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>, prompts: Arc<PromptSet>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.0,
            prompts,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

#[async_trait]
impl QueryGenerator for LlmQueryGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String, DomainError> {
        let context = request
            .context
            .or_else(|| self.prompts.context.clone())
            .unwrap_or_default();

        let values = HashMap::from([
            ("question", request.question),
            ("schema", request.schema),
            ("context", context),
        ]);

        let prompt = self
            .prompts
            .nl_to_cypher
            .render(&values)
            .map_err(|e| DomainError::configuration(e.to_string()))?;

        let llm_request = LlmRequest::new(vec![Message::system(SYSTEM_PROMPT), Message::user(prompt)])
            .with_temperature(self.temperature);

        let response = self.provider.chat(&self.model, llm_request).await?;
        let query = strip_code_fences(response.content());

        if query.is_empty() {
            return Err(DomainError::provider(
                self.provider.provider_name(),
                "Model returned an empty query",
            ));
        }

        debug!(model = %self.model, %query, "Generated query");
        Ok(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::MockLlmProvider;

    fn generator(provider: Arc<MockLlmProvider>) -> LlmQueryGenerator {
        LlmQueryGenerator::new(provider, "qwen2.5-coder", Arc::new(PromptSet::default()))
    }

    #[tokio::test]
    async fn test_generate_strips_fences() {
        let provider = Arc::new(MockLlmProvider::replying("```cypher\nMATCH (s:Student) RETURN s.name AS name\n```"));

        let query = generator(provider.clone())
            .generate(GenerationRequest::new("list students", "Student {name: STRING}"))
            .await
            .unwrap();

        assert_eq!(query, "MATCH (s:Student) RETURN s.name AS name");
    }

    #[tokio::test]
    async fn test_prompt_contains_inputs() {
        let provider = Arc::new(MockLlmProvider::replying("MATCH (n) RETURN n"));

        generator(provider.clone())
            .generate(
                GenerationRequest::new("who finished rust?", "Course {title: STRING}")
                    .with_context("Progress is a percentage."),
            )
            .await
            .unwrap();

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);

        let (model, request) = &requests[0];
        assert_eq!(model, "qwen2.5-coder");
        assert_eq!(request.temperature, Some(0.0));

        let prompt = &request.messages[1].content;
        assert!(prompt.contains("who finished rust?"));
        assert!(prompt.contains("Course {title: STRING}"));
        assert!(prompt.contains("Progress is a percentage."));
    }

    #[tokio::test]
    async fn test_empty_output_is_error() {
        let provider = Arc::new(MockLlmProvider::replying("```\n```"));

        let result = generator(provider).generate(GenerationRequest::new("q", "s")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let provider = Arc::new(MockLlmProvider::failing("connection refused"));

        let result = generator(provider).generate(GenerationRequest::new("q", "s")).await;
        assert!(matches!(result, Err(DomainError::Provider { .. })));
    }
}
