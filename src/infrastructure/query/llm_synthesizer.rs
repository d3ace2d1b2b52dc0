use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use super::PromptSet;
use crate::domain::query::ResponseSynthesizer;
use crate::domain::{DomainError, LlmProvider, LlmRequest, Message, Row};

/// Writes answer templates with a chat model
#[derive(Debug)]
pub struct LlmResponseSynthesizer {
    provider: Arc<dyn LlmProvider>,
    model: String,
    temperature: f32,
    prompts: Arc<PromptSet>,
}

impl LlmResponseSynthesizer {
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
impl ResponseSynthesizer for LlmResponseSynthesizer {
    async fn synthesize(&self, question: &str, sample: &Row) -> Result<String, DomainError> {
        let values = HashMap::from([
            ("question", question.to_string()),
            ("structured_response", sample.to_json().to_string()),
        ]);

        let prompt = self
            .prompts
            .response_template
            .render(&values)
            .map_err(|e| DomainError::configuration(e.to_string()))?;

        let request = LlmRequest::new(vec![Message::user(prompt)]).with_temperature(self.temperature);
        let response = self.provider.chat(&self.model, request).await?;
        let template = response.content().trim();

        if template.is_empty() {
            return Err(DomainError::provider(
                self.provider.provider_name(),
                "Model returned an empty template",
            ));
        }

        Ok(template.to_string())
    }
}
