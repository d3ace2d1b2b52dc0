//! Prompt set used by the generator and synthesizer

use std::path::Path;

use tracing::info;

use crate::domain::prompt::{PromptTemplate, TemplateError};

const DEFAULT_NL_TO_CYPHER: &str = include_str!("../../../prompts/nl_to_cypher.md");
const DEFAULT_RESPONSE_TEMPLATE: &str = include_str!("../../../prompts/response_template.md");

const NL_TO_CYPHER_FILE: &str = "nl_to_cypher.md";
const RESPONSE_TEMPLATE_FILE: &str = "response_template.md";
const CONTEXT_FILE: &str = "context.md";

/// Prompts for both model stages plus optional domain context
#[derive(Debug, Clone)]
pub struct PromptSet {
    pub nl_to_cypher: PromptTemplate,
    pub response_template: PromptTemplate,
    pub context: Option<String>,
}

impl Default for PromptSet {
    fn default() -> Self {
        Self {
            nl_to_cypher: PromptTemplate::parse(DEFAULT_NL_TO_CYPHER),
            response_template: PromptTemplate::parse(DEFAULT_RESPONSE_TEMPLATE),
            context: None,
        }
    }
}

impl PromptSet {
    /// Built-in prompts, with any files present in `dir` taking precedence
    pub fn load(dir: Option<&Path>) -> Result<Self, TemplateError> {
        let mut prompts = Self::default();
        let Some(dir) = dir else {
            return Ok(prompts);
        };

        if let Some(content) = read_optional(dir, NL_TO_CYPHER_FILE)? {
            prompts.nl_to_cypher = PromptTemplate::parse(content);
        }
        if let Some(content) = read_optional(dir, RESPONSE_TEMPLATE_FILE)? {
            prompts.response_template = PromptTemplate::parse(content);
        }
        prompts.context = read_optional(dir, CONTEXT_FILE)?
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        Ok(prompts)
    }
}

fn read_optional(dir: &Path, name: &str) -> Result<Option<String>, TemplateError> {
    let path = dir.join(name);

    match std::fs::read_to_string(&path) {
        Ok(content) => {
            info!(path = %path.display(), "Loaded prompt override");
            Ok(Some(content))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(TemplateError::Load {
            name: name.to_string(),
            message: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_reference_expected_variables() {
        let prompts = PromptSet::default();

        let names = |t: &PromptTemplate| {
            t.variables()
                .iter()
                .map(|v| v.name.clone())
                .collect::<Vec<_>>()
        };

        assert_eq!(names(&prompts.nl_to_cypher), vec!["context", "schema", "question"]);
        assert_eq!(names(&prompts.response_template), vec!["question", "structured_response"]);
        assert!(prompts.context.is_none());
    }

    #[test]
    fn test_overrides_from_directory() {
        let dir = std::env::temp_dir().join(format!("graph-qa-prompts-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(NL_TO_CYPHER_FILE), "Q=${var:question} S=${var:schema}").unwrap();
        std::fs::write(dir.join(CONTEXT_FILE), "  Students enroll in courses.\n").unwrap();

        let prompts = PromptSet::load(Some(&dir)).unwrap();

        assert_eq!(prompts.nl_to_cypher.content(), "Q=${var:question} S=${var:schema}");
        assert_eq!(prompts.context.as_deref(), Some("Students enroll in courses."));
        assert_eq!(
            prompts.response_template.content(),
            PromptSet::default().response_template.content()
        );

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_directory_uses_defaults() {
        let dir = std::env::temp_dir().join("graph-qa-prompts-does-not-exist");
        let prompts = PromptSet::load(Some(&dir)).unwrap();

        assert!(prompts.context.is_none());
    }
}
