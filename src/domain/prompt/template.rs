//! Prompt template parsing and rendering
//!
//! Variable syntax:
//! - `${var:name}` - required, rendering fails if no value is supplied
//! - `${var:name:default}` - optional, falls back to `default`

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use thiserror::Error;

static VARIABLE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{var:([a-zA-Z][a-zA-Z0-9_-]*)(?::([^}]*))?\}").unwrap()
});

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TemplateError {
    #[error("Missing required variable: {name}")]
    MissingVariable { name: String },

    #[error("Template '{name}' could not be loaded: {message}")]
    Load { name: String, message: String },
}

/// A variable referenced by a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptVariable {
    pub name: String,
    pub default: Option<String>,
}

impl PromptVariable {
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// A parsed prompt template
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    content: String,
    variables: Vec<PromptVariable>,
}

impl PromptTemplate {
    /// Parse template text, collecting each distinct variable once in order
    /// of first appearance
    pub fn parse(content: impl Into<String>) -> Self {
        let content = content.into();
        let mut seen = HashSet::new();

        let variables = VARIABLE_PATTERN
            .captures_iter(&content)
            .filter(|cap| seen.insert(cap[1].to_string()))
            .map(|cap| PromptVariable {
                name: cap[1].to_string(),
                default: cap.get(2).map(|m| m.as_str().to_string()),
            })
            .collect();

        Self { content, variables }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn variables(&self) -> &[PromptVariable] {
        &self.variables
    }

    /// Substitute every variable occurrence. Values are inserted verbatim and
    /// never re-scanned for variables.
    pub fn render(&self, values: &HashMap<&str, String>) -> Result<String, TemplateError> {
        if let Some(missing) = self
            .variables
            .iter()
            .find(|v| v.is_required() && !values.contains_key(v.name.as_str()))
        {
            return Err(TemplateError::MissingVariable {
                name: missing.name.clone(),
            });
        }

        let rendered = VARIABLE_PATTERN.replace_all(&self.content, |cap: &Captures| {
            let name = &cap[1];
            match values.get(name) {
                Some(value) => value.clone(),
                None => cap.get(2).map(|m| m.as_str()).unwrap_or_default().to_string(),
            }
        });

        Ok(rendered.into_owned())
    }
}
