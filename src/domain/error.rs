use thiserror::Error;

/// Errors raised by adapters and external collaborators
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    #[error("Graph store error: {code} - {message}")]
    Graph { code: String, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Cache error: {message}")]
    Cache { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn graph(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Graph {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_error_display() {
        let error = DomainError::graph("Neo.ClientError.Statement.SyntaxError", "Invalid input 'MATC'");
        assert_eq!(
            error.to_string(),
            "Graph store error: Neo.ClientError.Statement.SyntaxError - Invalid input 'MATC'"
        );
    }

    #[test]
    fn test_provider_error_display() {
        let error = DomainError::provider("openai", "HTTP 500");
        assert_eq!(error.to_string(), "Provider error: openai - HTTP 500");
    }

    #[test]
    fn test_cache_error_display() {
        let error = DomainError::cache("index offline");
        assert_eq!(error.to_string(), "Cache error: index offline");
    }
}
