use serde::Deserialize;

use crate::domain::pipeline::PipelineConfig;
use crate::domain::semantic_cache::SemanticCacheConfig;

/// Environment variables read for compatibility with plain `.env` setups,
/// mapped to their configuration keys
const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("NEO4J_URI", "neo4j.url"),
    ("NEO4J_USER", "neo4j.username"),
    ("NEO4J_PASSWORD", "neo4j.password"),
    ("OPENAI_BASE_URL", "models.base_url"),
    ("OPENAI_API_KEY", "models.api_key"),
    ("CODER_MODEL", "models.coder_model"),
    ("NLP_MODEL", "models.nlp_model"),
    ("EMBEDDING_MODEL", "models.embedding_model"),
];

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub neo4j: Neo4jConfig,
    pub models: ModelsConfig,
    pub semantic_cache: SemanticCacheConfig,
    pub pipeline: PipelineConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Neo4j HTTP endpoint and credentials
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Neo4jConfig {
    pub url: String,
    pub database: String,
    pub username: String,
    pub password: String,
}

/// OpenAI-compatible model endpoint. The coder model writes Cypher, the NLP
/// model writes answer templates.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    pub base_url: String,
    pub api_key: String,
    pub embedding_model: String,
    pub coder_model: String,
    pub nlp_model: String,
    pub temperature: f32,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for Neo4jConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:7474".to_string(),
            database: "neo4j".to_string(),
            username: "neo4j".to_string(),
            password: String::new(),
        }
    }
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            api_key: String::new(),
            embedding_model: "nomic-embed-text".to_string(),
            coder_model: "qwen2.5-coder".to_string(),
            nlp_model: "llama3.1".to_string(),
            temperature: 0.0,
            request_timeout_secs: 120,
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl AppConfig {
    /// Layered load: `config/default`, `config/local`, `APP__*` variables,
    /// then the plain variables in [`LEGACY_ENV_KEYS`]
    pub fn load() -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            );

        for (var, key) in LEGACY_ENV_KEYS {
            builder = builder.set_override_option(*key, std::env::var(var).ok())?;
        }

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), config::ConfigError> {
        let threshold = self.semantic_cache.similarity_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(config::ConfigError::Message(format!(
                "semantic_cache.similarity_threshold must be within [0, 1], got {}",
                threshold
            )));
        }

        for (key, value) in [
            ("neo4j.url", &self.neo4j.url),
            ("models.base_url", &self.models.base_url),
            ("models.embedding_model", &self.models.embedding_model),
            ("models.coder_model", &self.models.coder_model),
            ("models.nlp_model", &self.models.nlp_model),
        ] {
            if value.trim().is_empty() {
                return Err(config::ConfigError::Message(format!("{} must not be empty", key)));
            }
        }

        if self.pipeline.stage_timeout_ms == 0 {
            return Err(config::ConfigError::Message(
                "pipeline.stage_timeout_ms must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
