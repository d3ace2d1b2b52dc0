use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Upper bound for each external call
    #[serde(default = "default_stage_timeout_ms")]
    pub stage_timeout_ms: u64,

    /// Directory with prompt overrides
    #[serde(default)]
    pub prompts_dir: Option<String>,

    #[serde(default = "default_max_question_chars")]
    pub max_question_chars: usize,
}

fn default_stage_timeout_ms() -> u64 {
    60_000
}

fn default_max_question_chars() -> usize {
    2_000
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            stage_timeout_ms: default_stage_timeout_ms(),
            prompts_dir: None,
            max_question_chars: default_max_question_chars(),
        }
    }
}

impl PipelineConfig {
    pub fn stage_timeout(&self) -> Duration {
        Duration::from_millis(self.stage_timeout_ms)
    }

    pub fn with_stage_timeout(mut self, timeout: Duration) -> Self {
        self.stage_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_prompts_dir(mut self, dir: impl Into<String>) -> Self {
        self.prompts_dir = Some(dir.into());
        self
    }
}
