use thiserror::Error;

use super::PipelineStage;

/// Terminal outcomes that end a request without an answer
///
/// The display text is the fixed message shown to users. Internal detail is
/// logged where the error is raised and never carried here.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error("The answer cache is unavailable right now.")]
    CacheUnavailable,

    #[error("I couldn't generate a query for that question.")]
    GenerationFailed,

    #[error("I couldn't generate a valid query.")]
    GenerationInvalid,

    #[error("I couldn't retrieve data from the database.")]
    ExecutionFailed,

    #[error("No results found.")]
    EmptyResult,

    #[error("I couldn't phrase an answer for that question.")]
    SynthesisFailed,

    #[error("The request timed out.")]
    Timeout { stage: PipelineStage },

    #[error("The request was cancelled.")]
    Cancelled { stage: PipelineStage },
}

impl PipelineError {
    /// Fixed message for end users
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Self::CacheUnavailable => "cache_unavailable",
            Self::GenerationFailed => "generation_failed",
            Self::GenerationInvalid => "generation_invalid",
            Self::ExecutionFailed => "execution_failed",
            Self::EmptyResult => "empty_result",
            Self::SynthesisFailed => "synthesis_failed",
            Self::Timeout { .. } => "timeout",
            Self::Cancelled { .. } => "cancelled",
        }
    }

    /// Whether retrying the same question may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::CacheUnavailable | Self::Timeout { .. } | Self::Cancelled { .. }
        )
    }
}
