use std::fmt;

use serde::Serialize;

use super::PipelineError;
use crate::domain::graph::Row;
use crate::domain::semantic_cache::CachedEntry;

/// Stage names, used in logs, timeouts and metrics labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Lookup,
    Generate,
    Validate,
    Execute,
    Synthesize,
    CacheWrite,
    Render,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lookup => "lookup",
            Self::Generate => "generate",
            Self::Validate => "validate",
            Self::Execute => "execute",
            Self::Synthesize => "synthesize",
            Self::CacheWrite => "cache_write",
            Self::Render => "render",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-question state threaded through the stages
#[derive(Debug, Clone)]
pub struct PipelineContext {
    question: String,
    cached: bool,
    score: Option<f32>,
    answer_template: Option<String>,
    generator_query: Option<String>,
    result_rows: Vec<Row>,
    error: Option<PipelineError>,
    answer: Option<String>,
    missing_fields: Vec<String>,
}

impl PipelineContext {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            cached: false,
            score: None,
            answer_template: None,
            generator_query: None,
            result_rows: Vec::new(),
            error: None,
            answer: None,
            missing_fields: Vec::new(),
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn is_cached(&self) -> bool {
        self.cached
    }

    pub fn score(&self) -> Option<f32> {
        self.score
    }

    pub fn answer_template(&self) -> Option<&str> {
        self.answer_template.as_deref()
    }

    pub fn generator_query(&self) -> Option<&str> {
        self.generator_query.as_deref()
    }

    pub fn result_rows(&self) -> &[Row] {
        &self.result_rows
    }

    pub fn error(&self) -> Option<PipelineError> {
        self.error
    }

    pub fn is_errored(&self) -> bool {
        self.error.is_some()
    }

    /// Reuse a cached template and query. Sets both together so a cached
    /// context always has them.
    pub fn mark_hit(&mut self, entry: &CachedEntry, score: f32) {
        self.cached = true;
        self.score = Some(score);
        self.answer_template = Some(entry.answer_template().to_string());
        self.generator_query = Some(entry.generator_query().to_string());
    }

    /// Record a miss; `best_score` is the nearest entry's score, if any
    pub fn mark_miss(&mut self, best_score: Option<f32>) {
        self.cached = false;
        self.score = best_score;
    }

    pub fn set_generator_query(&mut self, query: impl Into<String>) {
        self.generator_query = Some(query.into());
    }

    pub fn set_answer_template(&mut self, template: impl Into<String>) {
        self.answer_template = Some(template.into());
    }

    pub fn set_result_rows(&mut self, rows: Vec<Row>) {
        self.result_rows = rows;
    }

    pub fn set_answer(&mut self, answer: impl Into<String>, missing_fields: Vec<String>) {
        self.answer = Some(answer.into());
        self.missing_fields = missing_fields;
    }

    /// Record a terminal error. The first one wins.
    pub fn fail(&mut self, error: PipelineError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    /// Collapse into an outcome holding exactly one of answer or error
    pub fn finish(self) -> PipelineOutcome {
        let result = match (self.error, self.answer) {
            (Some(error), _) => Err(error),
            (None, Some(answer)) => Ok(answer),
            (None, None) => Err(PipelineError::EmptyResult),
        };

        PipelineOutcome {
            question: self.question,
            cached: self.cached,
            score: self.score,
            missing_fields: self.missing_fields,
            result,
        }
    }
}

/// Final result of one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub question: String,
    pub cached: bool,
    pub score: Option<f32>,
    /// Placeholders the renderer could not fill
    pub missing_fields: Vec<String>,
    pub result: Result<String, PipelineError>,
}

impl PipelineOutcome {
    pub fn answer(&self) -> Option<&str> {
        self.result.as_ref().ok().map(String::as_str)
    }

    pub fn error(&self) -> Option<PipelineError> {
        self.result.as_ref().err().copied()
    }

    /// Answer text or the error's fixed message
    pub fn message(&self) -> String {
        match &self.result {
            Ok(answer) => answer.clone(),
            Err(error) => error.user_message(),
        }
    }

    /// Label for the outcome metric
    pub fn label(&self) -> &'static str {
        match &self.result {
            Ok(_) if self.cached => "hit",
            Ok(_) => "miss",
            Err(error) => error.code(),
        }
    }
}
