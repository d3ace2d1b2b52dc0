//! Question answering request and response bodies

use serde::{Deserialize, Serialize};

use crate::domain::{PipelineError, PipelineOutcome};

#[derive(Debug, Clone, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    pub cached: bool,
    /// Similarity of the matched cache entry; null on a miss
    pub score: Option<f32>,
}

impl TryFrom<PipelineOutcome> for AskResponse {
    type Error = PipelineError;

    fn try_from(outcome: PipelineOutcome) -> Result<Self, Self::Error> {
        let answer = outcome.result?;

        Ok(Self {
            answer,
            cached: outcome.cached,
            score: if outcome.cached { outcome.score } else { None },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(cached: bool, result: Result<String, PipelineError>) -> PipelineOutcome {
        PipelineOutcome {
            question: "Who teaches Rust?".to_string(),
            cached,
            score: Some(0.97),
            missing_fields: Vec::new(),
            result,
        }
    }

    #[test]
    fn test_from_outcome_hit() {
        let response = AskResponse::try_from(outcome(true, Ok("Ana".to_string()))).unwrap();

        assert_eq!(response.answer, "Ana");
        assert!(response.cached);
        assert_eq!(response.score, Some(0.97));
    }

    #[test]
    fn test_from_outcome_miss_has_no_score() {
        let response = AskResponse::try_from(outcome(false, Ok("Ana".to_string()))).unwrap();

        assert!(!response.cached);
        assert!(response.score.is_none());
        assert_eq!(
            serde_json::to_string(&response).unwrap(),
            r#"{"answer":"Ana","cached":false,"score":null}"#
        );
    }

    #[test]
    fn test_from_outcome_error() {
        let result = AskResponse::try_from(outcome(false, Err(PipelineError::EmptyResult)));
        assert_eq!(result.unwrap_err(), PipelineError::EmptyResult);
    }
}
