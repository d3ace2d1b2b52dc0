//! Natural-language question endpoint

use axum::extract::State;
use tracing::debug;

use crate::api::middleware::truncate_for_log;
use crate::api::state::AppState;
use crate::api::types::{ApiError, AskRequest, AskResponse, Json};

/// POST /v1/ask
pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    let question = request.question.trim();
    validate_question(question, state.max_question_chars)?;

    debug!(question = %truncate_for_log(question, 120), "Answering question");

    // Cancelled on shutdown, or when the client goes away and this future is dropped
    let cancel = state.shutdown.child_token();
    let _guard = cancel.clone().drop_guard();

    let outcome = state.pipeline.run(question, &cancel).await;
    let response = AskResponse::try_from(outcome)?;
    Ok(Json(response))
}

fn validate_question(question: &str, max_chars: usize) -> Result<(), ApiError> {
    if question.is_empty() {
        return Err(ApiError::bad_request("Question must not be empty").with_code("empty_question"));
    }

    if question.chars().count() > max_chars {
        return Err(ApiError::bad_request(format!(
            "Question must be at most {} characters",
            max_chars
        ))
        .with_code("question_too_long"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_validate_question() {
        assert!(validate_question("Who teaches Rust?", 100).is_ok());
        assert_eq!(validate_question("", 100).unwrap_err().status, StatusCode::BAD_REQUEST);

        let err = validate_question("abcdef", 5).unwrap_err();
        assert_eq!(err.response.error.code.as_deref(), Some("question_too_long"));
    }

    #[test]
    fn test_validate_counts_chars_not_bytes() {
        assert!(validate_question("ñññññ", 5).is_ok());
    }
}
