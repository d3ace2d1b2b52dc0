//! HTTP error bodies

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, PipelineError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorType {
    InvalidRequestError,
    NotFoundError,
    InvalidQueryError,
    UpstreamError,
    ServiceUnavailableError,
    TimeoutError,
    ServerError,
}

impl std::fmt::Display for ApiErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRequestError => write!(f, "invalid_request_error"),
            Self::NotFoundError => write!(f, "not_found_error"),
            Self::InvalidQueryError => write!(f, "invalid_query_error"),
            Self::UpstreamError => write!(f, "upstream_error"),
            Self::ServiceUnavailableError => write!(f, "service_unavailable_error"),
            Self::TimeoutError => write!(f, "timeout_error"),
            Self::ServerError => write!(f, "server_error"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: ApiErrorType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, error_type: ApiErrorType, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: ApiErrorDetail {
                    message: message.into(),
                    error_type,
                    code: None,
                },
            },
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.response.error.code = Some(code.into());
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ApiErrorType::InvalidRequestError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, ApiErrorType::ServerError, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            ApiErrorType::ServiceUnavailableError,
            message,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        let (status, error_type) = match err {
            PipelineError::EmptyResult => (StatusCode::NOT_FOUND, ApiErrorType::NotFoundError),
            PipelineError::GenerationInvalid => {
                (StatusCode::UNPROCESSABLE_ENTITY, ApiErrorType::InvalidQueryError)
            }
            PipelineError::GenerationFailed
            | PipelineError::ExecutionFailed
            | PipelineError::SynthesisFailed => (StatusCode::BAD_GATEWAY, ApiErrorType::UpstreamError),
            PipelineError::CacheUnavailable | PipelineError::Cancelled { .. } => (
                StatusCode::SERVICE_UNAVAILABLE,
                ApiErrorType::ServiceUnavailableError,
            ),
            PipelineError::Timeout { .. } => (StatusCode::GATEWAY_TIMEOUT, ApiErrorType::TimeoutError),
        };

        Self::new(status, error_type, err.user_message()).with_code(err.code())
    }
}

/// Adapter errors only reach HTTP from admin-style endpoints; detail stays in logs
impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        tracing::warn!(error = %err, "Request failed");

        match err {
            DomainError::Validation { message } => Self::bad_request(message),
            DomainError::Provider { .. } | DomainError::Graph { .. } | DomainError::Cache { .. } => {
                Self::unavailable("A backing service is unavailable.")
            }
            DomainError::Configuration { .. } | DomainError::Internal { .. } => {
                Self::internal("Internal server error.")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.response.error.error_type, self.response.error.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PipelineStage;

    #[test]
    fn test_pipeline_error_statuses() {
        let cases = [
            (PipelineError::EmptyResult, StatusCode::NOT_FOUND),
            (PipelineError::GenerationInvalid, StatusCode::UNPROCESSABLE_ENTITY),
            (PipelineError::GenerationFailed, StatusCode::BAD_GATEWAY),
            (PipelineError::ExecutionFailed, StatusCode::BAD_GATEWAY),
            (PipelineError::SynthesisFailed, StatusCode::BAD_GATEWAY),
            (PipelineError::CacheUnavailable, StatusCode::SERVICE_UNAVAILABLE),
            (
                PipelineError::Cancelled { stage: PipelineStage::Execute },
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                PipelineError::Timeout { stage: PipelineStage::Generate },
                StatusCode::GATEWAY_TIMEOUT,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status, "{:?}", err);
        }
    }

    #[test]
    fn test_pipeline_error_body_uses_fixed_message() {
        let err = ApiError::from(PipelineError::EmptyResult);
        let json = serde_json::to_value(&err.response).unwrap();

        assert_eq!(json["error"]["message"], "No results found.");
        assert_eq!(json["error"]["type"], "not_found_error");
        assert_eq!(json["error"]["code"], "empty_result");
    }

    #[test]
    fn test_domain_error_hides_detail() {
        let err = ApiError::from(DomainError::graph("Neo.ClientError", "bolt://secret-host refused"));

        assert_eq!(err.status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(!err.response.error.message.contains("secret-host"));
    }

    #[test]
    fn test_code_omitted_when_absent() {
        let err = ApiError::bad_request("Question must not be empty");
        let json = serde_json::to_string(&err.response).unwrap();

        assert!(json.contains("invalid_request_error"));
        assert!(!json.contains("code"));
    }
}
