//! Response envelopes shared by every endpoint, and the mapping from
//! `DomainError` to HTTP status.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

/// Plain confirmation message.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// One field that failed validation.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldProblem {
    pub name: String,
    pub description: String,
}

impl From<&ValidationError> for FieldProblem {
    fn from(error: &ValidationError) -> Self {
        Self {
            name: error.field().to_string(),
            description: error.to_string(),
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn validation(problems: &[ValidationError]) -> Self {
        let problems: Vec<FieldProblem> = problems.iter().map(FieldProblem::from).collect();
        Self {
            code: ErrorCode::ValidationFailed.to_string(),
            message: format!("{} invalid field(s)", problems.len()),
            details: serde_json::to_value(problems).ok(),
        }
    }

    pub fn not_found(error: &DomainError) -> Self {
        Self {
            code: error.code().to_string(),
            message: error.message().to_string(),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
            details: None,
        }
    }
}

/// 400 for a body that is not valid JSON or lacks required fields.
pub fn malformed_body(rejection: JsonRejection) -> Response {
    tracing::debug!(error = %rejection, "rejected request body");
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::bad_request("missing values or malformed body")),
    )
        .into_response()
}

/// 400 with the list of offending fields.
pub fn validation_failed(problems: &[ValidationError]) -> Response {
    tracing::debug!(problems = problems.len(), "request failed validation");
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::validation(problems)),
    )
        .into_response()
}

/// Maps a repository failure to a response.
///
/// Storage and transaction details are logged but never sent to the client.
pub fn handle_domain_error(error: DomainError) -> Response {
    match error.code() {
        ErrorCode::CourseNotFound | ErrorCode::PersonNotFound => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found(&error)),
        )
            .into_response(),
        ErrorCode::ValidationFailed => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(error.message())),
        )
            .into_response(),
        ErrorCode::DatabaseError | ErrorCode::TransactionError | ErrorCode::InternalError => {
            tracing::error!(
                code = %error.code(),
                operation = error.detail("operation").unwrap_or("unknown"),
                stage = error.detail("stage").unwrap_or("unknown"),
                error = %error.message(),
                "request failed"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal("An unexpected error occurred")),
            )
                .into_response()
        }
    }
}
