use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pizzaria_core::{ValidationError, ValidationErrors};
use pizzaria_operations::{FailureDetail, FailureKind, FailureResponse, OperationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error("background task failed")]
    Task(#[from] tokio::task::JoinError),
}

impl ServerError {
    /// A request body or path segment that could not be parsed at all.
    pub(crate) fn malformed(field: &str, expected: &'static str) -> Self {
        Self::Operation(OperationError::Validation(ValidationErrors::single(
            ValidationError::InvalidType {
                field: field.to_string(),
                expected,
            },
        )))
    }

    fn body(&self) -> FailureResponse {
        match self {
            Self::Operation(err) => FailureResponse::from(err),
            Self::Task(err) => FailureResponse {
                error: self.to_string(),
                kind: FailureKind::StoreFailure,
                details: vec![FailureDetail::Cause {
                    message: err.to_string(),
                }],
            },
        }
    }
}

pub(crate) fn status_for(kind: FailureKind) -> StatusCode {
    match kind {
        FailureKind::ValidationFailed => StatusCode::BAD_REQUEST,
        FailureKind::Unauthorized => StatusCode::UNAUTHORIZED,
        FailureKind::NotFound => StatusCode::NOT_FOUND,
        FailureKind::Conflict => StatusCode::CONFLICT,
        FailureKind::StoreFailure | FailureKind::CompensationFailure => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let body = self.body();
        let status = status_for(body.kind);

        if status.is_server_error() {
            tracing::error!(
                error = ?self,
                kind = ?body.kind,
                "internal server error"
            );
        }

        (status, Json(body)).into_response()
    }
}
