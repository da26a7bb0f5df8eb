use crate::{
    services::object_service::ServiceError,
    validators::{ErrorCode, NON_FIELD_ERRORS, ValidationError},
};
use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use std::fmt;
use tracing::error;

/// One entry of `invalidParams` in a 400 response.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InvalidParam {
    pub name: String,
    pub code: String,
    pub reason: String,
}

impl From<ValidationError> for InvalidParam {
    fn from(err: ValidationError) -> Self {
        Self {
            name: err.field,
            code: err.code.to_string(),
            reason: err.message,
        }
    }
}

/// A lightweight wrapper for general errors that keeps the message local.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
    pub invalid_params: Vec<InvalidParam>,
}

impl AppError {
    /// Create a new AppError with a specific status and message.
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            message: msg.into(),
            invalid_params: Vec::new(),
        }
    }

    /// Shortcut for a 500 Internal Server Error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    /// Shortcut for 404 Not Found
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, msg)
    }

    /// Shortcut for 502 Bad Gateway
    pub fn bad_gateway(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, msg)
    }

    /// 400 carrying per-field validation failures.
    pub fn invalid(params: Vec<InvalidParam>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: "Invalid input.".into(),
            invalid_params: params,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = if self.invalid_params.is_empty() {
            json!({
                "error": self.message,
                "status": self.status.as_u16()
            })
        } else {
            json!({
                "code": "invalid",
                "title": self.message,
                "status": self.status.as_u16(),
                "invalidParams": self.invalid_params,
            })
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::invalid(vec![err.into()])
    }
}

/// Malformed bodies are reported like any other invalid input; only a
/// missing JSON content type keeps axum's own status.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => {
                AppError::new(rejection.status(), rejection.body_text())
            }
            _ => ValidationError::new(NON_FIELD_ERRORS, ErrorCode::Invalid, rejection.body_text())
                .into(),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        ValidationError::new(NON_FIELD_ERRORS, ErrorCode::Invalid, rejection.body_text()).into()
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(err) => err.into(),
            ServiceError::ObjectNotFound(_) => AppError::not_found(err.to_string()),
            ServiceError::Conflict(_) => AppError::new(StatusCode::CONFLICT, err.to_string()),
            ServiceError::ObjectTypeUnavailable(_) => {
                error!("{}", err);
                AppError::bad_gateway(err.to_string())
            }
            ServiceError::Serialization(_) => AppError::internal(err.to_string()),
        }
    }
}
