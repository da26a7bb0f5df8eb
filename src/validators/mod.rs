//! Request validators for object writes and list queries.
//!
//! Every failure carries a stable [`ErrorCode`] that the HTTP layer reports
//! verbatim in `invalidParams`.

pub mod data_attrs;
pub mod effective;
pub mod geometry;
pub mod immutable;
pub mod schema;

use std::fmt;
use thiserror::Error;

/// Field name used for failures that concern the whole payload.
pub const NON_FIELD_ERRORS: &str = "nonFieldErrors";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidJsonSchema,
    ImmutableField,
    InvalidDataAttrsQuery,
    GeometryNotAllowed,
    Required,
    DoesNotExist,
    Invalid,
    MinValue,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidJsonSchema => "invalid-json-schema",
            ErrorCode::ImmutableField => "immutable-field",
            ErrorCode::InvalidDataAttrsQuery => "invalid-data-attrs-query",
            ErrorCode::GeometryNotAllowed => "geometry-not-allowed",
            ErrorCode::Required => "required",
            ErrorCode::DoesNotExist => "does_not_exist",
            ErrorCode::Invalid => "invalid",
            ErrorCode::MinValue => "min_value",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A client-facing validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message} ({code})")]
pub struct ValidationError {
    pub field: String,
    pub code: ErrorCode,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code,
            message: message.into(),
        }
    }

    pub fn non_field(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(NON_FIELD_ERRORS, code, message)
    }

    pub fn required(field: impl Into<String>) -> Self {
        Self::new(field, ErrorCode::Required, "This field is required.")
    }
}

/// Outcome of validators that talk to the Objecttypes API.
#[derive(Debug, Error)]
pub enum ValidatorError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// The object type could not be fetched; not a client error.
    #[error("Object type can not be retrieved: {0}")]
    ObjectTypeUnavailable(String),
}
