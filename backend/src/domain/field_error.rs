//! Field-level validation errors shared by domain services.
//!
//! Every validation failure becomes an `InvalidRequest` [`Error`] whose
//! details name the offending field and a stable machine-readable code.

use serde_json::json;

use super::Error;

/// Stable codes surfaced in `details.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorCode {
    Required,
    Blank,
    TooShort,
    TooLong,
    Invalid,
    DuplicateEmail,
    DuplicateName,
    AuthenticationFailed,
}

impl FieldErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Blank => "blank",
            Self::TooShort => "too_short",
            Self::TooLong => "too_long",
            Self::Invalid => "invalid",
            Self::DuplicateEmail => "duplicate_email",
            Self::DuplicateName => "duplicate_name",
            Self::AuthenticationFailed => "authentication_failed",
        }
    }
}

/// Build an `InvalidRequest` error for a single field.
///
/// # Examples
/// ```
/// use backend::domain::{ErrorCode, FieldErrorCode, field_error};
///
/// let err = field_error("title", FieldErrorCode::Required, "title is required");
/// assert_eq!(err.code(), ErrorCode::InvalidRequest);
/// assert_eq!(err.details().and_then(|d| d["field"].as_str()), Some("title"));
/// ```
pub fn field_error(field: &str, code: FieldErrorCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

/// Build an `InvalidRequest` error listing several missing required fields.
pub fn missing_fields_error(fields: &[&str]) -> Error {
    Error::invalid_request(format!("missing required fields: {}", fields.join(", ")))
        .with_details(json!({
            "fields": fields,
            "code": FieldErrorCode::Required.as_str(),
        }))
}
