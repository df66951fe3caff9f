//! Shared validation helpers for inbound HTTP adapters.
//!
//! All helpers produce `invalid_request` domain errors carrying structured
//! `details` with the offending field, so clients can highlight the exact
//! input that failed.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::domain::{ClientContact, ContactValidationError, DomainError};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidDate,
    InvalidTimestamp,
    InvalidContact,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidDate => "invalid_date",
            ErrorCode::InvalidTimestamp => "invalid_timestamp",
            ErrorCode::InvalidContact => "invalid_contact",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

impl From<&'static str> for FieldName {
    fn from(name: &'static str) -> Self {
        Self::new(name)
    }
}

fn field_error(
    field: FieldName,
    message: impl Into<String>,
    code: ErrorCode,
    value: Option<&str>,
) -> DomainError {
    let mut details = json!({
        "field": field.as_str(),
        "code": code.as_str(),
    });
    if let (Some(obj), Some(raw)) = (details.as_object_mut(), value) {
        obj.insert("value".to_owned(), json!(raw));
    }
    DomainError::invalid_request(message).with_details(details)
}

pub(crate) fn missing_field_error(field: impl Into<FieldName>) -> DomainError {
    let field = field.into();
    field_error(
        field,
        format!("missing required field: {}", field.as_str()),
        ErrorCode::MissingField,
        None,
    )
}

pub(crate) fn parse_uuid(value: &str, field: impl Into<FieldName>) -> Result<Uuid, DomainError> {
    let field = field.into();
    Uuid::parse_str(value.trim()).map_err(|_| {
        field_error(
            field,
            format!("{} must be a valid UUID", field.as_str()),
            ErrorCode::InvalidUuid,
            Some(value),
        )
    })
}

/// Parse a calendar date in `YYYY-MM-DD` form.
pub(crate) fn parse_date(value: &str, field: impl Into<FieldName>) -> Result<NaiveDate, DomainError> {
    let field = field.into();
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        field_error(
            field,
            format!("{} must be a date in YYYY-MM-DD form", field.as_str()),
            ErrorCode::InvalidDate,
            Some(value),
        )
    })
}

pub(crate) fn parse_rfc3339_timestamp(
    value: &str,
    field: impl Into<FieldName>,
) -> Result<DateTime<Utc>, DomainError> {
    let field = field.into();
    DateTime::parse_from_rfc3339(value.trim())
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|_| {
            field_error(
                field,
                format!("{} must be an RFC 3339 timestamp", field.as_str()),
                ErrorCode::InvalidTimestamp,
                Some(value),
            )
        })
}

/// Validate contact fields, attributing failures to the wire field names.
pub(crate) fn parse_contact(
    name: &str,
    phone: &str,
    email: Option<&str>,
) -> Result<ClientContact, DomainError> {
    ClientContact::new(name, phone, email).map_err(|err| {
        let (field, message) = match err {
            ContactValidationError::NameTooShort => {
                ("clientName", "clientName must be at least 3 characters")
            }
            ContactValidationError::PhoneDigitCount => {
                ("clientPhone", "clientPhone must contain 10 or 11 digits")
            }
            ContactValidationError::MalformedEmail => {
                ("clientEmail", "clientEmail must be a valid email address")
            }
        };
        field_error(
            FieldName::new(field),
            message,
            ErrorCode::InvalidContact,
            None,
        )
    })
}
