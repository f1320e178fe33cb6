//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every helper yields an `invalid_request` [`Error`] whose `details.field`
//! names the offending parameter so clients can highlight it.

use serde_json::json;

use crate::domain::{Error, UserId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidInteger,
    OutOfRange,
    InvalidValue,
    InvalidJson,
}

impl ErrorCode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidInteger => "invalid_integer",
            Self::OutOfRange => "out_of_range",
            Self::InvalidValue => "invalid_value",
            Self::InvalidJson => "invalid_json",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) const fn as_str(self) -> &'static str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    fn new(field: FieldName, message: impl Into<String>) -> Self {
        Self {
            field: field.as_str(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: &str) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value,
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    ValidationError::new(field, format!("missing required field: {name}"))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let name = field.as_str();
    ValidationError::new(field, format!("{name} must be a valid UUID"))
        .with_value(ErrorCode::InvalidUuid, value)
}

pub(crate) fn invalid_integer_error(field: FieldName, value: &str) -> Error {
    let name = field.as_str();
    ValidationError::new(field, format!("{name} must be a non-negative integer"))
        .with_value(ErrorCode::InvalidInteger, value)
}

pub(crate) fn out_of_range_error(field: FieldName, message: impl Into<String>) -> Error {
    ValidationError::new(field, message).with_code(ErrorCode::OutOfRange)
}

/// Reject a value that is not one of `allowed`.
pub(crate) fn invalid_choice_error(field: FieldName, value: &str, allowed: &[&str]) -> Error {
    let name = field.as_str();
    Error::invalid_request(format!("{name} must be one of: {}", allowed.join(", "))).with_details(
        json!({
            "field": name,
            "value": value,
            "allowed": allowed,
            "code": ErrorCode::InvalidValue.as_str(),
        }),
    )
}

/// Error returned for request bodies that fail to deserialise.
pub(crate) fn invalid_json_error(cause: impl std::fmt::Display) -> Error {
    Error::invalid_request(format!("invalid JSON body: {cause}"))
        .with_details(json!({ "code": ErrorCode::InvalidJson.as_str() }))
}

pub(crate) fn parse_user_id(value: &str) -> Result<UserId, Error> {
    UserId::new(value).map_err(|_| invalid_uuid_error(FieldName::new("id"), value))
}

/// Parse a required non-negative integer query parameter.
pub(crate) fn parse_required_u64(value: Option<&str>, field: FieldName) -> Result<u64, Error> {
    let raw = value.ok_or_else(|| missing_field_error(field))?;
    raw.trim()
        .parse()
        .map_err(|_| invalid_integer_error(field, raw))
}

/// Parse an optional non-negative integer query parameter.
pub(crate) fn parse_optional_u32(value: Option<&str>, field: FieldName) -> Result<Option<u32>, Error> {
    value
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|_| invalid_integer_error(field, raw))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::Value;

    const PAGE: FieldName = FieldName::new("page");

    fn detail<'a>(error: &'a Error, key: &str) -> Option<&'a Value> {
        error.details().and_then(|details| details.get(key))
    }

    #[rstest]
    fn missing_required_value_names_the_field() {
        let err = parse_required_u64(None, PAGE).expect_err("missing");

        assert_eq!(err.message(), "missing required field: page");
        assert_eq!(detail(&err, "field"), Some(&Value::from("page")));
        assert_eq!(detail(&err, "code"), Some(&Value::from("missing_field")));
    }

    #[rstest]
    #[case("-1")]
    #[case("two")]
    #[case("")]
    fn non_integers_are_rejected(#[case] raw: &str) {
        let err = parse_required_u64(Some(raw), PAGE).expect_err("invalid");

        assert_eq!(detail(&err, "code"), Some(&Value::from("invalid_integer")));
        assert_eq!(detail(&err, "value"), Some(&Value::from(raw)));
    }

    #[rstest]
    fn integers_parse_with_surrounding_whitespace() {
        assert_eq!(parse_required_u64(Some(" 3 "), PAGE), Ok(3));
        assert_eq!(
            parse_optional_u32(Some("41"), FieldName::new("age")),
            Ok(Some(41))
        );
        assert_eq!(parse_optional_u32(None, FieldName::new("age")), Ok(None));
    }

    #[rstest]
    fn malformed_user_id_is_reported_on_id_field() {
        let err = parse_user_id("not-a-uuid").expect_err("invalid id");

        assert_eq!(detail(&err, "field"), Some(&Value::from("id")));
        assert_eq!(detail(&err, "code"), Some(&Value::from("invalid_uuid")));
    }

    #[rstest]
    fn choice_errors_list_allowed_values() {
        let err = invalid_choice_error(FieldName::new("order_dir"), "up", &["asc", "desc"]);

        assert_eq!(err.message(), "order_dir must be one of: asc, desc");
        assert_eq!(
            detail(&err, "allowed"),
            Some(&serde_json::json!(["asc", "desc"]))
        );
    }
}
