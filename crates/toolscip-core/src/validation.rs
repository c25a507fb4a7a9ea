// crates/toolscip-core/src/validation.rs
// ============================================================================
// Module: Field Validation
// Description: Shape checks for the fields of untyped SCIP payloads.
// Purpose: Validate and extract typed field values with one error per failure.
// Dependencies: serde_json, url
// ============================================================================

//! ## Overview
//! Each validator inspects a single member of a decoded JSON object. A
//! [`Presence::Optional`] member may be absent, but when present it must be
//! well typed; a [`Presence::Required`] member must also exist. Validators
//! never mutate their input and stop at the first failure.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Map;
use serde_json::Number;
use serde_json::Value;
use url::Url;

use crate::error::ProtocolError;
use crate::parameter::AbstractType;
use crate::parameter::Parameter;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Whether a member must be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// The member must exist.
    Required,
    /// The member may be absent; if present it must be well typed.
    Optional,
}

impl Presence {
    /// Returns true for [`Presence::Required`].
    #[must_use]
    pub const fn is_required(self) -> bool {
        matches!(self, Self::Required)
    }
}

/// Per-container requirements for the members of each parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamRules {
    /// Requirement on `name`.
    pub name: Presence,
    /// Requirement on `type`.
    pub abstract_type: Presence,
    /// Requirement on `value`.
    pub value: Presence,
}

impl ParamRules {
    /// Invocation inputs: every member required.
    pub const INPUTS: Self = Self {
        name: Presence::Required,
        abstract_type: Presence::Required,
        value: Presence::Required,
    };
    /// Declarations (outputs, subscription/query params): value optional.
    pub const DECLARED: Self = Self {
        name: Presence::Required,
        abstract_type: Presence::Required,
        value: Presence::Optional,
    };
    /// Reported values (callbacks, occurrences): type optional.
    pub const REPORTED: Self = Self {
        name: Presence::Required,
        abstract_type: Presence::Optional,
        value: Presence::Required,
    };
}

/// URL schemes accepted for callback endpoints.
const CALLBACK_SCHEMES: [&str; 3] = ["ftp", "http", "https"];

// ============================================================================
// SECTION: Object Helpers
// ============================================================================

/// Narrows a value to a JSON object.
///
/// # Errors
///
/// Returns [`ProtocolError::Parse`] naming `what` when the value is not an object.
pub fn as_object<'a>(value: &'a Value, what: &str) -> Result<&'a Map<String, Value>, ProtocolError> {
    value.as_object().ok_or_else(|| ProtocolError::parse(format!("{what} MUST be an object!")))
}

/// Shared presence/type check for string members.
fn string_member(
    obj: &Map<String, Value>,
    field: &str,
    presence: Presence,
    missing: &str,
    mistyped: &str,
) -> Result<Option<String>, ProtocolError> {
    match obj.get(field) {
        None if presence.is_required() => Err(ProtocolError::parse(missing)),
        None => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(ProtocolError::parse(mistyped)),
    }
}

// ============================================================================
// SECTION: Request Fields
// ============================================================================

/// Validates a `functionId`/`eventId` member: required non-empty string.
///
/// # Errors
///
/// Returns [`ProtocolError::Parse`] when missing, mistyped, or empty.
pub fn validate_identifier(obj: &Map<String, Value>, field: &str) -> Result<String, ProtocolError> {
    match obj.get(field) {
        None => Err(ProtocolError::parse(format!("The {field} is missing, but it is required!"))),
        Some(Value::String(id)) if id.is_empty() => {
            Err(ProtocolError::parse(format!("The {field} MUST NOT be empty!")))
        }
        Some(Value::String(id)) => Ok(id.clone()),
        Some(_) => Err(ProtocolError::parse("The identifier MUST be of string type!")),
    }
}

/// Validates the `corrId` member.
///
/// # Errors
///
/// Returns [`ProtocolError::Parse`] on a missing required or non-string value.
pub fn validate_corr_id(
    obj: &Map<String, Value>,
    presence: Presence,
) -> Result<Option<String>, ProtocolError> {
    string_member(
        obj,
        "corrId",
        presence,
        "Correlation identifier is missing, but it is required!",
        "Correlation identifier, if present, MUST be of string type!",
    )
}

/// Validates the `doc` (degree of confidence) member.
///
/// # Errors
///
/// Returns [`ProtocolError::Parse`] on a missing required or non-numeric value.
pub fn validate_doc(obj: &Map<String, Value>, presence: Presence) -> Result<Option<Number>, ProtocolError> {
    match obj.get("doc") {
        None if presence.is_required() => {
            Err(ProtocolError::parse("Degree of confidence is missing, but it is required!"))
        }
        None => Ok(None),
        Some(Value::Number(number)) => Ok(Some(number.clone())),
        Some(_) => Err(ProtocolError::parse("Degree of confidence, if present, MUST be of number type!")),
    }
}

/// Validates the `callback` member: an `ftp`, `http` or `https` URL.
///
/// # Errors
///
/// Returns [`ProtocolError::Parse`] on a missing required value or a value
/// that is not a string holding an absolute URL with an accepted scheme.
pub fn validate_callback(
    obj: &Map<String, Value>,
    presence: Presence,
) -> Result<Option<String>, ProtocolError> {
    const MISTYPED: &str = "Callback URL, if present, MUST be of string type and a valid URL!";
    let callback = string_member(
        obj,
        "callback",
        presence,
        "Callback URL is missing, but it is required!",
        MISTYPED,
    )?;
    if let Some(raw) = &callback {
        let url = Url::parse(raw).map_err(|_| ProtocolError::parse(MISTYPED))?;
        if !CALLBACK_SCHEMES.contains(&url.scheme()) {
            return Err(ProtocolError::parse(MISTYPED));
        }
    }
    Ok(callback)
}

/// Validates the `filter` member.
///
/// # Errors
///
/// Returns [`ProtocolError::Parse`] on a missing required or non-string value.
pub fn validate_filter(
    obj: &Map<String, Value>,
    presence: Presence,
) -> Result<Option<String>, ProtocolError> {
    string_member(
        obj,
        "filter",
        presence,
        "Filter is missing, but it is required!",
        "The filter, if present, MUST be of string type!",
    )
}

/// Validates the `timeout` member (seconds).
///
/// # Errors
///
/// Returns [`ProtocolError::Parse`] on a missing required or non-integer value.
pub fn validate_timeout(
    obj: &Map<String, Value>,
    presence: Presence,
) -> Result<Option<i64>, ProtocolError> {
    match obj.get("timeout") {
        None if presence.is_required() => {
            Err(ProtocolError::parse("Timeout is missing, but it is required!"))
        }
        None => Ok(None),
        Some(value) => value
            .as_i64()
            .map(Some)
            .ok_or_else(|| ProtocolError::parse("The timeout, if present, MUST be of integer type!")),
    }
}

/// Validates the `signature` member.
///
/// # Errors
///
/// Returns [`ProtocolError::Parse`] on a missing required or non-string value.
pub fn validate_signature(
    obj: &Map<String, Value>,
    presence: Presence,
) -> Result<Option<String>, ProtocolError> {
    string_member(
        obj,
        "signature",
        presence,
        "Signature is missing, but it is required!",
        "The signature, if present, MUST be of string type!",
    )
}

/// Validates a time bound member (`startTime` or `endTime`).
///
/// # Errors
///
/// Returns [`ProtocolError::Parse`] on a missing required or non-string value.
pub fn validate_time(
    obj: &Map<String, Value>,
    field: &str,
    presence: Presence,
) -> Result<Option<String>, ProtocolError> {
    string_member(
        obj,
        field,
        presence,
        &format!("The {field} is missing, but it is required!"),
        &format!("The {field}, if present, MUST be of string type!"),
    )
}

/// Validates the `timestamp` member of callbacks and occurrences.
///
/// # Errors
///
/// Returns [`ProtocolError::Parse`] on a missing required or non-string value.
pub fn validate_timestamp(
    obj: &Map<String, Value>,
    presence: Presence,
) -> Result<Option<String>, ProtocolError> {
    string_member(
        obj,
        "timestamp",
        presence,
        "Timestamp is missing, but it is required!",
        "The timestamp, if present, MUST be of string type!",
    )
}

// ============================================================================
// SECTION: Error Fields
// ============================================================================

/// Validates an error `code`: an integer strictly below zero.
///
/// # Errors
///
/// Returns [`ProtocolError::Parse`] on a missing required value, a non-integer,
/// or a code greater than or equal to zero.
pub fn validate_error_code(
    obj: &Map<String, Value>,
    presence: Presence,
) -> Result<Option<i64>, ProtocolError> {
    match obj.get("code") {
        None if presence.is_required() => {
            Err(ProtocolError::parse("Error code is missing, but it is required!"))
        }
        None => Ok(None),
        Some(value) => match value.as_i64() {
            Some(code) if code < 0 => Ok(Some(code)),
            _ => Err(ProtocolError::parse("The error code, if present, MUST be a negative integer!")),
        },
    }
}

/// Validates an error `message`.
///
/// # Errors
///
/// Returns [`ProtocolError::Parse`] on a missing required or non-string value.
pub fn validate_error_message(
    obj: &Map<String, Value>,
    presence: Presence,
) -> Result<Option<String>, ProtocolError> {
    string_member(
        obj,
        "message",
        presence,
        "Error message is missing, but it is required!",
        "The error message, if present, MUST be of string type!",
    )
}

// ============================================================================
// SECTION: Parameter Fields
// ============================================================================

/// Validates a parameter `name`.
///
/// # Errors
///
/// Returns [`ProtocolError::Parse`] on a missing required or non-string value.
pub fn validate_name(
    obj: &Map<String, Value>,
    presence: Presence,
) -> Result<Option<String>, ProtocolError> {
    string_member(
        obj,
        "name",
        presence,
        "Name is missing, but it is required!",
        "Name member, if present, MUST be of string type!",
    )
}

/// Validates a parameter `type`: an object with an inner `type` string.
///
/// # Errors
///
/// Returns [`ProtocolError::Parse`] on a missing required value or a
/// descriptor without an inner string `type`.
pub fn validate_type(
    obj: &Map<String, Value>,
    presence: Presence,
) -> Result<Option<AbstractType>, ProtocolError> {
    match obj.get("type") {
        None if presence.is_required() => {
            Err(ProtocolError::parse("A parameter MUST have a 'type' member!"))
        }
        None => Ok(None),
        Some(value) => AbstractType::try_from(value).map(Some),
    }
}

/// Validates a parameter `value`; any JSON value, including `null`, is accepted.
///
/// # Errors
///
/// Returns [`ProtocolError::Parse`] when a required value is absent.
pub fn validate_value(
    obj: &Map<String, Value>,
    presence: Presence,
) -> Result<Option<Value>, ProtocolError> {
    match obj.get("value") {
        None if presence.is_required() => {
            Err(ProtocolError::parse("A parameter value is missing, but it is required!"))
        }
        value => Ok(value.cloned()),
    }
}

/// Validates a parameter array member (`params`, `inputs`, `outputs`).
///
/// # Errors
///
/// Returns [`ProtocolError::Parse`] on a missing required or non-array value.
pub fn validate_params<'a>(
    obj: &'a Map<String, Value>,
    field: &str,
    presence: Presence,
) -> Result<Option<&'a Vec<Value>>, ProtocolError> {
    match obj.get(field) {
        None if presence.is_required() => {
            Err(ProtocolError::parse(format!("{field} is missing, but it is required!")))
        }
        None => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items)),
        Some(_) => Err(ProtocolError::parse(format!(
            "{field} member, if present, MUST be of array type!"
        ))),
    }
}

/// Validates the `occurrences` array of a query result.
///
/// # Errors
///
/// Returns [`ProtocolError::Parse`] on a missing required or non-array value.
pub fn validate_occurrences(
    obj: &Map<String, Value>,
    presence: Presence,
) -> Result<Option<&Vec<Value>>, ProtocolError> {
    match obj.get("occurrences") {
        None if presence.is_required() => {
            Err(ProtocolError::parse("Occurrences member is missing, but it is required!"))
        }
        None => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items)),
        Some(_) => {
            Err(ProtocolError::parse("Occurrences member, if present, MUST be of array type!"))
        }
    }
}

/// Validates and extracts one parameter under the given rules.
///
/// # Errors
///
/// Returns [`ProtocolError::Parse`] when the value is not an object or any
/// member violates `rules`.
pub fn validate_param(value: &Value, rules: ParamRules) -> Result<Parameter, ProtocolError> {
    let obj = as_object(value, "A parameter")?;
    let abstract_type = validate_type(obj, rules.abstract_type)?;
    let name = validate_name(obj, rules.name)?.unwrap_or_default();
    let value = validate_value(obj, rules.value)?;
    Ok(Parameter {
        name,
        abstract_type,
        value,
    })
}

/// Validates a required parameter array member and extracts every entry.
///
/// # Errors
///
/// Returns [`ProtocolError::Parse`] when the member is missing, not an array,
/// or any entry violates `rules`.
pub fn validate_param_list(
    obj: &Map<String, Value>,
    field: &str,
    rules: ParamRules,
) -> Result<Vec<Parameter>, ProtocolError> {
    match validate_params(obj, field, Presence::Required)? {
        Some(items) => items.iter().map(|item| validate_param(item, rules)).collect(),
        None => Ok(Vec::new()),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only panic-based assertions are permitted."
    )]

    use serde_json::json;

    use super::*;

    fn obj(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn absent_optional_members_are_accepted() {
        let empty = Map::new();
        assert_eq!(validate_corr_id(&empty, Presence::Optional).unwrap(), None);
        assert_eq!(validate_doc(&empty, Presence::Optional).unwrap(), None);
        assert_eq!(validate_timeout(&empty, Presence::Optional).unwrap(), None);
        assert_eq!(validate_callback(&empty, Presence::Optional).unwrap(), None);
    }

    #[test]
    fn mistyped_optional_members_are_rejected() {
        let bad = obj(json!({"corrId": 1, "doc": "high", "timeout": 1.5, "filter": false}));
        assert!(validate_corr_id(&bad, Presence::Optional).is_err());
        assert!(validate_doc(&bad, Presence::Optional).is_err());
        assert!(validate_timeout(&bad, Presence::Optional).is_err());
        assert!(validate_filter(&bad, Presence::Optional).is_err());
    }

    #[test]
    fn doc_keeps_numeric_form() {
        let integer = obj(json!({"doc": 99}));
        let doc = validate_doc(&integer, Presence::Required).unwrap().unwrap();
        assert_eq!(Value::Number(doc).to_string(), "99");
        let fraction = obj(json!({"doc": 0.75}));
        assert_eq!(validate_doc(&fraction, Presence::Required).unwrap(), Number::from_f64(0.75));
    }

    #[test]
    fn missing_required_member_names_the_field() {
        let err = validate_params(&Map::new(), "inputs", Presence::Required).unwrap_err();
        assert_eq!(err.data(), "inputs is missing, but it is required!");
    }

    #[test]
    fn identifier_must_be_non_empty_string() {
        assert_eq!(validate_identifier(&obj(json!({"eventId": "Transfer"})), "eventId").unwrap(), "Transfer");
        assert!(validate_identifier(&obj(json!({"eventId": ""})), "eventId").is_err());
        assert!(validate_identifier(&obj(json!({"eventId": 4})), "eventId").is_err());
        assert!(validate_identifier(&Map::new(), "eventId").is_err());
    }

    #[test]
    fn callback_accepts_only_listed_schemes() {
        let ok = obj(json!({"callback": "https://client.example/hook"}));
        assert!(validate_callback(&ok, Presence::Required).is_ok());
        let ftp = obj(json!({"callback": "ftp://files.example/drop"}));
        assert!(validate_callback(&ftp, Presence::Required).is_ok());
        let mailto = obj(json!({"callback": "mailto:dev@example.com"}));
        assert!(validate_callback(&mailto, Presence::Required).is_err());
        let relative = obj(json!({"callback": "/hook"}));
        assert!(validate_callback(&relative, Presence::Required).is_err());
        assert!(validate_callback(&Map::new(), Presence::Required).is_err());
    }

    #[test]
    fn error_code_must_be_strictly_negative() {
        assert_eq!(validate_error_code(&obj(json!({"code": -32000})), Presence::Required).unwrap(), Some(-32000));
        assert!(validate_error_code(&obj(json!({"code": 0})), Presence::Required).is_err());
        assert!(validate_error_code(&obj(json!({"code": 12})), Presence::Required).is_err());
        assert!(validate_error_code(&obj(json!({"code": -1.5})), Presence::Required).is_err());
    }

    #[test]
    fn param_rules_apply_per_container() {
        let declared = json!({"name": "_owner", "type": {"type": "string"}});
        assert!(validate_param(&declared, ParamRules::DECLARED).is_ok());
        assert!(validate_param(&declared, ParamRules::INPUTS).is_err());

        let reported = json!({"name": "value", "value": 10});
        assert!(validate_param(&reported, ParamRules::REPORTED).is_ok());
        assert!(validate_param(&reported, ParamRules::DECLARED).is_err());
    }

    #[test]
    fn explicit_null_value_is_kept() {
        let param = validate_param(&json!({"name": "x", "type": {"type": "string"}, "value": null}), ParamRules::INPUTS)
            .unwrap();
        assert_eq!(param.value, Some(Value::Null));
    }
}
