// crates/toolscip-core/src/jsonrpc.rs
// ============================================================================
// Module: JSON-RPC Envelope
// Description: JSON-RPC 2.0 request/notification/success/error envelopes.
// Purpose: Classify arbitrary JSON values into a generic envelope shape.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! The SCIP dispatcher sits on top of a generic JSON-RPC 2.0 envelope. This
//! module decodes untyped JSON into an [`Envelope`] and encodes it back.
//! Envelope version must be exactly [`JSONRPC_VERSION`]; anything else fails
//! before any payload inspection happens.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Serialize;
use serde::Serializer;
use serde_json::Map;
use serde_json::Value;

use crate::error::INTERNAL_ERROR_CODE;
use crate::error::INTERNAL_ERROR_MESSAGE;
use crate::error::INVALID_PARAMS_CODE;
use crate::error::INVALID_PARAMS_MESSAGE;
use crate::error::INVALID_REQUEST_CODE;
use crate::error::INVALID_REQUEST_MESSAGE;
use crate::error::METHOD_NOT_FOUND_CODE;
use crate::error::METHOD_NOT_FOUND_MESSAGE;
use crate::error::PARSE_ERROR_CODE;
use crate::error::PARSE_ERROR_MESSAGE;
use crate::error::ProtocolError;
use crate::validation;
use crate::validation::Presence;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// The only accepted JSON-RPC version tag.
pub const JSONRPC_VERSION: &str = "2.0";

// ============================================================================
// SECTION: Identifiers
// ============================================================================

/// JSON-RPC request identifier.
///
/// # Invariants
/// - Numeric identifiers are integers; fractional ids are rejected on decode.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Id {
    /// Integer identifier.
    Number(i64),
    /// String identifier.
    String(String),
    /// Explicit `null` identifier (error responses to undecodable requests).
    Null,
}

impl Id {
    /// Decodes an identifier from a raw JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidRequest`] for non-integer numbers and
    /// non-scalar values.
    pub fn from_value(value: &Value) -> Result<Self, ProtocolError> {
        match value {
            Value::String(id) => Ok(Self::String(id.clone())),
            Value::Null => Ok(Self::Null),
            Value::Number(number) => number
                .as_i64()
                .map(Self::Number)
                .ok_or_else(|| ProtocolError::invalid_request("Invalid id member")),
            _ => Err(ProtocolError::invalid_request("Invalid id member")),
        }
    }

    /// Encodes the identifier as a JSON value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Number(id) => Value::from(*id),
            Self::String(id) => Value::String(id.clone()),
            Self::Null => Value::Null,
        }
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(id) => id.fmt(f),
            Self::String(id) => id.fmt(f),
            Self::Null => f.write_str("null"),
        }
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Number(id) => serializer.serialize_i64(*id),
            Self::String(id) => serializer.serialize_str(id),
            Self::Null => serializer.serialize_unit(),
        }
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for Id {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for Id {
    fn from(value: i32) -> Self {
        Self::Number(i64::from(value))
    }
}

// ============================================================================
// SECTION: Error Object
// ============================================================================

/// JSON-RPC error triple.
///
/// # Invariants
/// - `data` distinguishes an absent member (`None`) from explicit `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorObject {
    /// Error code.
    pub code: i64,
    /// Short error description.
    pub message: String,
    /// Optional diagnostic payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ErrorObject {
    /// Creates an error object from its parts.
    #[must_use]
    pub fn new(code: i64, message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            code,
            message: message.into(),
            data,
        }
    }

    /// Standard `-32700 Parse error`.
    #[must_use]
    pub fn parse_error(data: Option<Value>) -> Self {
        Self::new(PARSE_ERROR_CODE, PARSE_ERROR_MESSAGE, data)
    }

    /// Standard `-32600 Invalid Request`.
    #[must_use]
    pub fn invalid_request(data: Option<Value>) -> Self {
        Self::new(INVALID_REQUEST_CODE, INVALID_REQUEST_MESSAGE, data)
    }

    /// Standard `-32601 Method not found`.
    #[must_use]
    pub fn method_not_found(data: Option<Value>) -> Self {
        Self::new(METHOD_NOT_FOUND_CODE, METHOD_NOT_FOUND_MESSAGE, data)
    }

    /// Standard `-32602 Invalid params`.
    #[must_use]
    pub fn invalid_params(data: Option<Value>) -> Self {
        Self::new(INVALID_PARAMS_CODE, INVALID_PARAMS_MESSAGE, data)
    }

    /// Standard `-32603 Internal error`.
    #[must_use]
    pub fn internal_error(data: Option<Value>) -> Self {
        Self::new(INTERNAL_ERROR_CODE, INTERNAL_ERROR_MESSAGE, data)
    }

    /// Decodes and validates an error object from a raw JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Parse`] when the code is not a strictly
    /// negative integer or the message is not a string.
    pub fn from_value(value: &Value) -> Result<Self, ProtocolError> {
        let obj = validation::as_object(value, "The error member")?;
        let code = validation::validate_error_code(obj, Presence::Required)?;
        let message = validation::validate_error_message(obj, Presence::Required)?;
        match (code, message) {
            (Some(code), Some(message)) => Ok(Self {
                code,
                message,
                data: obj.get("data").cloned(),
            }),
            _ => Err(ProtocolError::parse("Error object is incomplete!")),
        }
    }
}

// ============================================================================
// SECTION: Envelope
// ============================================================================

/// Generic JSON-RPC 2.0 message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope {
    /// Request expecting a correlated response.
    Request {
        /// Request identifier.
        id: Id,
        /// Method name.
        method: String,
        /// Raw params member (`null` when absent).
        params: Value,
    },
    /// One-way notification (no identifier).
    Notification {
        /// Method name.
        method: String,
        /// Raw params member (`null` when absent).
        params: Value,
    },
    /// Successful response.
    Success {
        /// Identifier of the answered request.
        id: Id,
        /// Raw result member.
        result: Value,
    },
    /// Error response.
    Error {
        /// Identifier of the answered request.
        id: Id,
        /// Validated error triple.
        error: ErrorObject,
    },
}

impl Envelope {
    /// Encodes the envelope as a JSON value with the version tag set.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("jsonrpc".to_string(), Value::String(JSONRPC_VERSION.to_string()));
        match self {
            Self::Request {
                id,
                method,
                params,
            } => {
                map.insert("id".to_string(), id.to_value());
                map.insert("method".to_string(), Value::String(method.clone()));
                if !params.is_null() {
                    map.insert("params".to_string(), params.clone());
                }
            }
            Self::Notification {
                method,
                params,
            } => {
                map.insert("method".to_string(), Value::String(method.clone()));
                if !params.is_null() {
                    map.insert("params".to_string(), params.clone());
                }
            }
            Self::Success {
                id,
                result,
            } => {
                map.insert("id".to_string(), id.to_value());
                map.insert("result".to_string(), result.clone());
            }
            Self::Error {
                id,
                error,
            } => {
                map.insert("id".to_string(), id.to_value());
                map.insert("error".to_string(), error_to_value(error));
            }
        }
        Value::Object(map)
    }
}

/// Decodes an arbitrary JSON value into a JSON-RPC envelope.
///
/// # Errors
///
/// Returns [`ProtocolError::Parse`] when the version tag is not `"2.0"` or
/// the value matches no envelope shape, and [`ProtocolError::InvalidRequest`]
/// when `method` or `id` are mistyped.
pub fn decode_envelope(value: &Value) -> Result<Envelope, ProtocolError> {
    let Value::Object(obj) = value else {
        return Err(ProtocolError::parse("Invalid message!"));
    };
    check_version(obj)?;

    if let Some(method) = obj.get("method") {
        let Value::String(method) = method else {
            return Err(ProtocolError::invalid_request("The method member MUST be a string!"));
        };
        let params = obj.get("params").cloned().unwrap_or(Value::Null);
        return match obj.get("id") {
            Some(id) => Ok(Envelope::Request {
                id: Id::from_value(id)?,
                method: method.clone(),
                params,
            }),
            None => Ok(Envelope::Notification {
                method: method.clone(),
                params,
            }),
        };
    }

    let Some(id) = obj.get("id") else {
        return Err(ProtocolError::parse("Invalid message!"));
    };
    let id = Id::from_value(id)?;
    if let Some(result) = obj.get("result") {
        return Ok(Envelope::Success {
            id,
            result: result.clone(),
        });
    }
    if let Some(error) = obj.get("error") {
        return Ok(Envelope::Error {
            id,
            error: ErrorObject::from_value(error)?,
        });
    }
    Err(ProtocolError::parse("Invalid message!"))
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Rejects any envelope whose version tag is not exactly `"2.0"`.
fn check_version(obj: &Map<String, Value>) -> Result<(), ProtocolError> {
    match obj.get("jsonrpc") {
        Some(Value::String(version)) if version == JSONRPC_VERSION => Ok(()),
        Some(Value::String(version)) => Err(version_mismatch(version)),
        Some(other) => Err(version_mismatch(&other.to_string())),
        None => Err(version_mismatch("missing")),
    }
}

/// Builds the version-mismatch diagnostic naming the offending version.
fn version_mismatch(version: &str) -> ProtocolError {
    ProtocolError::parse(format!(
        "Version {version} not supported! Please use {JSONRPC_VERSION} instead."
    ))
}

/// Encodes an error object, keeping explicit `null` data.
fn error_to_value(error: &ErrorObject) -> Value {
    let mut map = Map::new();
    map.insert("code".to_string(), Value::from(error.code));
    map.insert("message".to_string(), Value::String(error.message.clone()));
    if let Some(data) = &error.data {
        map.insert("data".to_string(), data.clone());
    }
    Value::Object(map)
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

    #[test]
    fn request_with_id_decodes_as_request() {
        let envelope =
            decode_envelope(&json!({"jsonrpc": "2.0", "id": 7, "method": "Invoke", "params": {}}))
                .unwrap();
        assert_eq!(
            envelope,
            Envelope::Request {
                id: Id::Number(7),
                method: "Invoke".to_string(),
                params: json!({}),
            }
        );
    }

    #[test]
    fn method_without_id_decodes_as_notification() {
        let envelope =
            decode_envelope(&json!({"jsonrpc": "2.0", "method": "ReceiveCallback"})).unwrap();
        assert!(matches!(envelope, Envelope::Notification { params: Value::Null, .. }));
    }

    #[test]
    fn missing_version_is_reported() {
        let err = decode_envelope(&json!({"id": 1, "result": "OK"})).unwrap_err();
        assert_eq!(err.data(), "Version missing not supported! Please use 2.0 instead.");
    }

    #[test]
    fn numeric_version_is_rejected() {
        let err = decode_envelope(&json!({"jsonrpc": 2, "id": 1, "result": "OK"})).unwrap_err();
        assert!(matches!(err, ProtocolError::Parse(_)));
    }

    #[test]
    fn fractional_id_is_rejected() {
        let err = decode_envelope(&json!({"jsonrpc": "2.0", "id": 1.5, "result": "OK"})).unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidRequest(_)));
    }

    #[test]
    fn non_object_is_invalid_message() {
        let err = decode_envelope(&json!(["jsonrpc", "2.0"])).unwrap_err();
        assert_eq!(err.data(), "Invalid message!");
    }

    #[test]
    fn error_envelope_keeps_explicit_null_data() {
        let raw = json!({"jsonrpc": "2.0", "id": null, "error": {"code": -32000, "message": "Not Found", "data": null}});
        let envelope = decode_envelope(&raw).unwrap();
        let Envelope::Error {
            id,
            error,
        } = &envelope
        else {
            panic!("expected error envelope");
        };
        assert_eq!(*id, Id::Null);
        assert_eq!(error.data, Some(Value::Null));
        assert_eq!(envelope.to_value(), raw);
    }

    #[test]
    fn standard_error_objects_decode_back() {
        let objects = [
            ErrorObject::parse_error(None),
            ErrorObject::invalid_request(Some(json!("detail"))),
            ErrorObject::method_not_found(None),
            ErrorObject::invalid_params(Some(Value::Null)),
            ErrorObject::internal_error(None),
        ];
        let codes: Vec<i64> = objects.iter().map(|object| object.code).collect();
        assert_eq!(codes, vec![-32700, -32600, -32601, -32602, -32603]);
        for object in objects {
            let envelope = Envelope::Error {
                id: Id::Number(1),
                error: object.clone(),
            };
            assert_eq!(
                decode_envelope(&envelope.to_value()).unwrap(),
                Envelope::Error {
                    id: Id::Number(1),
                    error: object,
                }
            );
        }
    }

    #[test]
    fn error_envelope_with_positive_code_is_rejected() {
        let raw = json!({"jsonrpc": "2.0", "id": "x", "error": {"code": 5, "message": "nope"}});
        assert!(matches!(decode_envelope(&raw), Err(ProtocolError::Parse(_))));
    }
}
