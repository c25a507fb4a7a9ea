// crates/toolscip-core/src/error.rs
// ============================================================================
// Module: Protocol Errors
// Description: Decode failures raised while parsing SCIP messages.
// Purpose: Carry a JSON-RPC code, message, and diagnostic for every failure.
// Dependencies: serde_json, thiserror
// ============================================================================

//! ## Overview
//! [`ProtocolError`] is raised synchronously by the validation layer and the
//! dispatcher. The first failing check wins; nothing accumulates. Each value
//! maps onto a JSON-RPC error triple through [`ProtocolError::to_error_object`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use thiserror::Error;

use crate::jsonrpc::ErrorObject;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// JSON-RPC code for malformed or mistyped messages.
pub const PARSE_ERROR_CODE: i64 = -32700;
/// JSON-RPC message paired with [`PARSE_ERROR_CODE`].
pub const PARSE_ERROR_MESSAGE: &str = "Parse error";
/// JSON-RPC code for well-formed messages the protocol does not accept.
pub const INVALID_REQUEST_CODE: i64 = -32600;
/// JSON-RPC message paired with [`INVALID_REQUEST_CODE`].
pub const INVALID_REQUEST_MESSAGE: &str = "Invalid Request";
/// JSON-RPC code for an unknown method.
pub const METHOD_NOT_FOUND_CODE: i64 = -32601;
/// JSON-RPC message paired with [`METHOD_NOT_FOUND_CODE`].
pub const METHOD_NOT_FOUND_MESSAGE: &str = "Method not found";
/// JSON-RPC code for invalid method parameters.
pub const INVALID_PARAMS_CODE: i64 = -32602;
/// JSON-RPC message paired with [`INVALID_PARAMS_CODE`].
pub const INVALID_PARAMS_MESSAGE: &str = "Invalid params";
/// JSON-RPC code for failures inside the local process.
pub const INTERNAL_ERROR_CODE: i64 = -32603;
/// JSON-RPC message paired with [`INTERNAL_ERROR_CODE`].
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal error";

// ============================================================================
// SECTION: Types
// ============================================================================

/// SCIP decode failure.
///
/// # Invariants
/// - Variants are stable for error classification.
/// - The carried string is the diagnostic `data` of the error triple.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Missing, malformed, or mistyped field.
    #[error("parse error: {0}")]
    Parse(String),
    /// Message shape is valid JSON-RPC but not an acceptable SCIP message.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ProtocolError {
    /// Creates a parse error with the given diagnostic.
    #[must_use]
    pub fn parse(detail: impl Into<String>) -> Self {
        Self::Parse(detail.into())
    }

    /// Creates an invalid-request error with the given diagnostic.
    #[must_use]
    pub fn invalid_request(detail: impl Into<String>) -> Self {
        Self::InvalidRequest(detail.into())
    }

    /// Returns the JSON-RPC error code.
    #[must_use]
    pub const fn code(&self) -> i64 {
        match self {
            Self::Parse(_) => PARSE_ERROR_CODE,
            Self::InvalidRequest(_) => INVALID_REQUEST_CODE,
        }
    }

    /// Returns the canonical JSON-RPC error message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Parse(_) => PARSE_ERROR_MESSAGE,
            Self::InvalidRequest(_) => INVALID_REQUEST_MESSAGE,
        }
    }

    /// Returns the human-readable diagnostic.
    #[must_use]
    pub fn data(&self) -> &str {
        match self {
            Self::Parse(detail) | Self::InvalidRequest(detail) => detail,
        }
    }

    /// Converts the failure into a JSON-RPC error object.
    #[must_use]
    pub fn to_error_object(&self) -> ErrorObject {
        let data = Some(Value::String(self.data().to_string()));
        match self {
            Self::Parse(_) => ErrorObject::parse_error(data),
            Self::InvalidRequest(_) => ErrorObject::invalid_request(data),
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
