// crates/toolscip-scdl/src/descriptor.rs
// ============================================================================
// Module: SCDL Descriptor
// Description: Typed SCDL model and the embedded descriptor schema.
// Purpose: Validate raw descriptors, collecting every violation.
// Dependencies: jsonschema, serde, serde_json, toolscip-core
// ============================================================================

//! ## Overview
//! Descriptor validation is schema driven and accumulates every violation
//! into one [`ValidationError`], unlike SCIP message parsing which stops at
//! the first failure. The schema is compiled once per process.
//!
//! The embedded schema requires only what functions, events and parameters
//! need to be bound: function `name`/`inputs`/`outputs`, event
//! `name`/`outputs`, and parameter `name`/`type` with an inner `type` string.
//! Every other member is optional and type checked when present.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::OnceLock;

use jsonschema::Draft;
use jsonschema::Validator;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;
use toolscip_core::AbstractType;
use toolscip_core::PARSE_ERROR_CODE;
use toolscip_core::PARSE_ERROR_MESSAGE;

// ============================================================================
// SECTION: Descriptor Model
// ============================================================================

/// Declared parameter of a function or event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScdlParameter {
    /// Parameter name; may be empty for anonymous return values.
    pub name: String,
    /// Opaque type descriptor.
    #[serde(rename = "type")]
    pub abstract_type: AbstractType,
    /// Whether the event output is indexed by the chain.
    #[serde(default)]
    pub is_indexed: bool,
}

/// Declared contract function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScdlFunction {
    /// Function name, unique within the descriptor.
    pub name: String,
    /// Visibility scope.
    #[serde(default)]
    pub scope: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Dispatcher hint.
    #[serde(default)]
    pub dispatcher: String,
    /// Names of events the function may emit.
    #[serde(default)]
    pub events: Vec<String>,
    /// Whether invoking the function changes contract state.
    #[serde(default)]
    pub has_side_effects: bool,
    /// Declared inputs.
    pub inputs: Vec<ScdlParameter>,
    /// Declared outputs.
    pub outputs: Vec<ScdlParameter>,
}

/// Declared contract event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScdlEvent {
    /// Event name, unique within the descriptor.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Observable outputs.
    pub outputs: Vec<ScdlParameter>,
}

/// Validated SCDL contract descriptor.
///
/// # Invariants
/// - Produced only by [`validate_descriptor`] or by deserializing a value
///   that already passed it; never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scdl {
    /// Descriptor format version.
    pub scdl_version: String,
    /// Contract name.
    pub name: String,
    /// Contract version.
    pub version: String,
    /// Contract author.
    pub author: String,
    /// Human-readable description.
    pub description: String,
    /// Creation date.
    pub created_on: String,
    /// Last update date.
    pub updated_on: String,
    /// Gateway endpoint receiving SCIP requests for this contract.
    pub scl: String,
    /// On-chain address.
    pub internal_address: String,
    /// Blockchain family.
    pub blockchain_type: String,
    /// Blockchain or compiler version.
    pub blockchain_version: String,
    /// Source hash.
    pub hash: String,
    /// Whether the contract holds state.
    pub is_stateful: bool,
    /// Lifecycle label.
    pub lifecycle: String,
    /// Metadata location.
    pub metadata: String,
    /// Registry location of the newest descriptor version.
    pub latest_url: String,
    /// Declared functions.
    pub functions: Vec<ScdlFunction>,
    /// Declared events.
    pub events: Vec<ScdlEvent>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Descriptor schema violations.
///
/// # Invariants
/// - `errors` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid scdl descriptor: {}", .errors.join("; "))]
pub struct ValidationError {
    /// Every violation found, in schema evaluation order.
    pub errors: Vec<String>,
}

impl ValidationError {
    /// Creates an error from a single violation.
    #[must_use]
    pub fn single(message: impl Into<String>) -> Self {
        Self {
            errors: vec![message.into()],
        }
    }

    /// Returns the JSON-RPC error code.
    #[must_use]
    pub const fn code(&self) -> i64 {
        PARSE_ERROR_CODE
    }

    /// Returns the canonical JSON-RPC message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        PARSE_ERROR_MESSAGE
    }

    /// Returns the violations as a JSON array of strings.
    #[must_use]
    pub fn data(&self) -> Value {
        Value::from(self.errors.clone())
    }
}

// ============================================================================
// SECTION: Schema
// ============================================================================

/// Returns the embedded SCDL descriptor schema.
#[must_use]
pub fn scdl_schema() -> &'static Value {
    static SCHEMA: OnceLock<Value> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        let text = json!({"type": "string"});
        json!({
            "type": "object",
            "properties": {
                "scdl_version": text,
                "name": text,
                "version": text,
                "author": text,
                "description": text,
                "latest_url": text,
                "created_on": text,
                "updated_on": text,
                "scl": text,
                "internal_address": text,
                "blockchain_type": text,
                "blockchain_version": text,
                "metadata": text,
                "hash": text,
                "is_stateful": {"type": "boolean"},
                "lifecycle": text,
                "functions": {
                    "type": "array",
                    "items": {"$ref": "#/definitions/functionObj"}
                },
                "events": {
                    "type": "array",
                    "items": {"$ref": "#/definitions/eventObj"}
                }
            },
            "definitions": {
                "functionObj": {
                    "type": "object",
                    "properties": {
                        "name": text,
                        "description": text,
                        "inputs": {
                            "type": "array",
                            "items": {"$ref": "#/definitions/parameterObj"}
                        },
                        "outputs": {
                            "type": "array",
                            "items": {"$ref": "#/definitions/parameterObj"}
                        },
                        "has_side_effects": {"type": "boolean"},
                        "scope": text,
                        "dispatcher": text,
                        "events": {"type": "array", "items": text}
                    },
                    "required": ["name", "inputs", "outputs"]
                },
                "eventObj": {
                    "type": "object",
                    "properties": {
                        "name": text,
                        "description": text,
                        "outputs": {
                            "type": "array",
                            "items": {"$ref": "#/definitions/parameterObj"}
                        }
                    },
                    "required": ["name", "outputs"]
                },
                "parameterObj": {
                    "type": "object",
                    "properties": {
                        "name": text,
                        "type": {
                            "type": "object",
                            "properties": {"type": text},
                            "required": ["type"]
                        },
                        "is_indexed": {"type": "boolean"}
                    },
                    "required": ["name", "type"]
                }
            }
        })
    })
}

/// Returns the process-wide compiled descriptor validator.
fn scdl_validator() -> Result<&'static Validator, ValidationError> {
    static VALIDATOR: OnceLock<Validator> = OnceLock::new();
    if let Some(validator) = VALIDATOR.get() {
        return Ok(validator);
    }
    let compiled = jsonschema::options()
        .with_draft(Draft::Draft7)
        .build(scdl_schema())
        .map_err(|err| ValidationError::single(format!("invalid scdl schema: {err}")))?;
    let _ = VALIDATOR.set(compiled);
    VALIDATOR.get().ok_or_else(|| ValidationError::single("scdl validator missing"))
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Validates a raw descriptor and returns its typed model.
///
/// # Errors
///
/// Returns [`ValidationError`] carrying every schema violation, or the typed
/// decoding failure when the schema passes but the model cannot be built.
pub fn validate_descriptor(raw: &Value) -> Result<Scdl, ValidationError> {
    let validator = scdl_validator()?;
    let errors: Vec<String> = validator.iter_errors(raw).map(|err| err.to_string()).collect();
    if !errors.is_empty() {
        return Err(ValidationError {
            errors,
        });
    }
    Scdl::deserialize(raw).map_err(|err| ValidationError::single(err.to_string()))
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

    use super::*;

    #[test]
    fn empty_object_is_a_valid_descriptor() {
        let scdl = validate_descriptor(&json!({})).unwrap();
        assert!(scdl.functions.is_empty());
        assert!(scdl.events.is_empty());
    }

    #[test]
    fn non_object_descriptor_is_rejected() {
        assert!(validate_descriptor(&json!([1, 2])).is_err());
    }

    #[test]
    fn parameter_type_needs_inner_type() {
        let raw = json!({
            "functions": [{
                "name": "f",
                "inputs": [{"name": "a", "type": {"pattern": "^0x"}}],
                "outputs": []
            }]
        });
        let err = validate_descriptor(&raw).unwrap_err();
        assert_eq!(err.errors.len(), 1);
    }

    #[test]
    fn validation_error_exposes_error_triple() {
        let err = ValidationError {
            errors: vec!["first".to_string(), "second".to_string()],
        };
        assert_eq!(err.code(), -32700);
        assert_eq!(err.message(), "Parse error");
        assert_eq!(err.data(), json!(["first", "second"]));
        assert_eq!(err.to_string(), "invalid scdl descriptor: first; second");
    }
}
