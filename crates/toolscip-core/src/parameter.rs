// crates/toolscip-core/src/parameter.rs
// ============================================================================
// Module: Abstract Parameters
// Description: Named, typed, optionally valued parameters of SCIP payloads.
// Purpose: Carry parameter declarations and values through every message.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! A [`Parameter`] pairs a name with an opaque [`AbstractType`] descriptor and
//! an optional JSON value. The type descriptor is forwarded untouched; the
//! core only checks that it is an object carrying an inner `type` string.
//!
//! Invariants:
//! - `value: None` means the member is absent on the wire; `Some(Value::Null)`
//!   is an explicit `null` and survives a round-trip.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::error::ProtocolError;

// ============================================================================
// SECTION: Abstract Type
// ============================================================================

/// Opaque protocol type descriptor, e.g. `{"type": "string", "pattern": "^0x"}`.
///
/// # Invariants
/// - Always a JSON object whose `type` member is a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AbstractType(Map<String, Value>);

impl AbstractType {
    /// Creates a descriptor with only the inner `type` discriminator set.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        let mut map = Map::new();
        map.insert("type".to_string(), Value::String(kind.into()));
        Self(map)
    }

    /// Returns a copy of the descriptor with an extra constraint keyword.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        let key = key.into();
        if key != "type" {
            self.0.insert(key, value);
        }
        self
    }

    /// Returns the inner `type` discriminator.
    #[must_use]
    pub fn kind(&self) -> &str {
        self.0.get("type").and_then(Value::as_str).unwrap_or_default()
    }

    /// Returns the full descriptor object.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Encodes the descriptor as a JSON value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

impl TryFrom<Map<String, Value>> for AbstractType {
    type Error = ProtocolError;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        match map.get("type") {
            Some(Value::String(_)) => Ok(Self(map)),
            Some(_) => Err(ProtocolError::parse("The inner type of a parameter type must be a string!")),
            None => Err(ProtocolError::parse("The parameter type is missing its inner type field!")),
        }
    }
}

impl TryFrom<&Value> for AbstractType {
    type Error = ProtocolError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Self::try_from(map.clone()),
            _ => Err(ProtocolError::parse("Type must be an object!")),
        }
    }
}

impl<'de> Deserialize<'de> for AbstractType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        Self::try_from(map).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// SECTION: Parameter
// ============================================================================

/// Named parameter as it travels inside SCIP payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Type descriptor; optional only in callback and occurrence payloads.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub abstract_type: Option<AbstractType>,
    /// Bound value; absent for pure declarations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl Parameter {
    /// Creates a declaration without a value.
    #[must_use]
    pub fn new(name: impl Into<String>, abstract_type: AbstractType) -> Self {
        Self {
            name: name.into(),
            abstract_type: Some(abstract_type),
            value: None,
        }
    }

    /// Creates a parameter carrying a value.
    #[must_use]
    pub fn valued(name: impl Into<String>, abstract_type: AbstractType, value: Value) -> Self {
        Self {
            name: name.into(),
            abstract_type: Some(abstract_type),
            value: Some(value),
        }
    }

    /// Returns a copy of this parameter with the given value attached.
    #[must_use]
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    /// Encodes the parameter as a JSON object.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("name".to_string(), Value::String(self.name.clone()));
        if let Some(abstract_type) = &self.abstract_type {
            map.insert("type".to_string(), abstract_type.to_value());
        }
        if let Some(value) = &self.value {
            map.insert("value".to_string(), value.clone());
        }
        Value::Object(map)
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

    #[test]
    fn abstract_type_requires_inner_type_string() {
        assert!(AbstractType::try_from(&json!({"type": "string"})).is_ok());
        assert!(AbstractType::try_from(&json!({"pattern": "^0x"})).is_err());
        assert!(AbstractType::try_from(&json!({"type": 3})).is_err());
        assert!(AbstractType::try_from(&json!("string")).is_err());
    }

    #[test]
    fn abstract_type_keeps_constraints() {
        let ty = AbstractType::new("integer").with("minimum", json!(0));
        assert_eq!(ty.kind(), "integer");
        assert_eq!(ty.to_value(), json!({"type": "integer", "minimum": 0}));
    }

    #[test]
    fn explicit_null_value_is_serialized() {
        let param = Parameter::new("x", AbstractType::new("string")).with_value(Value::Null);
        assert_eq!(
            serde_json::to_value(&param).unwrap(),
            json!({"name": "x", "type": {"type": "string"}, "value": null})
        );
        assert_eq!(serde_json::to_value(&param).unwrap(), param.to_value());
    }

    #[test]
    fn declaration_omits_value() {
        let param = Parameter::new("x", AbstractType::new("string"));
        assert_eq!(param.to_value(), json!({"name": "x", "type": {"type": "string"}}));
    }
}
