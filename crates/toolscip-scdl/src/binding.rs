// crates/toolscip-scdl/src/binding.rs
// ============================================================================
// Module: Parameter Binding
// Description: Attach positional values to declared SCDL parameters.
// Purpose: Produce SCIP parameter lists with the arity rules each call uses.
// Dependencies: serde_json, thiserror, toolscip-core
// ============================================================================

//! ## Overview
//! Values are matched to declarations by position. Under [`Arity::Required`]
//! the counts must agree exactly. Under [`Arity::Optional`] a caller may also
//! pass no values at all, which yields an empty parameter list.

use serde_json::Value;
use thiserror::Error;
use toolscip_core::INVALID_REQUEST_CODE;
use toolscip_core::INVALID_REQUEST_MESSAGE;
use toolscip_core::Parameter;

use crate::descriptor::ScdlParameter;

/// Arity rule applied when binding values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly one value per declaration.
    Required,
    /// Either no values or one value per declaration.
    Optional,
}

/// Binding failures, surfaced as JSON-RPC invalid requests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    /// Value count does not satisfy the arity rule.
    #[error("Invalid Request: {0}")]
    InvalidRequest(String),
}

impl BindingError {
    /// Returns the JSON-RPC error code.
    #[must_use]
    pub const fn code(&self) -> i64 {
        INVALID_REQUEST_CODE
    }

    /// Returns the canonical JSON-RPC message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        INVALID_REQUEST_MESSAGE
    }

    /// Returns the explanatory detail.
    #[must_use]
    pub fn data(&self) -> &str {
        match self {
            Self::InvalidRequest(detail) => detail,
        }
    }
}

/// Binds positional values to declared parameters.
///
/// # Errors
///
/// Returns [`BindingError::InvalidRequest`] when the value count violates `arity`.
pub fn create_params(
    values: &[Value],
    declared: &[ScdlParameter],
    arity: Arity,
) -> Result<Vec<Parameter>, BindingError> {
    match arity {
        Arity::Required if values.len() != declared.len() => {
            return Err(BindingError::InvalidRequest(format!(
                "The number of passed values ({}) mismatch the number of required parameters ({})!",
                values.len(),
                declared.len()
            )));
        }
        Arity::Optional if !values.is_empty() && values.len() != declared.len() => {
            return Err(BindingError::InvalidRequest(format!(
                "Provide 0 or {} values!",
                declared.len()
            )));
        }
        _ => {}
    }
    Ok(values
        .iter()
        .zip(declared)
        .map(|(value, param)| {
            Parameter::valued(param.name.clone(), param.abstract_type.clone(), value.clone())
        })
        .collect())
}

/// Converts declarations into value-less parameters.
#[must_use]
pub fn convert_params(declared: &[ScdlParameter]) -> Vec<Parameter> {
    declared.iter().map(|param| Parameter::new(param.name.clone(), param.abstract_type.clone())).collect()
}
