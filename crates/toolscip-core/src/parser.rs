// crates/toolscip-core/src/parser.rs
// ============================================================================
// Module: SCIP Parser
// Description: Dispatch decoded JSON-RPC envelopes into typed SCIP messages.
// Purpose: Turn arbitrary JSON into a validated ScipMessage or a ProtocolError.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! Parsing is a two-step decode. The value is first classified as a JSON-RPC
//! envelope, then the params or result are inspected structurally: the
//! `functionId`/`eventId` member selects the target of subscriptions,
//! unsubscriptions and queries, and a success `result` that parses as
//! occurrences becomes a query result.
//!
//! The payload parsers here are shared with the `*_from_value` constructors.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Map;
use serde_json::Value;

use crate::error::ProtocolError;
use crate::jsonrpc::Envelope;
use crate::jsonrpc::decode_envelope;
use crate::message::ScipMessage;
use crate::message::ScipRequest;
use crate::message::ScipResponse;
use crate::types::CALLBACK_METHOD;
use crate::types::Callback;
use crate::types::DEFAULT_SIGNATURE;
use crate::types::Invocation;
use crate::types::Occurrence;
use crate::types::Query;
use crate::types::QueryResult;
use crate::types::Subscription;
use crate::types::Target;
use crate::types::TargetKind;
use crate::types::Unsubscription;
use crate::validation;
use crate::validation::ParamRules;
use crate::validation::Presence;

// ============================================================================
// SECTION: Entry Points
// ============================================================================

/// Parses an arbitrary JSON value into a SCIP message.
///
/// # Errors
///
/// Returns [`ProtocolError`] when the envelope or payload is malformed, the
/// request method is unknown, or the target discriminant is missing or doubled.
pub fn parse(value: &Value) -> Result<ScipMessage, ProtocolError> {
    match decode_envelope(value)? {
        Envelope::Request {
            id,
            method,
            params,
        } => {
            let request = match method.as_str() {
                "Invoke" => ScipRequest::Invoke {
                    id,
                    params: parse_invocation(&params)?,
                },
                "Subscribe" => ScipRequest::Subscribe {
                    id,
                    params: parse_subscription(&params, None)?,
                },
                "Unsubscribe" => ScipRequest::Unsubscribe {
                    id,
                    params: parse_unsubscription(&params, None)?,
                },
                "Query" => ScipRequest::Query {
                    id,
                    params: parse_query(&params, None)?,
                },
                _ => return Err(ProtocolError::invalid_request("The method is invalid!")),
            };
            Ok(ScipMessage::Request(request))
        }
        Envelope::Notification {
            method,
            params,
        } => {
            if method != CALLBACK_METHOD {
                return Err(ProtocolError::invalid_request(format!(
                    "{method} unsupported method for Callback message! Use {CALLBACK_METHOD} instead."
                )));
            }
            Ok(ScipMessage::Response(ScipResponse::Callback(parse_callback(&params)?)))
        }
        Envelope::Success {
            id,
            result,
        } => {
            let response = match parse_query_result(&result) {
                Ok(result) => ScipResponse::QueryResult {
                    id,
                    result,
                },
                Err(_) => ScipResponse::Success {
                    id,
                    result,
                },
            };
            Ok(ScipMessage::Response(response))
        }
        Envelope::Error {
            id,
            error,
        } => Ok(ScipMessage::Response(ScipResponse::Error {
            id,
            error,
        })),
    }
}

/// Parses JSON text into a SCIP message.
///
/// # Errors
///
/// Returns [`ProtocolError::Parse`] for invalid JSON text, otherwise the
/// errors of [`parse`].
pub fn parse_str(text: &str) -> Result<ScipMessage, ProtocolError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|err| ProtocolError::parse(format!("Invalid JSON: {err}")))?;
    parse(&value)
}

/// Parses a value that must be a SCIP request.
///
/// # Errors
///
/// Returns the errors of [`parse`], or [`ProtocolError::Parse`] naming the
/// obtained kind when the value is a response.
pub fn parse_request(value: &Value) -> Result<ScipRequest, ProtocolError> {
    match parse(value)? {
        ScipMessage::Request(request) => Ok(request),
        ScipMessage::Response(response) => Err(ProtocolError::parse(format!(
            "The parsed data is not a valid scip request, obtained {} instead!",
            response.kind()
        ))),
    }
}

/// Parses a value that must be a SCIP response or callback.
///
/// # Errors
///
/// Returns the errors of [`parse`], or [`ProtocolError::Parse`] naming the
/// obtained kind when the value is a request.
pub fn parse_response(value: &Value) -> Result<ScipResponse, ProtocolError> {
    match parse(value)? {
        ScipMessage::Response(response) => Ok(response),
        ScipMessage::Request(request) => Err(ProtocolError::parse(format!(
            "The parsed data is not a valid scip response, obtained {} instead!",
            request.kind()
        ))),
    }
}

// ============================================================================
// SECTION: Payload Parsers
// ============================================================================

/// Reads the discriminant of a targeted payload, optionally forcing its kind.
fn detect_target(
    obj: &Map<String, Value>,
    expected: Option<TargetKind>,
) -> Result<Target, ProtocolError> {
    let has_function = obj.contains_key(TargetKind::Function.field());
    let has_event = obj.contains_key(TargetKind::Event.field());
    let kind = match (has_function, has_event) {
        (true, true) => {
            return Err(ProtocolError::invalid_request(
                "Invalid identifier found, use either functionId or eventId, not both",
            ));
        }
        (true, false) => TargetKind::Function,
        (false, true) => TargetKind::Event,
        (false, false) => {
            return Err(ProtocolError::invalid_request(
                "Invalid identifier found, use \"functionId\" or \"eventId\"",
            ));
        }
    };
    let id = validation::validate_identifier(obj, kind.field())?;
    let target = match kind {
        TargetKind::Function => Target::Function(id),
        TargetKind::Event => Target::Event(id),
    };
    if let Some(expected) = expected {
        target.expect(expected)?;
    }
    Ok(target)
}

/// Parses `Invoke` params.
pub(crate) fn parse_invocation(params: &Value) -> Result<Invocation, ProtocolError> {
    let obj = validation::as_object(params, "Invocation params")?;
    if obj.contains_key(TargetKind::Event.field()) {
        return Err(ProtocolError::invalid_request("An invocation MUST target a functionId!"));
    }
    Ok(Invocation {
        function_id: validation::validate_identifier(obj, TargetKind::Function.field())?,
        inputs: validation::validate_param_list(obj, "inputs", ParamRules::INPUTS)?,
        outputs: validation::validate_param_list(obj, "outputs", ParamRules::DECLARED)?,
        signature: validation::validate_signature(obj, Presence::Optional)?
            .unwrap_or_else(|| DEFAULT_SIGNATURE.to_string()),
        callback: validation::validate_callback(obj, Presence::Optional)?,
        corr_id: validation::validate_corr_id(obj, Presence::Optional)?,
        doc: validation::validate_doc(obj, Presence::Optional)?,
        timeout: validation::validate_timeout(obj, Presence::Optional)?,
    })
}

/// Parses `Subscribe` params.
pub(crate) fn parse_subscription(
    params: &Value,
    expected: Option<TargetKind>,
) -> Result<Subscription, ProtocolError> {
    let obj = validation::as_object(params, "Subscription params")?;
    let target = detect_target(obj, expected)?;
    let callback = validation::validate_callback(obj, Presence::Required)?.unwrap_or_default();
    Ok(Subscription {
        target,
        params: validation::validate_param_list(obj, "params", ParamRules::DECLARED)?,
        callback,
        corr_id: validation::validate_corr_id(obj, Presence::Optional)?,
        doc: validation::validate_doc(obj, Presence::Optional)?,
        filter: validation::validate_filter(obj, Presence::Optional)?,
    })
}

/// Parses `Unsubscribe` params.
pub(crate) fn parse_unsubscription(
    params: &Value,
    expected: Option<TargetKind>,
) -> Result<Unsubscription, ProtocolError> {
    let obj = validation::as_object(params, "Unsubscription params")?;
    Ok(Unsubscription {
        target: detect_target(obj, expected)?,
        params: validation::validate_param_list(obj, "params", ParamRules::DECLARED)?,
        corr_id: validation::validate_corr_id(obj, Presence::Optional)?,
    })
}

/// Parses `Query` params.
pub(crate) fn parse_query(params: &Value, expected: Option<TargetKind>) -> Result<Query, ProtocolError> {
    let obj = validation::as_object(params, "Query params")?;
    Ok(Query {
        target: detect_target(obj, expected)?,
        params: validation::validate_param_list(obj, "params", ParamRules::DECLARED)?,
        filter: validation::validate_filter(obj, Presence::Optional)?,
        start_time: validation::validate_time(obj, "startTime", Presence::Optional)?,
        end_time: validation::validate_time(obj, "endTime", Presence::Optional)?,
    })
}

/// Parses `ReceiveCallback` params.
pub(crate) fn parse_callback(params: &Value) -> Result<Callback, ProtocolError> {
    let obj = validation::as_object(params, "Callback params")?;
    Ok(Callback {
        params: validation::validate_param_list(obj, "params", ParamRules::REPORTED)?,
        timestamp: validation::validate_timestamp(obj, Presence::Required)?.unwrap_or_default(),
        corr_id: validation::validate_corr_id(obj, Presence::Optional)?,
    })
}

/// Parses a single occurrence.
fn parse_occurrence(value: &Value) -> Result<Occurrence, ProtocolError> {
    let obj = validation::as_object(value, "An occurrence")?;
    Ok(Occurrence {
        params: validation::validate_param_list(obj, "params", ParamRules::REPORTED)?,
        timestamp: validation::validate_timestamp(obj, Presence::Required)?.unwrap_or_default(),
    })
}

/// Parses a query result; failure makes the dispatcher fall back to success.
pub(crate) fn parse_query_result(result: &Value) -> Result<QueryResult, ProtocolError> {
    let obj = validation::as_object(result, "A query result")?;
    let occurrences: Vec<Occurrence> = match validation::validate_occurrences(obj, Presence::Required)? {
        Some(items) => items.iter().map(parse_occurrence).collect::<Result<_, _>>()?,
        None => Vec::new(),
    };
    Ok(QueryResult {
        occurrences,
    })
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
    fn subscription_requires_callback() {
        let err = parse_subscription(&json!({"eventId": "Transfer", "params": []}), None).unwrap_err();
        assert_eq!(err.data(), "Callback URL is missing, but it is required!");
    }

    #[test]
    fn expected_kind_rejects_other_discriminant() {
        let params = json!({"functionId": "balanceOf", "params": []});
        assert!(parse_query(&params, Some(TargetKind::Function)).is_ok());
        let err = parse_query(&params, Some(TargetKind::Event)).unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidRequest(_)));
    }

    #[test]
    fn invocation_defaults_signature() {
        let invocation =
            parse_invocation(&json!({"functionId": "totalSupply", "inputs": [], "outputs": []})).unwrap();
        assert_eq!(invocation.signature, "sha256");
    }

    #[test]
    fn empty_object_is_not_a_query_result() {
        assert!(parse_query_result(&json!({})).is_err());
        assert!(parse_query_result(&json!({"occurrences": []})).is_ok());
    }
}
