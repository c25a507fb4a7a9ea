// crates/toolscip-core/src/construct.rs
// ============================================================================
// Module: SCIP Constructors
// Description: Build SCIP messages from typed payloads or raw JSON.
// Purpose: Share one validation path between parsing and message construction.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Each constructor exists twice. The typed form takes a payload struct, the
//! `*_from_value` form takes raw JSON. Both run the same field validation as
//! [`crate::parse`], so every message they return parses back to itself.
//! Event and function specific forms also reject a payload that addresses the
//! other kind of member.
//!
//! [`success`] is the one infallible constructor: its result is opaque, and a
//! result shaped like occurrences parses back as a query result. Use
//! [`success_from_value`] to apply that detection up front.

use serde::Serialize;
use serde_json::Value;

use crate::error::ProtocolError;
use crate::jsonrpc::ErrorObject;
use crate::jsonrpc::Id;
use crate::message::ScipMessage;
use crate::message::ScipRequest;
use crate::message::ScipResponse;
use crate::parser;
use crate::types::Callback;
use crate::types::Invocation;
use crate::types::Query;
use crate::types::QueryResult;
use crate::types::Subscription;
use crate::types::TargetKind;
use crate::types::Unsubscription;

// ============================================================================
// SECTION: Requests
// ============================================================================

/// Builds an `Invoke` request.
///
/// # Errors
///
/// Returns [`ProtocolError`] when an input carries no value or an optional
/// member is malformed.
pub fn invoke(id: impl Into<Id>, params: Invocation) -> Result<ScipMessage, ProtocolError> {
    parser::parse_invocation(&encode(&params)?)?;
    Ok(invocation(id.into(), params))
}

/// Builds an `Invoke` request from raw params.
///
/// # Errors
///
/// Returns [`ProtocolError`] when the params are not a valid invocation.
pub fn invoke_from_value(id: impl Into<Id>, params: &Value) -> Result<ScipMessage, ProtocolError> {
    Ok(invocation(id.into(), parser::parse_invocation(params)?))
}

/// Builds a `Subscribe` request for an event.
///
/// # Errors
///
/// Returns [`ProtocolError`] when the payload targets a function or is invalid.
pub fn subscribe_event(id: impl Into<Id>, params: Subscription) -> Result<ScipMessage, ProtocolError> {
    checked_subscribe(id.into(), params, TargetKind::Event)
}

/// Builds a `Subscribe` request for an event from raw params.
///
/// # Errors
///
/// Returns [`ProtocolError`] when the params are invalid or target a function.
pub fn subscribe_event_from_value(
    id: impl Into<Id>,
    params: &Value,
) -> Result<ScipMessage, ProtocolError> {
    Ok(subscribe(id.into(), parser::parse_subscription(params, Some(TargetKind::Event))?))
}

/// Builds a `Subscribe` request for a function.
///
/// # Errors
///
/// Returns [`ProtocolError`] when the payload targets an event or is invalid.
pub fn subscribe_function(
    id: impl Into<Id>,
    params: Subscription,
) -> Result<ScipMessage, ProtocolError> {
    checked_subscribe(id.into(), params, TargetKind::Function)
}

/// Builds a `Subscribe` request for a function from raw params.
///
/// # Errors
///
/// Returns [`ProtocolError`] when the params are invalid or target an event.
pub fn subscribe_function_from_value(
    id: impl Into<Id>,
    params: &Value,
) -> Result<ScipMessage, ProtocolError> {
    Ok(subscribe(id.into(), parser::parse_subscription(params, Some(TargetKind::Function))?))
}

/// Builds an `Unsubscribe` request for an event.
///
/// # Errors
///
/// Returns [`ProtocolError`] when the payload targets a function or is invalid.
pub fn unsubscribe_event(
    id: impl Into<Id>,
    params: Unsubscription,
) -> Result<ScipMessage, ProtocolError> {
    checked_unsubscribe(id.into(), params, TargetKind::Event)
}

/// Builds an `Unsubscribe` request for an event from raw params.
///
/// # Errors
///
/// Returns [`ProtocolError`] when the params are invalid or target a function.
pub fn unsubscribe_event_from_value(
    id: impl Into<Id>,
    params: &Value,
) -> Result<ScipMessage, ProtocolError> {
    Ok(unsubscribe(id.into(), parser::parse_unsubscription(params, Some(TargetKind::Event))?))
}

/// Builds an `Unsubscribe` request for a function.
///
/// # Errors
///
/// Returns [`ProtocolError`] when the payload targets an event or is invalid.
pub fn unsubscribe_function(
    id: impl Into<Id>,
    params: Unsubscription,
) -> Result<ScipMessage, ProtocolError> {
    checked_unsubscribe(id.into(), params, TargetKind::Function)
}

/// Builds an `Unsubscribe` request for a function from raw params.
///
/// # Errors
///
/// Returns [`ProtocolError`] when the params are invalid or target an event.
pub fn unsubscribe_function_from_value(
    id: impl Into<Id>,
    params: &Value,
) -> Result<ScipMessage, ProtocolError> {
    Ok(unsubscribe(id.into(), parser::parse_unsubscription(params, Some(TargetKind::Function))?))
}

/// Builds a `Query` request for an event.
///
/// # Errors
///
/// Returns [`ProtocolError`] when the payload targets a function or is invalid.
pub fn query_event(id: impl Into<Id>, params: Query) -> Result<ScipMessage, ProtocolError> {
    checked_query(id.into(), params, TargetKind::Event)
}

/// Builds a `Query` request for an event from raw params.
///
/// # Errors
///
/// Returns [`ProtocolError`] when the params are invalid or target a function.
pub fn query_event_from_value(id: impl Into<Id>, params: &Value) -> Result<ScipMessage, ProtocolError> {
    Ok(query(id.into(), parser::parse_query(params, Some(TargetKind::Event))?))
}

/// Builds a `Query` request for a function.
///
/// # Errors
///
/// Returns [`ProtocolError`] when the payload targets an event or is invalid.
pub fn query_function(id: impl Into<Id>, params: Query) -> Result<ScipMessage, ProtocolError> {
    checked_query(id.into(), params, TargetKind::Function)
}

/// Builds a `Query` request for a function from raw params.
///
/// # Errors
///
/// Returns [`ProtocolError`] when the params are invalid or target an event.
pub fn query_function_from_value(
    id: impl Into<Id>,
    params: &Value,
) -> Result<ScipMessage, ProtocolError> {
    Ok(query(id.into(), parser::parse_query(params, Some(TargetKind::Function))?))
}

// ============================================================================
// SECTION: Responses
// ============================================================================

/// Builds a generic success response.
///
/// The result is not inspected; an occurrence-shaped result is decoded as a
/// query result when the message is parsed again.
#[must_use]
pub fn success(id: impl Into<Id>, result: Value) -> ScipMessage {
    ScipMessage::Response(ScipResponse::Success {
        id: id.into(),
        result,
    })
}

/// Builds a success response from a raw result, applying the same
/// query-result detection as [`crate::parse`].
#[must_use]
pub fn success_from_value(id: impl Into<Id>, result: &Value) -> ScipMessage {
    let id = id.into();
    match parser::parse_query_result(result) {
        Ok(result) => ScipMessage::Response(ScipResponse::QueryResult {
            id,
            result,
        }),
        Err(_) => success(id, result.clone()),
    }
}

/// Builds a query result response.
///
/// # Errors
///
/// Returns [`ProtocolError`] when an occurrence parameter carries no value.
pub fn query_result(id: impl Into<Id>, result: QueryResult) -> Result<ScipMessage, ProtocolError> {
    parser::parse_query_result(&encode(&result)?)?;
    Ok(ScipMessage::Response(ScipResponse::QueryResult {
        id: id.into(),
        result,
    }))
}

/// Builds a query result response from a raw result.
///
/// # Errors
///
/// Returns [`ProtocolError`] when the result does not hold valid occurrences.
pub fn query_result_from_value(
    id: impl Into<Id>,
    result: &Value,
) -> Result<ScipMessage, ProtocolError> {
    Ok(ScipMessage::Response(ScipResponse::QueryResult {
        id: id.into(),
        result: parser::parse_query_result(result)?,
    }))
}

/// Builds an error response.
///
/// # Errors
///
/// Returns [`ProtocolError`] when the code is not strictly negative.
pub fn error(id: impl Into<Id>, error: ErrorObject) -> Result<ScipMessage, ProtocolError> {
    ErrorObject::from_value(&encode(&error)?)?;
    Ok(error_response(id.into(), error))
}

/// Builds an error response from a raw error object.
///
/// # Errors
///
/// Returns [`ProtocolError`] when the code is not a negative integer or the
/// message is not a string.
pub fn error_from_value(id: impl Into<Id>, value: &Value) -> Result<ScipMessage, ProtocolError> {
    Ok(error_response(id.into(), ErrorObject::from_value(value)?))
}

/// Builds a `ReceiveCallback` notification.
///
/// # Errors
///
/// Returns [`ProtocolError`] when a parameter carries no value.
pub fn callback(params: Callback) -> Result<ScipMessage, ProtocolError> {
    parser::parse_callback(&encode(&params)?)?;
    Ok(ScipMessage::Response(ScipResponse::Callback(params)))
}

/// Builds a `ReceiveCallback` notification from raw params.
///
/// # Errors
///
/// Returns [`ProtocolError`] when the params are not a valid callback.
pub fn callback_from_value(params: &Value) -> Result<ScipMessage, ProtocolError> {
    Ok(ScipMessage::Response(ScipResponse::Callback(parser::parse_callback(params)?)))
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Encodes a typed payload for the shared payload parsers.
fn encode<T: Serialize>(payload: &T) -> Result<Value, ProtocolError> {
    serde_json::to_value(payload)
        .map_err(|err| ProtocolError::parse(format!("Payload cannot be encoded: {err}")))
}

/// Validates a typed subscription against the expected target kind.
fn checked_subscribe(
    id: Id,
    params: Subscription,
    kind: TargetKind,
) -> Result<ScipMessage, ProtocolError> {
    parser::parse_subscription(&encode(&params)?, Some(kind))?;
    Ok(subscribe(id, params))
}

/// Validates a typed unsubscription against the expected target kind.
fn checked_unsubscribe(
    id: Id,
    params: Unsubscription,
    kind: TargetKind,
) -> Result<ScipMessage, ProtocolError> {
    parser::parse_unsubscription(&encode(&params)?, Some(kind))?;
    Ok(unsubscribe(id, params))
}

/// Validates a typed query against the expected target kind.
fn checked_query(id: Id, params: Query, kind: TargetKind) -> Result<ScipMessage, ProtocolError> {
    parser::parse_query(&encode(&params)?, Some(kind))?;
    Ok(query(id, params))
}

/// Wraps invocation params.
const fn invocation(id: Id, params: Invocation) -> ScipMessage {
    ScipMessage::Request(ScipRequest::Invoke {
        id,
        params,
    })
}

/// Wraps an error triple.
const fn error_response(id: Id, error: ErrorObject) -> ScipMessage {
    ScipMessage::Response(ScipResponse::Error {
        id,
        error,
    })
}

/// Wraps subscription params.
const fn subscribe(id: Id, params: Subscription) -> ScipMessage {
    ScipMessage::Request(ScipRequest::Subscribe {
        id,
        params,
    })
}

/// Wraps unsubscription params.
const fn unsubscribe(id: Id, params: Unsubscription) -> ScipMessage {
    ScipMessage::Request(ScipRequest::Unsubscribe {
        id,
        params,
    })
}

/// Wraps query params.
const fn query(id: Id, params: Query) -> ScipMessage {
    ScipMessage::Request(ScipRequest::Query {
        id,
        params,
    })
}
