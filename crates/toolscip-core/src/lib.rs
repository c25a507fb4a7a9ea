// crates/toolscip-core/src/lib.rs
// ============================================================================
// Module: Toolscip Core Library
// Description: Smart Contract Invocation Protocol (SCIP) message model.
// Purpose: Parse, validate, and construct SCIP messages over JSON-RPC 2.0.
// Dependencies: serde, serde_json, thiserror, url
// ============================================================================

//! ## Overview
//! `toolscip-core` implements the SCIP message model: the abstract
//! [`Parameter`] value type, the field-level validation layer, the typed
//! request/response/notification payloads, and the dispatcher that turns an
//! arbitrary decoded JSON value into a [`ScipMessage`].
//!
//! Invariants:
//! - Every Subscribe/Unsubscribe/Query payload carries exactly one of
//!   `functionId` or `eventId`.
//! - Envelope version must be exactly `"2.0"`.
//! - Error objects always carry a strictly negative integer code.
//!
//! Decode failures surface as [`ProtocolError`]; gateway-reported business
//! failures are ordinary [`ScipResponse::Error`] values.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod construct;
pub mod error;
pub mod jsonrpc;
pub mod message;
pub mod parameter;
pub mod parser;
pub mod types;
pub mod validation;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use construct::*;
pub use error::INTERNAL_ERROR_CODE;
pub use error::INTERNAL_ERROR_MESSAGE;
pub use error::INVALID_PARAMS_CODE;
pub use error::INVALID_PARAMS_MESSAGE;
pub use error::INVALID_REQUEST_CODE;
pub use error::INVALID_REQUEST_MESSAGE;
pub use error::METHOD_NOT_FOUND_CODE;
pub use error::METHOD_NOT_FOUND_MESSAGE;
pub use error::PARSE_ERROR_CODE;
pub use error::PARSE_ERROR_MESSAGE;
pub use error::ProtocolError;
pub use jsonrpc::Envelope;
pub use jsonrpc::ErrorObject;
pub use jsonrpc::Id;
pub use jsonrpc::JSONRPC_VERSION;
pub use jsonrpc::decode_envelope;
pub use message::MessageKind;
pub use message::ScipMessage;
pub use message::ScipRequest;
pub use message::ScipResponse;
pub use parameter::AbstractType;
pub use parameter::Parameter;
pub use parser::parse;
pub use parser::parse_request;
pub use parser::parse_response;
pub use parser::parse_str;
pub use types::CALLBACK_METHOD;
pub use types::Callback;
pub use types::DEFAULT_SIGNATURE;
pub use types::Invocation;
pub use types::Occurrence;
pub use types::Query;
pub use types::QueryResult;
pub use types::ScipErrorKind;
pub use types::ScipErrorObject;
pub use types::Subscription;
pub use types::Target;
pub use types::TargetKind;
pub use types::Unsubscription;
pub use validation::ParamRules;
pub use validation::Presence;
