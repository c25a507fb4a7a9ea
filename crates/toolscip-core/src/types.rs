// crates/toolscip-core/src/types.rs
// ============================================================================
// Module: SCIP Payload Types
// Description: Typed params/result payloads of every SCIP message kind.
// Purpose: Model invocations, subscriptions, queries, callbacks and errors.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Event and function variants of the subscription, unsubscription and query
//! payloads share one struct each and differ only in their [`Target`]. On the
//! wire the target is the `functionId` or `eventId` member, never both.
//!
//! The SCIP error catalog is exposed as [`ScipErrorKind`] plus one named
//! constructor per entry on [`ScipErrorObject`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Serialize;
use serde_json::Number;
use serde_json::Value;

use crate::error::ProtocolError;
use crate::jsonrpc::ErrorObject;
use crate::parameter::Parameter;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Signature algorithm used when none is supplied.
pub const DEFAULT_SIGNATURE: &str = "sha256";
/// Notification method carrying asynchronous callbacks.
pub const CALLBACK_METHOD: &str = "ReceiveCallback";

// ============================================================================
// SECTION: Targets
// ============================================================================

/// Which kind of contract member a payload addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// A contract function (`functionId`).
    Function,
    /// A contract event (`eventId`).
    Event,
}

impl TargetKind {
    /// Returns the wire member carrying the identifier.
    #[must_use]
    pub const fn field(self) -> &'static str {
        match self {
            Self::Function => "functionId",
            Self::Event => "eventId",
        }
    }

    /// Returns a stable lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Event => "event",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The addressed contract member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Target {
    /// Function identifier.
    #[serde(rename = "functionId")]
    Function(String),
    /// Event identifier.
    #[serde(rename = "eventId")]
    Event(String),
}

impl Target {
    /// Returns the target kind.
    #[must_use]
    pub const fn kind(&self) -> TargetKind {
        match self {
            Self::Function(_) => TargetKind::Function,
            Self::Event(_) => TargetKind::Event,
        }
    }

    /// Returns the member identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Function(id) | Self::Event(id) => id,
        }
    }

    /// Narrows the target to the expected kind.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidRequest`] when the target addresses the
    /// other kind of member.
    pub fn expect(&self, kind: TargetKind) -> Result<&str, ProtocolError> {
        if self.kind() == kind {
            Ok(self.id())
        } else {
            Err(ProtocolError::invalid_request(format!(
                "Expected a payload with \"{}\", found \"{}\" instead!",
                kind.field(),
                self.kind().field()
            )))
        }
    }
}

// ============================================================================
// SECTION: Request Payloads
// ============================================================================

/// Params of an `Invoke` request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Invocation {
    /// Invoked function.
    pub function_id: String,
    /// Bound input values.
    pub inputs: Vec<Parameter>,
    /// Declared return parameters.
    pub outputs: Vec<Parameter>,
    /// Signature algorithm.
    pub signature: String,
    /// Endpoint receiving the asynchronous result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback: Option<String>,
    /// Correlation identifier echoed by callbacks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corr_id: Option<String>,
    /// Degree of confidence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<Number>,
    /// Gateway-side timeout in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<i64>,
}

impl Invocation {
    /// Creates an invocation with the default signature and no options.
    #[must_use]
    pub fn new(function_id: impl Into<String>, inputs: Vec<Parameter>, outputs: Vec<Parameter>) -> Self {
        Self {
            function_id: function_id.into(),
            inputs,
            outputs,
            signature: DEFAULT_SIGNATURE.to_string(),
            callback: None,
            corr_id: None,
            doc: None,
            timeout: None,
        }
    }
}

/// Params of a `Subscribe` request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    /// Observed event or function.
    #[serde(flatten)]
    pub target: Target,
    /// Declared parameters, optionally with filter values.
    pub params: Vec<Parameter>,
    /// Endpoint receiving callbacks.
    pub callback: String,
    /// Correlation identifier echoed by callbacks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corr_id: Option<String>,
    /// Degree of confidence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<Number>,
    /// Gateway-evaluated filter expression.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl Subscription {
    /// Creates a subscription without optional members.
    #[must_use]
    pub fn new(target: Target, params: Vec<Parameter>, callback: impl Into<String>) -> Self {
        Self {
            target,
            params,
            callback: callback.into(),
            corr_id: None,
            doc: None,
            filter: None,
        }
    }
}

/// Params of an `Unsubscribe` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Unsubscription {
    /// Event or function to stop observing.
    #[serde(flatten)]
    pub target: Target,
    /// Declared parameters of the original subscription.
    pub params: Vec<Parameter>,
    /// Correlation identifier of the original subscription.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corr_id: Option<String>,
}

impl Unsubscription {
    /// Creates an unsubscription without a correlation identifier.
    #[must_use]
    pub const fn new(target: Target, params: Vec<Parameter>) -> Self {
        Self {
            target,
            params,
            corr_id: None,
        }
    }
}

/// Params of a `Query` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    /// Queried event or function.
    #[serde(flatten)]
    pub target: Target,
    /// Declared parameters, optionally with filter values.
    pub params: Vec<Parameter>,
    /// Gateway-evaluated filter expression.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    /// Lower time bound; ordering against `end_time` is left to the gateway.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    /// Upper time bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

impl Query {
    /// Creates a query without optional members.
    #[must_use]
    pub const fn new(target: Target, params: Vec<Parameter>) -> Self {
        Self {
            target,
            params,
            filter: None,
            start_time: None,
            end_time: None,
        }
    }
}

// ============================================================================
// SECTION: Response Payloads
// ============================================================================

/// One past event emission or function invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occurrence {
    /// Reported parameter values.
    pub params: Vec<Parameter>,
    /// Occurrence timestamp.
    pub timestamp: String,
}

/// Result member of a query response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryResult {
    /// Matching occurrences.
    pub occurrences: Vec<Occurrence>,
}

/// Params of a `ReceiveCallback` notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Callback {
    /// Reported parameter values.
    pub params: Vec<Parameter>,
    /// Emission timestamp.
    pub timestamp: String,
    /// Correlation identifier of the originating request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corr_id: Option<String>,
}

// ============================================================================
// SECTION: Error Catalog
// ============================================================================

/// Error triple of a SCIP error response.
pub type ScipErrorObject = ErrorObject;

/// Named SCIP error kinds reported by gateways.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScipErrorKind {
    /// `-32000`
    NotFound,
    /// `-32001`
    InvalidParameters,
    /// `-32002`
    MissingCertificate,
    /// `-32003`
    NotAuthorized,
    /// `-32004`
    NotSupported,
    /// `-32005`
    ConnectionException,
    /// `-32006`
    TransactionInvalidatedException,
    /// `-32007`
    InvalidScipParam,
    /// `-32100`
    InvocationError,
    /// `-32101`
    ExecutionError,
    /// `-32102`
    InsufficientFunds,
    /// `-32103`
    BalNotAuthorized,
    /// `-32201`
    Timeout,
}

impl ScipErrorKind {
    /// Every catalog entry in code order.
    pub const ALL: [Self; 13] = [
        Self::NotFound,
        Self::InvalidParameters,
        Self::MissingCertificate,
        Self::NotAuthorized,
        Self::NotSupported,
        Self::ConnectionException,
        Self::TransactionInvalidatedException,
        Self::InvalidScipParam,
        Self::InvocationError,
        Self::ExecutionError,
        Self::InsufficientFunds,
        Self::BalNotAuthorized,
        Self::Timeout,
    ];

    /// Returns the wire code.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::NotFound => -32000,
            Self::InvalidParameters => -32001,
            Self::MissingCertificate => -32002,
            Self::NotAuthorized => -32003,
            Self::NotSupported => -32004,
            Self::ConnectionException => -32005,
            Self::TransactionInvalidatedException => -32006,
            Self::InvalidScipParam => -32007,
            Self::InvocationError => -32100,
            Self::ExecutionError => -32101,
            Self::InsufficientFunds => -32102,
            Self::BalNotAuthorized => -32103,
            Self::Timeout => -32201,
        }
    }

    /// Returns the canonical message.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotFound => "Not Found",
            Self::InvalidParameters => "Invalid Parameters",
            Self::MissingCertificate => "Missing Certificate",
            Self::NotAuthorized => "Not Authorized",
            Self::NotSupported => "Not Supported",
            Self::ConnectionException => "Connection Exception",
            Self::TransactionInvalidatedException => "Transaction Invalidated Exception",
            Self::InvalidScipParam => "Invalid Scip Parameter",
            Self::InvocationError => "Invocation Error",
            Self::ExecutionError => "Execution Error",
            Self::InsufficientFunds => "Insufficient Funds",
            Self::BalNotAuthorized => "Bal Not Authorized",
            Self::Timeout => "Timeout",
        }
    }

    /// Looks a catalog entry up by wire code.
    #[must_use]
    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }

    /// Builds the error triple for this kind.
    #[must_use]
    pub fn to_error_object(self, data: Option<Value>) -> ScipErrorObject {
        ErrorObject::new(self.code(), self.message(), data)
    }
}

impl fmt::Display for ScipErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl ErrorObject {
    /// Returns the catalog entry matching this code, if any.
    #[must_use]
    pub fn kind(&self) -> Option<ScipErrorKind> {
        ScipErrorKind::from_code(self.code)
    }

    /// `-32000 Not Found`.
    #[must_use]
    pub fn not_found(data: Option<Value>) -> Self {
        ScipErrorKind::NotFound.to_error_object(data)
    }

    /// `-32001 Invalid Parameters`.
    #[must_use]
    pub fn invalid_parameters(data: Option<Value>) -> Self {
        ScipErrorKind::InvalidParameters.to_error_object(data)
    }

    /// `-32002 Missing Certificate`.
    #[must_use]
    pub fn missing_certificate(data: Option<Value>) -> Self {
        ScipErrorKind::MissingCertificate.to_error_object(data)
    }

    /// `-32003 Not Authorized`.
    #[must_use]
    pub fn not_authorized(data: Option<Value>) -> Self {
        ScipErrorKind::NotAuthorized.to_error_object(data)
    }

    /// `-32004 Not Supported`.
    #[must_use]
    pub fn not_supported(data: Option<Value>) -> Self {
        ScipErrorKind::NotSupported.to_error_object(data)
    }

    /// `-32005 Connection Exception`.
    #[must_use]
    pub fn connection_exception(data: Option<Value>) -> Self {
        ScipErrorKind::ConnectionException.to_error_object(data)
    }

    /// `-32006 Transaction Invalidated Exception`.
    #[must_use]
    pub fn transaction_invalidated_exception(data: Option<Value>) -> Self {
        ScipErrorKind::TransactionInvalidatedException.to_error_object(data)
    }

    /// `-32007 Invalid Scip Parameter`.
    #[must_use]
    pub fn invalid_scip_param(data: Option<Value>) -> Self {
        ScipErrorKind::InvalidScipParam.to_error_object(data)
    }

    /// `-32100 Invocation Error`.
    #[must_use]
    pub fn invocation_error(data: Option<Value>) -> Self {
        ScipErrorKind::InvocationError.to_error_object(data)
    }

    /// `-32101 Execution Error`.
    #[must_use]
    pub fn execution_error(data: Option<Value>) -> Self {
        ScipErrorKind::ExecutionError.to_error_object(data)
    }

    /// `-32102 Insufficient Funds`.
    #[must_use]
    pub fn insufficient_funds(data: Option<Value>) -> Self {
        ScipErrorKind::InsufficientFunds.to_error_object(data)
    }

    /// `-32103 Bal Not Authorized`.
    #[must_use]
    pub fn bal_not_authorized(data: Option<Value>) -> Self {
        ScipErrorKind::BalNotAuthorized.to_error_object(data)
    }

    /// `-32201 Timeout`.
    #[must_use]
    pub fn timeout(data: Option<Value>) -> Self {
        ScipErrorKind::Timeout.to_error_object(data)
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
    use crate::parameter::AbstractType;

    #[test]
    fn catalog_codes_are_unique_and_negative() {
        for kind in ScipErrorKind::ALL {
            assert!(kind.code() < 0);
            assert_eq!(ScipErrorKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(ScipErrorKind::from_code(-1), None);
    }

    #[test]
    fn named_constructor_matches_catalog() {
        let err = ScipErrorObject::insufficient_funds(Some(json!("balance too low")));
        assert_eq!(err.code, -32102);
        assert_eq!(err.message, "Insufficient Funds");
        assert_eq!(err.kind(), Some(ScipErrorKind::InsufficientFunds));
    }

    #[test]
    fn target_serializes_as_identifier_member() {
        let query = Query::new(Target::Event("Transfer".to_string()), Vec::new());
        assert_eq!(serde_json::to_value(&query).unwrap(), json!({"eventId": "Transfer", "params": []}));
    }

    #[test]
    fn target_expect_rejects_other_kind() {
        let target = Target::Function("balanceOf".to_string());
        assert_eq!(target.expect(TargetKind::Function).unwrap(), "balanceOf");
        let err = target.expect(TargetKind::Event).unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidRequest(_)));
    }

    #[test]
    fn invocation_serializes_camel_case_members() {
        let mut invocation = Invocation::new(
            "balanceOf",
            vec![Parameter::valued("_owner", AbstractType::new("string"), json!("0x01"))],
            Vec::new(),
        );
        invocation.corr_id = Some("c-1".to_string());
        let value = serde_json::to_value(&invocation).unwrap();
        assert_eq!(value["functionId"], json!("balanceOf"));
        assert_eq!(value["corrId"], json!("c-1"));
        assert_eq!(value["signature"], json!("sha256"));
        assert!(value.get("callback").is_none());
    }
}
