// crates/toolscip-core/src/message.rs
// ============================================================================
// Module: SCIP Messages
// Description: Tagged union of every SCIP request, response and notification.
// Purpose: Give callers one value to match on after parsing.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! A [`ScipMessage`] is either a [`ScipRequest`] (sent to a gateway) or a
//! [`ScipResponse`] (returned or pushed by a gateway). Callback notifications
//! count as responses. Gateway-reported failures are the
//! [`ScipResponse::Error`] variant, an ordinary value rather than a Rust error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde_json::Value;

use crate::jsonrpc::Envelope;
use crate::jsonrpc::ErrorObject;
use crate::jsonrpc::Id;
use crate::types::CALLBACK_METHOD;
use crate::types::Callback;
use crate::types::Invocation;
use crate::types::Query;
use crate::types::QueryResult;
use crate::types::Subscription;
use crate::types::Unsubscription;

// ============================================================================
// SECTION: Message Kind
// ============================================================================

/// Stable name of each parsed message shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// `Invoke` request.
    Invocation,
    /// `Subscribe` request.
    Subscription,
    /// `Unsubscribe` request.
    Unsubscription,
    /// `Query` request.
    Query,
    /// `ReceiveCallback` notification.
    Callback,
    /// Generic success response.
    Success,
    /// Success response carrying occurrences.
    QueryResult,
    /// Error response.
    Error,
}

impl MessageKind {
    /// Returns the stable kind name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Invocation => "ScipInvocation",
            Self::Subscription => "ScipSubscription",
            Self::Unsubscription => "ScipUnsubscription",
            Self::Query => "ScipQuery",
            Self::Callback => "ScipCallback",
            Self::Success => "ScipSuccess",
            Self::QueryResult => "ScipQueryResult",
            Self::Error => "ScipError",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Requests
// ============================================================================

/// SCIP request addressed to a gateway.
#[derive(Debug, Clone, PartialEq)]
pub enum ScipRequest {
    /// `Invoke` a contract function.
    Invoke {
        /// JSON-RPC identifier.
        id: Id,
        /// Invocation payload.
        params: Invocation,
    },
    /// `Subscribe` to an event or function.
    Subscribe {
        /// JSON-RPC identifier.
        id: Id,
        /// Subscription payload.
        params: Subscription,
    },
    /// `Unsubscribe` from an event or function.
    Unsubscribe {
        /// JSON-RPC identifier.
        id: Id,
        /// Unsubscription payload.
        params: Unsubscription,
    },
    /// `Query` past occurrences.
    Query {
        /// JSON-RPC identifier.
        id: Id,
        /// Query payload.
        params: Query,
    },
}

impl ScipRequest {
    /// Returns the JSON-RPC method name.
    #[must_use]
    pub const fn method(&self) -> &'static str {
        match self {
            Self::Invoke { .. } => "Invoke",
            Self::Subscribe { .. } => "Subscribe",
            Self::Unsubscribe { .. } => "Unsubscribe",
            Self::Query { .. } => "Query",
        }
    }

    /// Returns the JSON-RPC identifier.
    #[must_use]
    pub const fn id(&self) -> &Id {
        match self {
            Self::Invoke { id, .. }
            | Self::Subscribe { id, .. }
            | Self::Unsubscribe { id, .. }
            | Self::Query { id, .. } => id,
        }
    }

    /// Returns the message kind.
    #[must_use]
    pub const fn kind(&self) -> MessageKind {
        match self {
            Self::Invoke { .. } => MessageKind::Invocation,
            Self::Subscribe { .. } => MessageKind::Subscription,
            Self::Unsubscribe { .. } => MessageKind::Unsubscription,
            Self::Query { .. } => MessageKind::Query,
        }
    }

    /// Returns the correlation identifier, when the payload carries one.
    #[must_use]
    pub fn corr_id(&self) -> Option<&str> {
        match self {
            Self::Invoke { params, .. } => params.corr_id.as_deref(),
            Self::Subscribe { params, .. } => params.corr_id.as_deref(),
            Self::Unsubscribe { params, .. } => params.corr_id.as_deref(),
            Self::Query { .. } => None,
        }
    }

    /// Encodes the params payload as a JSON value.
    #[must_use]
    pub fn params_value(&self) -> Value {
        let encoded = match self {
            Self::Invoke { params, .. } => serde_json::to_value(params),
            Self::Subscribe { params, .. } => serde_json::to_value(params),
            Self::Unsubscribe { params, .. } => serde_json::to_value(params),
            Self::Query { params, .. } => serde_json::to_value(params),
        };
        encoded.unwrap_or(Value::Null)
    }

    /// Wraps the request in a JSON-RPC envelope.
    #[must_use]
    pub fn to_envelope(&self) -> Envelope {
        Envelope::Request {
            id: self.id().clone(),
            method: self.method().to_string(),
            params: self.params_value(),
        }
    }
}

// ============================================================================
// SECTION: Responses
// ============================================================================

/// SCIP response or notification emitted by a gateway.
#[derive(Debug, Clone, PartialEq)]
pub enum ScipResponse {
    /// Asynchronous `ReceiveCallback` notification.
    Callback(Callback),
    /// Generic success.
    Success {
        /// Identifier of the answered request.
        id: Id,
        /// Opaque result.
        result: Value,
    },
    /// Query success carrying occurrences.
    QueryResult {
        /// Identifier of the answered request.
        id: Id,
        /// Matching occurrences.
        result: QueryResult,
    },
    /// Gateway-reported failure.
    Error {
        /// Identifier of the answered request.
        id: Id,
        /// Error triple.
        error: ErrorObject,
    },
}

impl ScipResponse {
    /// Returns the identifier of the answered request; callbacks have none.
    #[must_use]
    pub const fn id(&self) -> Option<&Id> {
        match self {
            Self::Callback(_) => None,
            Self::Success { id, .. } | Self::QueryResult { id, .. } | Self::Error { id, .. } => Some(id),
        }
    }

    /// Returns the message kind.
    #[must_use]
    pub const fn kind(&self) -> MessageKind {
        match self {
            Self::Callback(_) => MessageKind::Callback,
            Self::Success { .. } => MessageKind::Success,
            Self::QueryResult { .. } => MessageKind::QueryResult,
            Self::Error { .. } => MessageKind::Error,
        }
    }

    /// Returns the error triple of an error response.
    #[must_use]
    pub const fn error(&self) -> Option<&ErrorObject> {
        match self {
            Self::Error { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Wraps the response in a JSON-RPC envelope.
    #[must_use]
    pub fn to_envelope(&self) -> Envelope {
        match self {
            Self::Callback(callback) => Envelope::Notification {
                method: CALLBACK_METHOD.to_string(),
                params: serde_json::to_value(callback).unwrap_or(Value::Null),
            },
            Self::Success {
                id,
                result,
            } => Envelope::Success {
                id: id.clone(),
                result: result.clone(),
            },
            Self::QueryResult {
                id,
                result,
            } => Envelope::Success {
                id: id.clone(),
                result: serde_json::to_value(result).unwrap_or(Value::Null),
            },
            Self::Error {
                id,
                error,
            } => Envelope::Error {
                id: id.clone(),
                error: error.clone(),
            },
        }
    }
}

// ============================================================================
// SECTION: Messages
// ============================================================================

/// Any parsed SCIP message.
#[derive(Debug, Clone, PartialEq)]
pub enum ScipMessage {
    /// Request addressed to a gateway.
    Request(ScipRequest),
    /// Response or notification from a gateway.
    Response(ScipResponse),
}

impl ScipMessage {
    /// Returns the message kind.
    #[must_use]
    pub const fn kind(&self) -> MessageKind {
        match self {
            Self::Request(request) => request.kind(),
            Self::Response(response) => response.kind(),
        }
    }

    /// Returns the JSON-RPC identifier; callbacks have none.
    #[must_use]
    pub const fn id(&self) -> Option<&Id> {
        match self {
            Self::Request(request) => Some(request.id()),
            Self::Response(response) => response.id(),
        }
    }

    /// Wraps the message in a JSON-RPC envelope.
    #[must_use]
    pub fn to_envelope(&self) -> Envelope {
        match self {
            Self::Request(request) => request.to_envelope(),
            Self::Response(response) => response.to_envelope(),
        }
    }

    /// Encodes the message as a JSON-RPC JSON value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        self.to_envelope().to_value()
    }

    /// Encodes the message as compact JSON text.
    #[must_use]
    pub fn to_json_string(&self) -> String {
        self.to_value().to_string()
    }
}

impl From<ScipRequest> for ScipMessage {
    fn from(request: ScipRequest) -> Self {
        Self::Request(request)
    }
}

impl From<ScipResponse> for ScipMessage {
    fn from(response: ScipResponse) -> Self {
        Self::Response(response)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
