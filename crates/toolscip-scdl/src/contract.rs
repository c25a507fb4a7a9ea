// crates/toolscip-scdl/src/contract.rs
// ============================================================================
// Module: SCDL Contract Binder
// Description: Method and event binders built from a validated descriptor.
// Purpose: Build, check, send, and audit SCIP requests for one contract.
// Dependencies: toolscip-core, toolscip-config, serde_json, thiserror
// ============================================================================

//! ## Overview
//! A [`Contract`] owns one [`Method`] per declared function and one
//! [`Event`] per declared event. Every binder shares a single gateway handle:
//! the descriptor's `scl` endpoint, the transport, the audit sink, and the
//! bearer token. Rotating the token through [`Contract::update_auth`] is seen
//! by every binder already handed out.
//!
//! Each operation exists as a pure `*_request` builder and as a sending form.
//! Built requests are re-checked with the SCIP parser before they leave the
//! process, so a bad callback URL or empty correlation id fails locally.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::PoisonError;
use std::sync::RwLock;

use serde_json::Number;
use serde_json::Value;
use thiserror::Error;
use toolscip_config::GatewayConfig;
use toolscip_config::ScipClientConfig;
use toolscip_core::ErrorObject;
use toolscip_core::INTERNAL_ERROR_CODE;
use toolscip_core::INTERNAL_ERROR_MESSAGE;
use toolscip_core::Id;
use toolscip_core::Invocation;
use toolscip_core::METHOD_NOT_FOUND_CODE;
use toolscip_core::METHOD_NOT_FOUND_MESSAGE;
use toolscip_core::Parameter;
use toolscip_core::ProtocolError;
use toolscip_core::Query;
use toolscip_core::ScipMessage;
use toolscip_core::ScipRequest;
use toolscip_core::ScipResponse;
use toolscip_core::Subscription;
use toolscip_core::Target;
use toolscip_core::TargetKind;
use toolscip_core::Unsubscription;

use crate::audit::GatewayAuditEvent;
use crate::audit::GatewayAuditEventParams;
use crate::audit::GatewayAuditSink;
use crate::audit::NoopAuditSink;
use crate::audit::RequestState;
use crate::audit::sink_from_config;
use crate::binding::Arity;
use crate::binding::BindingError;
use crate::binding::convert_params;
use crate::binding::create_params;
use crate::descriptor::Scdl;
use crate::descriptor::ScdlEvent;
use crate::descriptor::ScdlFunction;
use crate::descriptor::ValidationError;
use crate::descriptor::validate_descriptor;
use crate::transport::GatewayTransport;
use crate::transport::HttpGatewayTransport;
use crate::transport::TransportError;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Contract construction and request failures.
#[derive(Debug, Error)]
pub enum ContractError {
    /// The descriptor failed schema validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Positional values did not fit the declared parameters.
    #[error(transparent)]
    Binding(#[from] BindingError),
    /// The built request is not a valid SCIP message.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    /// Delivery to the gateway failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The configured audit sink could not be opened.
    #[error("audit sink error: {0}")]
    Audit(String),
    /// No function with the requested name.
    #[error(
        "Method named '{name}' not found in '{contract}' contract\nThis contract has the \
         following available methods: [{}]",
        .available.join(", ")
    )]
    UnknownMethod {
        /// Requested name.
        name: String,
        /// Contract name.
        contract: String,
        /// Declared function names.
        available: Vec<String>,
    },
    /// No event with the requested name.
    #[error(
        "Event named '{name}' not found in '{contract}' contract\nThis contract has the \
         following available events: [{}]",
        .available.join(", ")
    )]
    UnknownEvent {
        /// Requested name.
        name: String,
        /// Contract name.
        contract: String,
        /// Declared event names.
        available: Vec<String>,
    },
}

impl ContractError {
    /// Returns the JSON-RPC error code of the underlying failure.
    #[must_use]
    pub const fn code(&self) -> i64 {
        match self {
            Self::Validation(err) => err.code(),
            Self::Binding(err) => err.code(),
            Self::Protocol(err) => err.code(),
            Self::Transport(err) => err.code(),
            Self::Audit(_) => INTERNAL_ERROR_CODE,
            Self::UnknownMethod { .. } | Self::UnknownEvent { .. } => METHOD_NOT_FOUND_CODE,
        }
    }

    /// Returns the canonical message paired with [`Self::code`].
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Validation(err) => err.message(),
            Self::Binding(err) => err.message(),
            Self::Protocol(err) => err.message(),
            Self::Transport(err) => err.message(),
            Self::Audit(_) => INTERNAL_ERROR_MESSAGE,
            Self::UnknownMethod { .. } | Self::UnknownEvent { .. } => METHOD_NOT_FOUND_MESSAGE,
        }
    }

    /// Returns the diagnostic payload.
    #[must_use]
    pub fn data(&self) -> Value {
        match self {
            Self::Validation(err) => err.data(),
            Self::Binding(err) => Value::String(err.data().to_string()),
            Self::Protocol(err) => Value::String(err.data().to_string()),
            Self::Transport(err) => Value::String(err.data()),
            Self::Audit(detail) => Value::String(detail.clone()),
            Self::UnknownMethod { .. } | Self::UnknownEvent { .. } => Value::String(self.to_string()),
        }
    }

    /// Converts the failure into a JSON-RPC error object.
    #[must_use]
    pub fn to_error_object(&self) -> ErrorObject {
        ErrorObject::new(self.code(), self.message(), Some(self.data()))
    }
}

// ============================================================================
// SECTION: Options
// ============================================================================

/// Optional invocation metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvokeOptions {
    /// Signature algorithm; `sha256` when unset.
    pub signature: Option<String>,
    /// Callback URL for asynchronous results.
    pub callback: Option<String>,
    /// Correlation identifier.
    pub corr_id: Option<String>,
    /// Degree of confidence.
    pub doc: Option<Number>,
    /// Gateway-side timeout in seconds.
    pub timeout: Option<i64>,
}

/// Subscription metadata; the callback is mandatory.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscribeOptions {
    /// Callback URL notified on each occurrence.
    pub callback: String,
    /// Correlation identifier.
    pub corr_id: Option<String>,
    /// Degree of confidence.
    pub doc: Option<Number>,
    /// Occurrence filter expression.
    pub filter: Option<String>,
}

impl SubscribeOptions {
    /// Creates options with only the callback set.
    #[must_use]
    pub fn new(callback: impl Into<String>) -> Self {
        Self {
            callback: callback.into(),
            corr_id: None,
            doc: None,
            filter: None,
        }
    }
}

/// Optional query bounds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Occurrence filter expression.
    pub filter: Option<String>,
    /// Inclusive lower time bound.
    pub start_time: Option<String>,
    /// Inclusive upper time bound.
    pub end_time: Option<String>,
}

// ============================================================================
// SECTION: Gateway Handle
// ============================================================================

/// Shared call target for every binder of one contract.
struct Gateway {
    /// Descriptor `scl` endpoint.
    endpoint: String,
    /// Request transport.
    transport: Arc<dyn GatewayTransport>,
    /// Audit sink.
    audit: Arc<dyn GatewayAuditSink>,
    /// Bearer token, rotated in place.
    authorization: RwLock<Option<String>>,
}

impl fmt::Debug for Gateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gateway").field("endpoint", &self.endpoint).finish_non_exhaustive()
    }
}

impl Gateway {
    /// Returns the current bearer token.
    fn token(&self) -> Option<String> {
        self.authorization.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Posts a checked request and records one audit event.
    fn send(
        &self,
        request: &ScipRequest,
        kind: TargetKind,
        target: &str,
    ) -> Result<Value, ContractError> {
        let body = request.to_envelope().to_value();
        let request_bytes = encoded_len(&body);
        let token = self.token();
        let outcome = self.transport.post(&self.endpoint, &body, token.as_deref());
        let (state, error_code, error_kind, response_bytes) = match &outcome {
            Ok(response) => {
                let (state, code, kind) = classify_response(response);
                (state, code, kind, Some(encoded_len(response)))
            }
            Err(err) => (RequestState::Failed, None, Some(transport_error_label(err)), None),
        };
        self.audit.record(&GatewayAuditEvent::new(GatewayAuditEventParams {
            jsonrpc_id: request.id().to_string(),
            method: request.method(),
            target_kind: kind.as_str(),
            target: target.to_string(),
            endpoint: self.endpoint.clone(),
            corr_id: request.corr_id().map(str::to_string),
            state,
            error_code,
            error_kind,
            request_bytes,
            response_bytes,
        }));
        outcome.map_err(ContractError::from)
    }
}

// ============================================================================
// SECTION: Contract
// ============================================================================

/// Bound contract built from a validated SCDL descriptor.
///
/// # Invariants
/// - The descriptor is immutable once the contract exists.
/// - Later declarations with a duplicate name replace earlier ones.
#[derive(Debug, Clone)]
pub struct Contract {
    /// Validated descriptor.
    descriptor: Arc<Scdl>,
    /// Function binders keyed by name.
    methods: BTreeMap<String, Method>,
    /// Event binders keyed by name.
    events: BTreeMap<String, Event>,
    /// Shared gateway handle.
    gateway: Arc<Gateway>,
}

impl Contract {
    /// Validates `raw` and binds it to the default HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::Validation`] for an invalid descriptor and
    /// [`ContractError::Transport`] when the HTTP client cannot be built.
    pub fn new(raw: &Value, authorization: Option<String>) -> Result<Self, ContractError> {
        Self::from_scdl(validate_descriptor(raw)?, authorization)
    }

    /// Binds an already validated descriptor to the default HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::Transport`] when the HTTP client cannot be built.
    pub fn from_scdl(descriptor: Scdl, authorization: Option<String>) -> Result<Self, ContractError> {
        let transport = HttpGatewayTransport::new(&GatewayConfig::default())?;
        Ok(Self::assemble(descriptor, authorization, Arc::new(transport), Arc::new(NoopAuditSink)))
    }

    /// Validates `raw` and binds it using client configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] when validation fails, the HTTP client cannot
    /// be built, or the audit sink cannot be opened.
    pub fn from_config(
        raw: &Value,
        authorization: Option<String>,
        config: &ScipClientConfig,
    ) -> Result<Self, ContractError> {
        let descriptor = validate_descriptor(raw)?;
        let transport = HttpGatewayTransport::new(&config.gateway)?;
        let audit =
            sink_from_config(&config.audit).map_err(|err| ContractError::Audit(err.to_string()))?;
        Ok(Self::assemble(descriptor, authorization, Arc::new(transport), audit))
    }

    /// Validates `raw` and binds it to the given transport and audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::Validation`] for an invalid descriptor.
    pub fn with_transport(
        raw: &Value,
        authorization: Option<String>,
        transport: Arc<dyn GatewayTransport>,
        audit: Arc<dyn GatewayAuditSink>,
    ) -> Result<Self, ContractError> {
        Ok(Self::assemble(validate_descriptor(raw)?, authorization, transport, audit))
    }

    /// Builds every binder around one shared gateway handle.
    fn assemble(
        descriptor: Scdl,
        authorization: Option<String>,
        transport: Arc<dyn GatewayTransport>,
        audit: Arc<dyn GatewayAuditSink>,
    ) -> Self {
        let gateway = Arc::new(Gateway {
            endpoint: descriptor.scl.clone(),
            transport,
            audit,
            authorization: RwLock::new(authorization),
        });
        let methods = descriptor
            .functions
            .iter()
            .map(|function| {
                let method = Method {
                    function: function.clone(),
                    gateway: Arc::clone(&gateway),
                };
                (function.name.clone(), method)
            })
            .collect();
        let events = descriptor
            .events
            .iter()
            .map(|event| {
                let binder = Event {
                    event: event.clone(),
                    gateway: Arc::clone(&gateway),
                };
                (event.name.clone(), binder)
            })
            .collect();
        Self {
            descriptor: Arc::new(descriptor),
            methods,
            events,
            gateway,
        }
    }

    /// Returns the validated descriptor.
    #[must_use]
    pub fn descriptor(&self) -> &Scdl {
        &self.descriptor
    }

    /// Returns the function binders keyed by name.
    #[must_use]
    pub const fn methods(&self) -> &BTreeMap<String, Method> {
        &self.methods
    }

    /// Returns the event binders keyed by name.
    #[must_use]
    pub const fn events(&self) -> &BTreeMap<String, Event> {
        &self.events
    }

    /// Looks up a function binder.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::UnknownMethod`] listing the declared names.
    pub fn method(&self, name: &str) -> Result<&Method, ContractError> {
        self.methods.get(name).ok_or_else(|| ContractError::UnknownMethod {
            name: name.to_string(),
            contract: self.descriptor.name.clone(),
            available: self.methods.keys().cloned().collect(),
        })
    }

    /// Looks up an event binder.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::UnknownEvent`] listing the declared names.
    pub fn event(&self, name: &str) -> Result<&Event, ContractError> {
        self.events.get(name).ok_or_else(|| ContractError::UnknownEvent {
            name: name.to_string(),
            contract: self.descriptor.name.clone(),
            available: self.events.keys().cloned().collect(),
        })
    }

    /// Replaces the bearer token for every binder of this contract.
    pub fn update_auth(&self, authorization: Option<String>) {
        *self.gateway.authorization.write().unwrap_or_else(PoisonError::into_inner) =
            authorization;
    }

    /// Returns the current bearer token.
    #[must_use]
    pub fn authorization(&self) -> Option<String> {
        self.gateway.token()
    }
}

// ============================================================================
// SECTION: Method
// ============================================================================

/// Binder for one declared function.
#[derive(Debug, Clone)]
pub struct Method {
    /// Function declaration.
    function: ScdlFunction,
    /// Shared gateway handle.
    gateway: Arc<Gateway>,
}

impl Method {
    /// Returns the function name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.function.name
    }

    /// Returns the function declaration.
    #[must_use]
    pub const fn declaration(&self) -> &ScdlFunction {
        &self.function
    }

    /// Builds an `Invoke` request; every declared input needs a value.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::Binding`] on an arity mismatch and
    /// [`ContractError::Protocol`] when options are malformed.
    pub fn invoke_request(
        &self,
        id: impl Into<Id>,
        values: &[Value],
        options: InvokeOptions,
    ) -> Result<ScipMessage, ContractError> {
        Ok(self.build_invoke(id.into(), values, options)?.into())
    }

    /// Sends an `Invoke` request and returns the raw gateway response.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] when building or delivery fails.
    pub fn invoke(
        &self,
        id: impl Into<Id>,
        values: &[Value],
        options: InvokeOptions,
    ) -> Result<Value, ContractError> {
        let request = self.build_invoke(id.into(), values, options)?;
        self.gateway.send(&request, TargetKind::Function, &self.function.name)
    }

    /// Builds a function `Subscribe` request; inputs are all or none.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] on an arity mismatch or malformed options.
    pub fn subscribe_request(
        &self,
        id: impl Into<Id>,
        values: &[Value],
        options: SubscribeOptions,
    ) -> Result<ScipMessage, ContractError> {
        Ok(self.build_subscribe(id.into(), values, options)?.into())
    }

    /// Sends a function `Subscribe` request.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] when building or delivery fails.
    pub fn subscribe(
        &self,
        id: impl Into<Id>,
        values: &[Value],
        options: SubscribeOptions,
    ) -> Result<Value, ContractError> {
        let request = self.build_subscribe(id.into(), values, options)?;
        self.gateway.send(&request, TargetKind::Function, &self.function.name)
    }

    /// Builds a function `Unsubscribe` request from the declared inputs.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::Protocol`] when the correlation id is malformed.
    pub fn unsubscribe_request(
        &self,
        id: impl Into<Id>,
        corr_id: Option<String>,
    ) -> Result<ScipMessage, ContractError> {
        Ok(self.build_unsubscribe(id.into(), corr_id)?.into())
    }

    /// Sends a function `Unsubscribe` request.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] when building or delivery fails.
    pub fn unsubscribe(
        &self,
        id: impl Into<Id>,
        corr_id: Option<String>,
    ) -> Result<Value, ContractError> {
        let request = self.build_unsubscribe(id.into(), corr_id)?;
        self.gateway.send(&request, TargetKind::Function, &self.function.name)
    }

    /// Builds a function `Query` request; inputs are all or none.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] on an arity mismatch or malformed bounds.
    pub fn query_request(
        &self,
        id: impl Into<Id>,
        values: &[Value],
        options: QueryOptions,
    ) -> Result<ScipMessage, ContractError> {
        Ok(self.build_query(id.into(), values, options)?.into())
    }

    /// Sends a function `Query` request.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] when building or delivery fails.
    pub fn query(
        &self,
        id: impl Into<Id>,
        values: &[Value],
        options: QueryOptions,
    ) -> Result<Value, ContractError> {
        let request = self.build_query(id.into(), values, options)?;
        self.gateway.send(&request, TargetKind::Function, &self.function.name)
    }

    /// Binds inputs and outputs into a checked invocation.
    fn build_invoke(
        &self,
        id: Id,
        values: &[Value],
        options: InvokeOptions,
    ) -> Result<ScipRequest, ContractError> {
        let inputs = create_params(values, &self.function.inputs, Arity::Required)?;
        let outputs = convert_params(&self.function.outputs);
        let mut params = Invocation::new(self.function.name.clone(), inputs, outputs);
        if let Some(signature) = options.signature {
            params.signature = signature;
        }
        params.callback = options.callback;
        params.corr_id = options.corr_id;
        params.doc = options.doc;
        params.timeout = options.timeout;
        checked(ScipRequest::Invoke {
            id,
            params,
        })
    }

    /// Binds inputs into a checked subscription.
    fn build_subscribe(
        &self,
        id: Id,
        values: &[Value],
        options: SubscribeOptions,
    ) -> Result<ScipRequest, ContractError> {
        let target = Target::Function(self.function.name.clone());
        let bound = create_params(values, &self.function.inputs, Arity::Optional)?;
        checked(ScipRequest::Subscribe {
            id,
            params: subscription(target, bound, options),
        })
    }

    /// Builds a checked unsubscription from the declared inputs.
    fn build_unsubscribe(&self, id: Id, corr_id: Option<String>) -> Result<ScipRequest, ContractError> {
        let target = Target::Function(self.function.name.clone());
        let mut params = Unsubscription::new(target, convert_params(&self.function.inputs));
        params.corr_id = corr_id;
        checked(ScipRequest::Unsubscribe {
            id,
            params,
        })
    }

    /// Binds inputs into a checked query.
    fn build_query(
        &self,
        id: Id,
        values: &[Value],
        options: QueryOptions,
    ) -> Result<ScipRequest, ContractError> {
        let target = Target::Function(self.function.name.clone());
        let bound = create_params(values, &self.function.inputs, Arity::Optional)?;
        checked(ScipRequest::Query {
            id,
            params: query(target, bound, options),
        })
    }
}

// ============================================================================
// SECTION: Event
// ============================================================================

/// Binder for one declared event; events bind against their outputs.
#[derive(Debug, Clone)]
pub struct Event {
    /// Event declaration.
    event: ScdlEvent,
    /// Shared gateway handle.
    gateway: Arc<Gateway>,
}

impl Event {
    /// Returns the event name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.event.name
    }

    /// Returns the event declaration.
    #[must_use]
    pub const fn declaration(&self) -> &ScdlEvent {
        &self.event
    }

    /// Builds an event `Subscribe` request; outputs are all or none.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] on an arity mismatch or malformed options.
    pub fn subscribe_request(
        &self,
        id: impl Into<Id>,
        values: &[Value],
        options: SubscribeOptions,
    ) -> Result<ScipMessage, ContractError> {
        Ok(self.build_subscribe(id.into(), values, options)?.into())
    }

    /// Sends an event `Subscribe` request.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] when building or delivery fails.
    pub fn subscribe(
        &self,
        id: impl Into<Id>,
        values: &[Value],
        options: SubscribeOptions,
    ) -> Result<Value, ContractError> {
        let request = self.build_subscribe(id.into(), values, options)?;
        self.gateway.send(&request, TargetKind::Event, &self.event.name)
    }

    /// Builds an event `Unsubscribe` request from the declared outputs.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::Protocol`] when the correlation id is malformed.
    pub fn unsubscribe_request(
        &self,
        id: impl Into<Id>,
        corr_id: Option<String>,
    ) -> Result<ScipMessage, ContractError> {
        Ok(self.build_unsubscribe(id.into(), corr_id)?.into())
    }

    /// Sends an event `Unsubscribe` request.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] when building or delivery fails.
    pub fn unsubscribe(
        &self,
        id: impl Into<Id>,
        corr_id: Option<String>,
    ) -> Result<Value, ContractError> {
        let request = self.build_unsubscribe(id.into(), corr_id)?;
        self.gateway.send(&request, TargetKind::Event, &self.event.name)
    }

    /// Builds an event `Query` request; outputs are all or none.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] on an arity mismatch or malformed bounds.
    pub fn query_request(
        &self,
        id: impl Into<Id>,
        values: &[Value],
        options: QueryOptions,
    ) -> Result<ScipMessage, ContractError> {
        Ok(self.build_query(id.into(), values, options)?.into())
    }

    /// Sends an event `Query` request.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] when building or delivery fails.
    pub fn query(
        &self,
        id: impl Into<Id>,
        values: &[Value],
        options: QueryOptions,
    ) -> Result<Value, ContractError> {
        let request = self.build_query(id.into(), values, options)?;
        self.gateway.send(&request, TargetKind::Event, &self.event.name)
    }

    /// Binds outputs into a checked subscription.
    fn build_subscribe(
        &self,
        id: Id,
        values: &[Value],
        options: SubscribeOptions,
    ) -> Result<ScipRequest, ContractError> {
        let target = Target::Event(self.event.name.clone());
        let bound = create_params(values, &self.event.outputs, Arity::Optional)?;
        checked(ScipRequest::Subscribe {
            id,
            params: subscription(target, bound, options),
        })
    }

    /// Builds a checked unsubscription from the declared outputs.
    fn build_unsubscribe(&self, id: Id, corr_id: Option<String>) -> Result<ScipRequest, ContractError> {
        let target = Target::Event(self.event.name.clone());
        let mut params = Unsubscription::new(target, convert_params(&self.event.outputs));
        params.corr_id = corr_id;
        checked(ScipRequest::Unsubscribe {
            id,
            params,
        })
    }

    /// Binds outputs into a checked query.
    fn build_query(
        &self,
        id: Id,
        values: &[Value],
        options: QueryOptions,
    ) -> Result<ScipRequest, ContractError> {
        let target = Target::Event(self.event.name.clone());
        let bound = create_params(values, &self.event.outputs, Arity::Optional)?;
        checked(ScipRequest::Query {
            id,
            params: query(target, bound, options),
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Assembles subscription params from options.
fn subscription(
    target: Target,
    params: Vec<Parameter>,
    options: SubscribeOptions,
) -> Subscription {
    let mut subscription = Subscription::new(target, params, options.callback);
    subscription.corr_id = options.corr_id;
    subscription.doc = options.doc;
    subscription.filter = options.filter;
    subscription
}

/// Assembles query params from options.
fn query(target: Target, params: Vec<Parameter>, options: QueryOptions) -> Query {
    let mut query = Query::new(target, params);
    query.filter = options.filter;
    query.start_time = options.start_time;
    query.end_time = options.end_time;
    query
}

/// Runs a built request through the SCIP parser before it is used.
fn checked(request: ScipRequest) -> Result<ScipRequest, ContractError> {
    toolscip_core::parse(&request.to_envelope().to_value())?;
    Ok(request)
}

/// Classifies a decoded gateway response for the audit log.
fn classify_response(response: &Value) -> (RequestState, Option<i64>, Option<String>) {
    match toolscip_core::parse(response) {
        Ok(ScipMessage::Response(ScipResponse::Success { .. } | ScipResponse::QueryResult { .. })) => {
            (RequestState::Succeeded, None, None)
        }
        Ok(ScipMessage::Response(ScipResponse::Callback(_))) => (RequestState::Sent, None, None),
        Ok(ScipMessage::Response(ScipResponse::Error { error, .. })) => {
            let label = error.kind().map_or_else(|| error.message.clone(), |kind| kind.to_string());
            (RequestState::Failed, Some(error.code), Some(label))
        }
        Ok(ScipMessage::Request(request)) => {
            (RequestState::Invalid, None, Some(format!("unexpected {} request", request.method())))
        }
        Err(err) => (RequestState::Invalid, Some(err.code()), Some(err.data().to_string())),
    }
}

/// Stable label for a transport failure.
fn transport_error_label(err: &TransportError) -> String {
    match err {
        TransportError::Client(_) => "client".to_string(),
        TransportError::Endpoint(_) => "endpoint".to_string(),
        TransportError::Request(_) => "request".to_string(),
        TransportError::Status {
            status, ..
        } => format!("status {status}"),
        TransportError::InvalidResponse(_) => "invalid_response".to_string(),
    }
}

/// Serialized size of a JSON value.
fn encoded_len(value: &Value) -> usize {
    serde_json::to_vec(value).map_or(0, |bytes| bytes.len())
}
