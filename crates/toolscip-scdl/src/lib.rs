// crates/toolscip-scdl/src/lib.rs
// ============================================================================
// Module: Toolscip SCDL Library
// Description: SCDL descriptor validation and SCIP request binding.
// Purpose: Turn a contract descriptor plus positional values into SCIP calls.
// Dependencies: toolscip-core, toolscip-config, jsonschema, reqwest, serde
// ============================================================================

//! ## Overview
//! A raw SCDL descriptor is validated once against the embedded schema and
//! becomes a [`Contract`]. The contract exposes one [`Method`] per declared
//! function and one [`Event`] per declared event. Each binder turns
//! positional JSON values into a SCIP request and posts it to the
//! descriptor's `scl` endpoint through a [`GatewayTransport`].
//!
//! Every send is recorded on a [`GatewayAuditSink`] as one JSON line; bearer
//! tokens and parameter values never reach the audit log.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod binding;
pub mod contract;
pub mod descriptor;
pub mod transport;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::FileAuditSink;
pub use audit::GatewayAuditEvent;
pub use audit::GatewayAuditEventParams;
pub use audit::GatewayAuditSink;
pub use audit::MemoryAuditSink;
pub use audit::NoopAuditSink;
pub use audit::RequestState;
pub use audit::StderrAuditSink;
pub use audit::sink_from_config;
pub use binding::Arity;
pub use binding::BindingError;
pub use binding::convert_params;
pub use binding::create_params;
pub use contract::Contract;
pub use contract::ContractError;
pub use contract::Event;
pub use contract::InvokeOptions;
pub use contract::Method;
pub use contract::QueryOptions;
pub use contract::SubscribeOptions;
pub use descriptor::Scdl;
pub use descriptor::ScdlEvent;
pub use descriptor::ScdlFunction;
pub use descriptor::ScdlParameter;
pub use descriptor::ValidationError;
pub use descriptor::scdl_schema;
pub use descriptor::validate_descriptor;
pub use transport::GatewayTransport;
pub use transport::HttpGatewayTransport;
pub use transport::TransportError;
