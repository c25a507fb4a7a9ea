// crates/toolscip-scdl/src/audit.rs
// ============================================================================
// Module: Gateway Audit Logging
// Description: Structured audit events for SCIP requests sent to gateways.
// Purpose: Emit redacted JSON-line records of every gateway exchange.
// Dependencies: serde, serde_json, toolscip-config
// ============================================================================

//! ## Overview
//! One [`GatewayAuditEvent`] is recorded per request a contract sends. Events
//! carry identifiers, sizes, and outcome only; bearer tokens and parameter
//! values are never part of the payload. Sinks route events to stderr, a file,
//! memory, or nowhere.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;
use toolscip_config::AuditConfig;
use toolscip_config::AuditSinkKind;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Outcome of a gateway exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    /// Delivered; the gateway acknowledged without a final outcome.
    Sent,
    /// The gateway answered with a non-error SCIP response.
    Succeeded,
    /// The gateway answered with a SCIP error, or delivery failed.
    Failed,
    /// The gateway answered with something that is not a SCIP message.
    Invalid,
}

/// Gateway request audit event payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GatewayAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// JSON-RPC id of the request.
    pub jsonrpc_id: String,
    /// SCIP method name.
    pub method: &'static str,
    /// `function` or `event`.
    pub target_kind: &'static str,
    /// Target member name.
    pub target: String,
    /// Gateway endpoint.
    pub endpoint: String,
    /// Correlation id when the request carried one.
    pub corr_id: Option<String>,
    /// Exchange outcome.
    pub state: RequestState,
    /// Error code from a SCIP error response or a rejected parse.
    pub error_code: Option<i64>,
    /// Error label.
    pub error_kind: Option<String>,
    /// Serialized request size in bytes.
    pub request_bytes: usize,
    /// Serialized response size in bytes, when a response was decoded.
    pub response_bytes: Option<usize>,
}

/// Inputs required to construct a gateway audit event.
pub struct GatewayAuditEventParams {
    /// JSON-RPC id of the request.
    pub jsonrpc_id: String,
    /// SCIP method name.
    pub method: &'static str,
    /// `function` or `event`.
    pub target_kind: &'static str,
    /// Target member name.
    pub target: String,
    /// Gateway endpoint.
    pub endpoint: String,
    /// Correlation id when present.
    pub corr_id: Option<String>,
    /// Exchange outcome.
    pub state: RequestState,
    /// Error code when present.
    pub error_code: Option<i64>,
    /// Error label when present.
    pub error_kind: Option<String>,
    /// Serialized request size in bytes.
    pub request_bytes: usize,
    /// Serialized response size in bytes.
    pub response_bytes: Option<usize>,
}

impl GatewayAuditEvent {
    /// Creates a new audit event with a consistent timestamp.
    #[must_use]
    pub fn new(params: GatewayAuditEventParams) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: "scip_request",
            timestamp_ms,
            jsonrpc_id: params.jsonrpc_id,
            method: params.method,
            target_kind: params.target_kind,
            target: params.target,
            endpoint: params.endpoint,
            corr_id: params.corr_id,
            state: params.state,
            error_code: params.error_code,
            error_kind: params.error_kind,
            request_bytes: params.request_bytes,
            response_bytes: params.response_bytes,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for gateway request events.
pub trait GatewayAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &GatewayAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl GatewayAuditSink for StderrAuditSink {
    fn record(&self, event: &GatewayAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl GatewayAuditSink for FileAuditSink {
    fn record(&self, event: &GatewayAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl GatewayAuditSink for NoopAuditSink {
    fn record(&self, _event: &GatewayAuditEvent) {}
}

/// Audit sink that keeps events in memory.
#[derive(Default)]
pub struct MemoryAuditSink {
    /// Recorded events in arrival order.
    events: Mutex<Vec<GatewayAuditEvent>>,
}

impl MemoryAuditSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<GatewayAuditEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }
}

impl GatewayAuditSink for MemoryAuditSink {
    fn record(&self, event: &GatewayAuditEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

/// Builds the sink selected by configuration.
///
/// # Errors
///
/// Returns an error when the file sink cannot open its log file.
pub fn sink_from_config(config: &AuditConfig) -> io::Result<Arc<dyn GatewayAuditSink>> {
    match (config.sink, config.path.as_deref()) {
        (AuditSinkKind::None, _) => Ok(Arc::new(NoopAuditSink)),
        (AuditSinkKind::Stderr, _) => Ok(Arc::new(StderrAuditSink)),
        (AuditSinkKind::File, Some(path)) => Ok(Arc::new(FileAuditSink::new(path)?)),
        (AuditSinkKind::File, None) => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "audit.path is required for the file sink",
        )),
    }
}
