// crates/toolscip-scdl/src/transport.rs
// ============================================================================
// Module: Gateway Transport
// Description: Blocking HTTP POST of SCIP requests to a contract gateway.
// Purpose: Deliver JSON-RPC bodies with strict size and scheme limits.
// Dependencies: reqwest, serde_json, toolscip-config, toolscip-core
// ============================================================================

//! ## Overview
//! [`GatewayTransport`] is the seam between binders and the network. The
//! HTTP implementation issues one bounded POST per request: redirects are
//! never followed, the timeout covers the full request, and response bodies
//! larger than the configured cap fail closed. Retries are not attempted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Read;
use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::blocking::Response;
use reqwest::redirect::Policy;
use serde_json::Value;
use thiserror::Error;
use toolscip_config::GatewayConfig;
use toolscip_core::ScipErrorKind;

/// Maximum number of body bytes kept in a status error.
const STATUS_BODY_PREVIEW: usize = 512;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Transport failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The HTTP client could not be built.
    #[error("gateway client error: {0}")]
    Client(String),
    /// The endpoint URL is malformed or uses a disallowed scheme.
    #[error("invalid gateway endpoint: {0}")]
    Endpoint(String),
    /// The request could not be completed.
    #[error("gateway request failed: {0}")]
    Request(String),
    /// The gateway answered with a non-success status.
    #[error("gateway returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Truncated response body.
        body: String,
    },
    /// The response body was oversized, truncated, or not JSON.
    #[error("invalid gateway response: {0}")]
    InvalidResponse(String),
}

impl TransportError {
    /// Returns the SCIP `Connection Exception` code.
    #[must_use]
    pub const fn code(&self) -> i64 {
        ScipErrorKind::ConnectionException.code()
    }

    /// Returns the SCIP `Connection Exception` message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        ScipErrorKind::ConnectionException.message()
    }

    /// Returns the failure detail.
    #[must_use]
    pub fn data(&self) -> String {
        self.to_string()
    }
}

// ============================================================================
// SECTION: Transport Trait
// ============================================================================

/// Delivers a JSON-RPC request body to a gateway endpoint.
pub trait GatewayTransport: Send + Sync {
    /// Posts `body` to `endpoint` and returns the decoded JSON response.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when delivery fails or the response is unusable.
    fn post(
        &self,
        endpoint: &str,
        body: &Value,
        authorization: Option<&str>,
    ) -> Result<Value, TransportError>;
}

// ============================================================================
// SECTION: HTTP Transport
// ============================================================================

/// Blocking HTTP transport.
///
/// # Invariants
/// - Redirects are not followed.
/// - `allow_http = false` rejects `http://` endpoints before any I/O.
/// - Bodies above `max_response_bytes` are rejected.
pub struct HttpGatewayTransport {
    /// Reusable HTTP client.
    client: Client,
    /// Response body cap in bytes.
    max_response_bytes: usize,
    /// Whether cleartext endpoints are accepted.
    allow_http: bool,
}

impl HttpGatewayTransport {
    /// Builds a transport from gateway configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Client`] when the HTTP client cannot be built.
    pub fn new(config: &GatewayConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .redirect(Policy::none())
            .build()
            .map_err(|err| TransportError::Client(err.to_string()))?;
        Ok(Self {
            client,
            max_response_bytes: config.max_response_bytes,
            allow_http: config.allow_http,
        })
    }

    /// Parses the endpoint and applies the scheme policy.
    fn endpoint_url(&self, endpoint: &str) -> Result<Url, TransportError> {
        let url = Url::parse(endpoint).map_err(|err| TransportError::Endpoint(err.to_string()))?;
        match url.scheme() {
            "https" => Ok(url),
            "http" if self.allow_http => Ok(url),
            "http" => Err(TransportError::Endpoint("cleartext http is disabled".to_string())),
            other => Err(TransportError::Endpoint(format!("unsupported scheme: {other}"))),
        }
    }
}

impl GatewayTransport for HttpGatewayTransport {
    fn post(
        &self,
        endpoint: &str,
        body: &Value,
        authorization: Option<&str>,
    ) -> Result<Value, TransportError> {
        let url = self.endpoint_url(endpoint)?;
        let mut request = self.client.post(url).json(body);
        if let Some(token) = authorization {
            request = request.bearer_auth(token);
        }
        let mut response =
            request.send().map_err(|err| TransportError::Request(err.to_string()))?;
        let status = response.status();
        let bytes = read_response_limited(&mut response, self.max_response_bytes)?;
        if !status.is_success() {
            let preview = &bytes[.. bytes.len().min(STATUS_BODY_PREVIEW)];
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(preview).into_owned(),
            });
        }
        serde_json::from_slice(&bytes)
            .map_err(|err| TransportError::InvalidResponse(format!("body is not json: {err}")))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads the response body while enforcing a byte limit.
fn read_response_limited(
    response: &mut Response,
    max_bytes: usize,
) -> Result<Vec<u8>, TransportError> {
    let expected_len = response.content_length();
    let max_bytes_u64 = u64::try_from(max_bytes)
        .map_err(|_| TransportError::InvalidResponse("size limit exceeds u64".to_string()))?;
    if let Some(expected) = expected_len
        && expected > max_bytes_u64
    {
        return Err(TransportError::InvalidResponse("response exceeds size limit".to_string()));
    }
    let mut buf = Vec::new();
    let mut handle = response.take(max_bytes_u64.saturating_add(1));
    handle
        .read_to_end(&mut buf)
        .map_err(|err| TransportError::InvalidResponse(format!("failed to read body: {err}")))?;
    if buf.len() > max_bytes {
        return Err(TransportError::InvalidResponse("response exceeds size limit".to_string()));
    }
    if let Some(expected) = expected_len {
        let expected = usize::try_from(expected)
            .map_err(|_| TransportError::InvalidResponse("invalid response length".to_string()))?;
        if buf.len() < expected {
            return Err(TransportError::InvalidResponse("response truncated".to_string()));
        }
    }
    Ok(buf)
}
