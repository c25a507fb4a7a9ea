// crates/toolscip-scdl/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: Shared descriptors and gateway doubles for SCDL tests.
// Purpose: Provide one realistic token descriptor and a scripted transport.
// Dependencies: toolscip-scdl, serde_json
// ============================================================================

//! ## Overview
//! The token descriptor mirrors a deployed ERC20 contract with one function
//! (`balanceOf`) and one event (`Transfer`). [`ScriptedTransport`] answers
//! every post with a fixed outcome and remembers what it was sent.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::unwrap_in_result,
    reason = "Test fixtures favor direct unwraps for setup clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Mutex;

use serde_json::Value;
use serde_json::json;
use toolscip_scdl::GatewayTransport;
use toolscip_scdl::TransportError;

// ============================================================================
// SECTION: Descriptors
// ============================================================================

/// Address pattern used by the token descriptor.
pub const ADDRESS_PATTERN: &str = "^0x[a-fA-F0-9]{40}$";

/// Token descriptor pointing at `scl`.
pub fn token_descriptor_at(scl: &str) -> Value {
    let address = json!({"type": "string", "pattern": ADDRESS_PATTERN});
    json!({
        "scdl_version": "1.0",
        "name": "Token",
        "version": "^0.4.18",
        "latest_url": "",
        "author": "0xBfE4aA5c37D223EEBe0A1F7111556Ae49bE0dcD2",
        "description": "Contract token implementation following the ERC20 standars, the new created token is called ZIL",
        "created_on": "Jan-12-2018 09:44:42 AM +UTC",
        "updated_on": "Jan-12-2018 09:44:42 AM +UTC",
        "scl": scl,
        "internal_address": "0x05f4a42e251f2d52b8ed15E9FEdAacFcEF1FAD27",
        "blockchain_type": "ethereum",
        "blockchain_version": "v0.4.18+commit.9cf6e910",
        "metadata": "https://etherscan.io/address/0x05f4a42e251f2d52b8ed15e9fedaacfcef1fad27#code",
        "hash": "b311edaec5a164050cede3219bf28cc6ce4c0ca43b8bf34d6fd309fb60c4d1d8  -",
        "is_stateful": true,
        "lifecycle": "ready",
        "functions": [{
            "name": "balanceOf",
            "description": "",
            "scope": "public",
            "has_side_effects": false,
            "inputs": [{"name": "_owner", "type": address}],
            "outputs": [{"name": "", "type": {"type": "integer", "minimum": 0, "maximum": "2^256 - 1"}}],
            "events": [],
            "dispatcher": ""
        }],
        "events": [{
            "name": "Transfer",
            "description": "Triggered when tokens are transferred",
            "outputs": [
                {"name": "from", "type": address, "is_indexed": true},
                {"name": "to", "type": address, "is_indexed": true},
                {"name": "value", "type": {"type": "integer"}, "is_indexed": false}
            ]
        }]
    })
}

/// Token descriptor with the public gateway endpoint.
pub fn token_descriptor() -> Value {
    token_descriptor_at(
        "https://localhost:3000?blockchain=ethereum&blockchain-id=eth-mainnet&address=0x05f4a42e251f2d52b8ed15E9FEdAacFcEF1FAD27",
    )
}

/// A valid owner address.
pub const OWNER: &str = "0xBfE4aA5c37D223EEBe0A1F7111556Ae49bE0dcD2";

// ============================================================================
// SECTION: Transport Double
// ============================================================================

/// Captured transport call.
#[derive(Debug, Clone, PartialEq)]
pub struct SentRequest {
    /// Endpoint the body was posted to.
    pub endpoint: String,
    /// Posted JSON body.
    pub body: Value,
    /// Bearer token, when one was attached.
    pub authorization: Option<String>,
}

/// Transport that answers every post with one scripted outcome.
pub struct ScriptedTransport {
    /// Outcome returned for each post.
    outcome: Result<Value, TransportError>,
    /// Calls received so far.
    sent: Mutex<Vec<SentRequest>>,
}

impl ScriptedTransport {
    /// Answers every post with `response`.
    pub fn replying(response: Value) -> Self {
        Self {
            outcome: Ok(response),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Fails every post with `error`.
    pub fn failing(error: TransportError) -> Self {
        Self {
            outcome: Err(error),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Returns the calls received so far.
    pub fn sent(&self) -> Vec<SentRequest> {
        self.sent.lock().unwrap().clone()
    }
}

impl GatewayTransport for ScriptedTransport {
    fn post(
        &self,
        endpoint: &str,
        body: &Value,
        authorization: Option<&str>,
    ) -> Result<Value, TransportError> {
        self.sent.lock().unwrap().push(SentRequest {
            endpoint: endpoint.to_string(),
            body: body.clone(),
            authorization: authorization.map(str::to_string),
        });
        self.outcome.clone()
    }
}
