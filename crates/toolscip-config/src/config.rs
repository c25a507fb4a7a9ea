// crates/toolscip-config/src/config.rs
// ============================================================================
// Module: Toolscip Configuration
// Description: Configuration loading and validation for SCIP clients.
// Purpose: Provide strict config parsing with hard limits.
// Dependencies: serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Every section is optional and falls back to its defaults; values that are
//! present are range-checked by [`ScipClientConfig::validate`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "toolscip.toml";
/// Environment variable used for config path override.
pub const CONFIG_ENV_VAR: &str = "TOOLSCIP_CONFIG";
/// Maximum size of a config file in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default gateway request timeout in milliseconds.
pub(crate) const DEFAULT_GATEWAY_TIMEOUT_MS: u64 = 30_000;
/// Minimum gateway request timeout in milliseconds.
pub(crate) const MIN_GATEWAY_TIMEOUT_MS: u64 = 100;
/// Maximum gateway request timeout in milliseconds.
pub(crate) const MAX_GATEWAY_TIMEOUT_MS: u64 = 300_000;
/// Default cap on gateway response bodies.
pub(crate) const DEFAULT_MAX_RESPONSE_BYTES: usize = 4 * 1024 * 1024;
/// Maximum configurable cap on gateway response bodies.
pub(crate) const MAX_MAX_RESPONSE_BYTES: usize = 64 * 1024 * 1024;
/// Maximum user agent length.
pub(crate) const MAX_USER_AGENT_LENGTH: usize = 256;

// ============================================================================
// SECTION: Root Config
// ============================================================================

/// Client configuration for SCIP gateway access.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScipClientConfig {
    /// Gateway transport configuration.
    #[serde(default)]
    pub gateway: GatewayConfig,
    /// Request audit configuration.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl ScipClientConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// Resolution order: explicit `path`, then the `TOOLSCIP_CONFIG`
    /// environment variable, then `toolscip.toml` in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = read_config_limited(&resolved)?;
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gateway.validate()?;
        self.audit.validate()?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Gateway Config
// ============================================================================

/// Gateway transport configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Whole-request timeout in milliseconds.
    #[serde(default = "default_gateway_timeout_ms")]
    pub timeout_ms: u64,
    /// Maximum accepted response body size in bytes.
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: usize,
    /// User agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Allow cleartext `http://` gateway endpoints.
    #[serde(default = "default_allow_http")]
    pub allow_http: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_gateway_timeout_ms(),
            max_response_bytes: default_max_response_bytes(),
            user_agent: default_user_agent(),
            allow_http: default_allow_http(),
        }
    }
}

impl GatewayConfig {
    /// Validates gateway transport limits.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_GATEWAY_TIMEOUT_MS ..= MAX_GATEWAY_TIMEOUT_MS).contains(&self.timeout_ms) {
            return Err(ConfigError::Invalid(format!(
                "gateway.timeout_ms must be between {MIN_GATEWAY_TIMEOUT_MS} and \
                 {MAX_GATEWAY_TIMEOUT_MS}"
            )));
        }
        if self.max_response_bytes == 0 {
            return Err(ConfigError::Invalid("gateway.max_response_bytes must be > 0".to_string()));
        }
        if self.max_response_bytes > MAX_MAX_RESPONSE_BYTES {
            return Err(ConfigError::Invalid(
                "gateway.max_response_bytes exceeds hard limit".to_string(),
            ));
        }
        let user_agent = self.user_agent.trim();
        if user_agent.is_empty() {
            return Err(ConfigError::Invalid("gateway.user_agent must be non-empty".to_string()));
        }
        if user_agent.len() > MAX_USER_AGENT_LENGTH {
            return Err(ConfigError::Invalid("gateway.user_agent exceeds max length".to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Audit Config
// ============================================================================

/// Audit sink selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// Discard audit events.
    #[default]
    None,
    /// JSON lines on stderr.
    Stderr,
    /// JSON lines appended to a file.
    File,
}

/// Request audit configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Selected sink.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Log file path; required for the file sink.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl AuditConfig {
    /// Validates audit sink selection.
    fn validate(&self) -> Result<(), ConfigError> {
        match (&self.sink, &self.path) {
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.path is required for the file sink".to_string()))
            }
            (_, Some(path)) => validate_path_string("audit.path", &path.to_string_lossy()),
            _ => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from an explicit path, the environment, or the default.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Reads the config file, refusing anything above the size limit.
fn read_config_limited(path: &Path) -> Result<Vec<u8>, ConfigError> {
    let file = File::open(path).map_err(|err| ConfigError::Io(err.to_string()))?;
    let limit = u64::try_from(MAX_CONFIG_FILE_SIZE)
        .map_err(|_| ConfigError::Invalid("size limit exceeds u64".to_string()))?;
    if file.metadata().map_err(|err| ConfigError::Io(err.to_string()))?.len() > limit {
        return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
    }
    let mut bytes = Vec::new();
    file.take(limit.saturating_add(1))
        .read_to_end(&mut bytes)
        .map_err(|err| ConfigError::Io(err.to_string()))?;
    if bytes.len() > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
    }
    Ok(bytes)
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().to_string_lossy().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} component too long")));
        }
    }
    Ok(())
}

/// Default gateway timeout.
const fn default_gateway_timeout_ms() -> u64 {
    DEFAULT_GATEWAY_TIMEOUT_MS
}

/// Default response size cap.
const fn default_max_response_bytes() -> usize {
    DEFAULT_MAX_RESPONSE_BYTES
}

/// Default user agent, tagged with the crate version.
fn default_user_agent() -> String {
    format!("toolscip/{}", env!("CARGO_PKG_VERSION"))
}

/// Cleartext endpoints are allowed by default for local gateways.
const fn default_allow_http() -> bool {
    true
}
