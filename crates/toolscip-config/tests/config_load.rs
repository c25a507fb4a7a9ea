//! Config loading and validation tests for toolscip-config.
// crates/toolscip-config/tests/config_load.rs
// =============================================================================
// Module: Config Load Tests
// Description: Load toolscip.toml files and validate limits.
// Purpose: Ensure defaults apply and invalid values fail closed.
// =============================================================================

use std::fs;
use std::path::PathBuf;

use toolscip_config::AuditSinkKind;
use toolscip_config::ConfigError;
use toolscip_config::GatewayConfig;
use toolscip_config::ScipClientConfig;

type TestResult = Result<(), String>;

fn assert_invalid<T>(result: Result<T, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config".to_string()),
    }
}

fn write_config(dir: &tempfile::TempDir, content: &str) -> Result<PathBuf, String> {
    let path = dir.path().join("toolscip.toml");
    fs::write(&path, content).map_err(|err| err.to_string())?;
    Ok(path)
}

#[test]
fn empty_file_yields_defaults() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = write_config(&dir, "")?;
    let config = ScipClientConfig::load(Some(&path)).map_err(|err| err.to_string())?;
    if config != ScipClientConfig::default() {
        return Err("empty config did not match defaults".to_string());
    }
    if config.gateway.timeout_ms != 30_000 || config.gateway.max_response_bytes != 4 * 1024 * 1024 {
        return Err("unexpected gateway defaults".to_string());
    }
    if !config.gateway.allow_http || config.audit.sink != AuditSinkKind::None {
        return Err("unexpected flag defaults".to_string());
    }
    Ok(())
}

#[test]
fn explicit_values_are_loaded() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let log = dir.path().join("scip-audit.jsonl");
    let content = format!(
        "[gateway]\ntimeout_ms = 5000\nuser_agent = \"acme-wallet/2\"\nallow_http = false\n\n\
         [audit]\nsink = \"file\"\npath = \"{}\"\n",
        log.display()
    );
    let path = write_config(&dir, &content)?;
    let config = ScipClientConfig::load(Some(&path)).map_err(|err| err.to_string())?;
    if config.gateway.timeout_ms != 5000 || config.gateway.user_agent != "acme-wallet/2" {
        return Err("gateway values not loaded".to_string());
    }
    if config.gateway.allow_http {
        return Err("allow_http should be false".to_string());
    }
    if config.audit.sink != AuditSinkKind::File || config.audit.path.as_ref() != Some(&log) {
        return Err("audit values not loaded".to_string());
    }
    Ok(())
}

#[test]
fn missing_file_is_io_error() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("absent.toml");
    assert_invalid(ScipClientConfig::load(Some(&path)), "config io error")
}

#[test]
fn malformed_toml_is_parse_error() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = write_config(&dir, "[gateway\ntimeout_ms = 1")?;
    assert_invalid(ScipClientConfig::load(Some(&path)), "config parse error")
}

#[test]
fn non_utf8_file_is_rejected() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("toolscip.toml");
    fs::write(&path, [0xff_u8, 0xfe, 0x00]).map_err(|err| err.to_string())?;
    assert_invalid(ScipClientConfig::load(Some(&path)), "config file must be utf-8")
}

#[test]
fn oversized_file_is_rejected() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let padding = format!("# {}\n", "x".repeat(1024 * 1024));
    let path = write_config(&dir, &padding)?;
    assert_invalid(ScipClientConfig::load(Some(&path)), "config file exceeds size limit")
}

#[test]
fn file_at_size_limit_loads() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let limit = 1024 * 1024;
    let padding = format!("# {}\n", "x".repeat(limit - 3));
    let path = write_config(&dir, &padding)?;
    let config = ScipClientConfig::load(Some(&path)).map_err(|err| err.to_string())?;
    if config != ScipClientConfig::default() {
        return Err("padded config should yield defaults".to_string());
    }

    let path = write_config(&dir, &format!("{padding}\n"))?;
    assert_invalid(ScipClientConfig::load(Some(&path)), "config file exceeds size limit")
}

#[test]
fn timeout_out_of_range_is_rejected() -> TestResult {
    assert_invalid(
        ScipClientConfig::from_toml_str("[gateway]\ntimeout_ms = 50\n"),
        "gateway.timeout_ms must be between",
    )?;
    assert_invalid(
        ScipClientConfig::from_toml_str("[gateway]\ntimeout_ms = 300001\n"),
        "gateway.timeout_ms must be between",
    )
}

#[test]
fn response_cap_limits_are_enforced() -> TestResult {
    let mut config = ScipClientConfig::default();
    config.gateway = GatewayConfig {
        max_response_bytes: 0,
        ..GatewayConfig::default()
    };
    assert_invalid(config.validate(), "gateway.max_response_bytes must be > 0")?;
    config.gateway.max_response_bytes = 65 * 1024 * 1024;
    assert_invalid(config.validate(), "gateway.max_response_bytes exceeds hard limit")
}

#[test]
fn blank_user_agent_is_rejected() -> TestResult {
    assert_invalid(
        ScipClientConfig::from_toml_str("[gateway]\nuser_agent = \"  \"\n"),
        "gateway.user_agent must be non-empty",
    )
}

#[test]
fn file_sink_requires_path() -> TestResult {
    assert_invalid(
        ScipClientConfig::from_toml_str("[audit]\nsink = \"file\"\n"),
        "audit.path is required for the file sink",
    )
}

#[test]
fn unknown_sink_is_parse_error() -> TestResult {
    assert_invalid(ScipClientConfig::from_toml_str("[audit]\nsink = \"syslog\"\n"), "config parse error")
}
