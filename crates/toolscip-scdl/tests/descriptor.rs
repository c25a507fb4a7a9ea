// crates/toolscip-scdl/tests/descriptor.rs
// ============================================================================
// Module: Descriptor Validation Tests
// Description: Schema validation and typed decoding of SCDL descriptors.
// Purpose: Confirm realistic descriptors pass and violations accumulate.
// ============================================================================

//! Descriptor validation tests over the token fixture and broken variants.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use serde_json::json;
use toolscip_scdl::scdl_schema;
use toolscip_scdl::validate_descriptor;

use crate::common::ADDRESS_PATTERN;
use crate::common::token_descriptor;

#[test]
fn token_descriptor_validates() {
    let scdl = validate_descriptor(&token_descriptor()).unwrap();
    assert_eq!(scdl.name, "Token");
    assert!(scdl.is_stateful);
    assert_eq!(scdl.functions.len(), 1);
    assert_eq!(scdl.events.len(), 1);

    let balance_of = &scdl.functions[0];
    assert_eq!(balance_of.name, "balanceOf");
    assert_eq!(balance_of.inputs[0].name, "_owner");
    assert_eq!(balance_of.inputs[0].abstract_type.kind(), "string");
    assert_eq!(balance_of.inputs[0].abstract_type.as_map()["pattern"], ADDRESS_PATTERN);

    let transfer = &scdl.events[0];
    assert_eq!(transfer.outputs.len(), 3);
    assert!(transfer.outputs[0].is_indexed);
    assert!(!transfer.outputs[2].is_indexed);
}

#[test]
fn violations_accumulate() {
    let mut raw = token_descriptor();
    raw["is_stateful"] = json!("yes");
    raw["functions"][0].as_object_mut().unwrap().remove("inputs");
    raw["events"][0]["outputs"][0]["type"] = json!("string");

    let err = validate_descriptor(&raw).unwrap_err();
    assert!(err.errors.len() >= 3, "expected every violation, got {:?}", err.errors);
}

#[test]
fn function_without_name_is_rejected() {
    let raw = json!({"functions": [{"inputs": [], "outputs": []}]});
    let err = validate_descriptor(&raw).unwrap_err();
    assert_eq!(err.errors.len(), 1);
    assert!(err.errors[0].contains("name"));
}

#[test]
fn event_requires_outputs() {
    let raw = json!({"events": [{"name": "Transfer"}]});
    assert!(validate_descriptor(&raw).is_err());
}

#[test]
fn optional_members_default_when_absent() {
    let raw = json!({
        "functions": [{"name": "totalSupply", "inputs": [], "outputs": []}]
    });
    let scdl = validate_descriptor(&raw).unwrap();
    assert_eq!(scdl.scl, "");
    assert!(!scdl.is_stateful);
    assert!(!scdl.functions[0].has_side_effects);
    assert!(scdl.functions[0].events.is_empty());
}

#[test]
fn error_display_joins_violations() {
    let raw = json!({"name": 7, "version": 8});
    let err = validate_descriptor(&raw).unwrap_err();
    assert_eq!(err.errors.len(), 2);
    let rendered = err.to_string();
    assert!(rendered.starts_with("invalid scdl descriptor: "));
    assert!(rendered.contains("; "));
}

#[test]
fn schema_is_an_object_schema() {
    assert_eq!(scdl_schema()["type"], "object");
    assert_eq!(
        scdl_schema()["definitions"]["parameterObj"]["required"],
        json!(["name", "type"])
    );
}
