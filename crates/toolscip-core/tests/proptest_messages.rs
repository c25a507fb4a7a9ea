// crates/toolscip-core/tests/proptest_messages.rs
// ============================================================================
// Module: Message Property-Based Tests
// Description: Property tests for message round-trips and error codes.
// Purpose: Detect invariant violations across generated payloads.
// ============================================================================

//! Property-based tests for SCIP message invariants.

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
    reason = "Test-only assertions and helpers are permitted."
)]

use proptest::prelude::*;
use serde_json::Number;
use serde_json::Value;
use serde_json::json;
use toolscip_core::AbstractType;
use toolscip_core::Callback;
use toolscip_core::ErrorObject;
use toolscip_core::Id;
use toolscip_core::Invocation;
use toolscip_core::Occurrence;
use toolscip_core::Parameter;
use toolscip_core::ProtocolError;
use toolscip_core::Query;
use toolscip_core::QueryResult;
use toolscip_core::Subscription;
use toolscip_core::Target;
use toolscip_core::Unsubscription;
use toolscip_core::callback;
use toolscip_core::error;
use toolscip_core::invoke;
use toolscip_core::parse;
use toolscip_core::query_event;
use toolscip_core::query_function;
use toolscip_core::query_result;
use toolscip_core::subscribe_event;
use toolscip_core::subscribe_function;
use toolscip_core::success;
use toolscip_core::unsubscribe_event;
use toolscip_core::unsubscribe_function;

fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[ -~]{0,12}".prop_map(Value::String),
    ]
}

fn type_strategy() -> impl Strategy<Value = AbstractType> {
    prop_oneof![Just("string"), Just("integer"), Just("boolean")].prop_map(AbstractType::new)
}

fn input_strategy() -> impl Strategy<Value = Parameter> {
    ("[a-zA-Z_]{1,8}", type_strategy(), scalar_strategy())
        .prop_map(|(name, kind, value)| Parameter::valued(name, kind, value))
}

fn declared_strategy() -> impl Strategy<Value = Parameter> {
    ("[a-zA-Z_]{1,8}", type_strategy(), proptest::option::of(scalar_strategy())).prop_map(
        |(name, kind, value)| Parameter {
            name,
            abstract_type: Some(kind),
            value,
        },
    )
}

fn reported_strategy() -> impl Strategy<Value = Parameter> {
    ("[a-zA-Z_]{1,8}", proptest::option::of(type_strategy()), scalar_strategy()).prop_map(
        |(name, abstract_type, value)| Parameter {
            name,
            abstract_type,
            value: Some(value),
        },
    )
}

fn id_strategy() -> impl Strategy<Value = Id> {
    prop_oneof![any::<i64>().prop_map(Id::from), "[a-z0-9-]{1,8}".prop_map(Id::from)]
}

fn doc_strategy() -> impl Strategy<Value = Option<Number>> {
    proptest::option::of(prop_oneof![
        (0u8 ..= 100).prop_map(Number::from),
        (0u16 ..= 100).prop_filter_map("finite", |hundredths| Number::from_f64(f64::from(hundredths) / 100.0)),
    ])
}

fn target_strategy() -> impl Strategy<Value = Target> {
    prop_oneof![
        "[a-z][a-zA-Z0-9]{0,10}".prop_map(Target::Function),
        "[A-Z][a-zA-Z0-9]{0,10}".prop_map(Target::Event),
    ]
}

proptest! {
    #[test]
    fn invocation_round_trips(
        id in id_strategy(),
        function_id in "[a-zA-Z][a-zA-Z0-9]{0,10}",
        inputs in prop::collection::vec(input_strategy(), 0 .. 4),
        outputs in prop::collection::vec(declared_strategy(), 0 .. 3),
        corr_id in proptest::option::of("[a-z0-9-]{1,10}"),
        doc in doc_strategy(),
        timeout in proptest::option::of(any::<i64>()),
    ) {
        let mut params = Invocation::new(function_id, inputs, outputs);
        params.corr_id = corr_id;
        params.doc = doc;
        params.timeout = timeout;
        let message = invoke(id, params).unwrap();
        prop_assert_eq!(parse(&message.to_value()).unwrap(), message);
    }

    #[test]
    fn subscription_round_trips(
        target in target_strategy(),
        params in prop::collection::vec(declared_strategy(), 0 .. 4),
        port in 1u16 ..,
        corr_id in proptest::option::of("[a-z0-9-]{1,10}"),
        doc in doc_strategy(),
        filter in proptest::option::of("[ -~]{0,16}"),
    ) {
        let is_event = matches!(target, Target::Event(_));
        let mut params = Subscription::new(target, params, format!("http://localhost:{port}/cb"));
        params.corr_id = corr_id;
        params.doc = doc;
        params.filter = filter;
        let message = if is_event {
            subscribe_event(7, params).unwrap()
        } else {
            subscribe_function(7, params).unwrap()
        };
        prop_assert_eq!(parse(&message.to_value()).unwrap(), message);
    }

    #[test]
    fn unsubscription_round_trips(
        target in target_strategy(),
        params in prop::collection::vec(declared_strategy(), 0 .. 4),
        corr_id in proptest::option::of("[a-z0-9-]{1,10}"),
    ) {
        let is_event = matches!(target, Target::Event(_));
        let mut params = Unsubscription::new(target, params);
        params.corr_id = corr_id;
        let message = if is_event {
            unsubscribe_event("u", params).unwrap()
        } else {
            unsubscribe_function("u", params).unwrap()
        };
        prop_assert_eq!(parse(&message.to_value()).unwrap(), message);
    }

    #[test]
    fn query_round_trips(
        target in target_strategy(),
        params in prop::collection::vec(declared_strategy(), 0 .. 3),
        filter in proptest::option::of("[ -~]{0,16}"),
        start in proptest::option::of("[0-9T:Z-]{1,20}"),
        end in proptest::option::of("[0-9T:Z-]{1,20}"),
    ) {
        let is_event = matches!(target, Target::Event(_));
        let mut params = Query::new(target, params);
        params.filter = filter;
        params.start_time = start;
        params.end_time = end;
        let message = if is_event {
            query_event("q", params).unwrap()
        } else {
            query_function("q", params).unwrap()
        };
        prop_assert_eq!(parse(&message.to_value()).unwrap(), message);
    }

    #[test]
    fn query_result_round_trips(
        id in id_strategy(),
        occurrences in prop::collection::vec(
            (prop::collection::vec(reported_strategy(), 0 .. 3), "[0-9T:Z-]{0,20}"),
            0 .. 3,
        ),
    ) {
        let result = QueryResult {
            occurrences: occurrences
                .into_iter()
                .map(|(params, timestamp)| Occurrence { params, timestamp })
                .collect(),
        };
        let message = query_result(id, result).unwrap();
        prop_assert_eq!(parse(&message.to_value()).unwrap(), message);
    }

    #[test]
    fn callback_round_trips(
        params in prop::collection::vec(reported_strategy(), 0 .. 4),
        timestamp in "[0-9T:Z-]{0,20}",
        corr_id in proptest::option::of("[a-z0-9-]{1,10}"),
    ) {
        let message = callback(Callback { params, timestamp, corr_id }).unwrap();
        prop_assert_eq!(parse(&message.to_value()).unwrap(), message);
    }

    #[test]
    fn opaque_success_round_trips(id in id_strategy(), result in scalar_strategy()) {
        let message = success(id, result);
        prop_assert_eq!(parse(&message.to_value()).unwrap(), message);
    }

    #[test]
    fn error_response_round_trips(
        id in prop_oneof![id_strategy(), Just(Id::Null)],
        code in i64::MIN .. 0,
        message in "[ -~]{0,24}",
        data in proptest::option::of(scalar_strategy()),
    ) {
        let message = error(id, ErrorObject::new(code, message, data)).unwrap();
        prop_assert_eq!(parse(&message.to_value()).unwrap(), message);
    }

    #[test]
    fn error_codes_must_be_negative(code in any::<i64>()) {
        let raw = json!({"jsonrpc": "2.0", "id": 1, "error": {"code": code, "message": "m"}});
        let parsed = parse(&raw);
        if code < 0 {
            prop_assert!(parsed.is_ok());
        } else {
            prop_assert!(matches!(parsed, Err(ProtocolError::Parse(_))));
        }
    }

    #[test]
    fn fractional_error_codes_are_rejected(code in -1.0e6f64 .. -0.001) {
        prop_assume!(code.fract() != 0.0);
        let raw = json!({"jsonrpc": "2.0", "id": 1, "error": {"code": code, "message": "m"}});
        prop_assert!(parse(&raw).is_err());
    }

    #[test]
    fn other_versions_are_rejected(version in "[0-9]\\.[0-9]") {
        prop_assume!(version != "2.0");
        let raw = json!({"jsonrpc": version, "id": 1, "result": "OK"});
        prop_assert!(matches!(parse(&raw), Err(ProtocolError::Parse(_))));
    }
}
