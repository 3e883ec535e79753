// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::collections::BTreeMap;
use eph_core::{SourcePos, SourceRange};

fn token() -> MarkedValue {
    MarkedValue::new(Value::object([
        ("prefix", Value::string("tok-")),
        ("value", Value::string("tok-123")),
    ]))
    .mark_path(Path::root().attr("prefix"), Mark::Sensitive)
    .mark(Mark::Ephemeral)
}

#[test]
fn render_redacts_marked_leaves() {
    assert_eq!(
        render(&token(), false),
        "{prefix = (sensitive value), value = (ephemeral value)}"
    );
}

#[test]
fn render_shows_values_on_request() {
    assert_eq!(
        render(&token(), true),
        r#"{prefix = "tok-", value = "tok-123"}"#
    );
}

#[test]
fn render_unmarked_value_as_is() {
    let value = MarkedValue::new(Value::List(vec![Value::number(1), Value::Bool(true)]));
    assert_eq!(render(&value, false), "[1, true]");
}

#[test]
fn diagnostic_shows_location_and_attribute() {
    let diag = Diagnostic::attribute_value(
        Severity::Error,
        "Provider produced invalid ephemeral resource instance",
        "The provider for demo_token produced an inconsistent result.",
        Path::root().attr("value"),
    )
    .with_subject(SourceRange {
        filename: "main.toml".to_string(),
        start: SourcePos {
            line: 7,
            column: 1,
            byte: 80,
        },
        end: SourcePos::default(),
    })
    .with_address("ephemeral.demo_token.t");

    let text = format_diagnostic(&diag);
    assert!(text.starts_with("Error: Provider produced invalid ephemeral resource instance\n"));
    assert!(text.contains("on main.toml:7:1, in ephemeral.demo_token.t"));
    assert!(text.contains("attribute .value"));
    assert!(text.contains("inconsistent result"));
}

#[test]
fn warning_without_subject() {
    let text = format_diagnostic(&Diagnostic::warning("Short lease", ""));
    assert_eq!(text, "Warning: Short lease\n");
}

#[test]
fn record_leaves_out_ephemeral_values() {
    let values = BTreeMap::from([
        ("ephemeral.demo_token.api".to_string(), token()),
        (
            "ephemeral.demo_token.partial".to_string(),
            MarkedValue::new(Value::object([
                ("id", Value::string("lease-1")),
                ("value", Value::string("tok-456")),
            ]))
            .mark_path(Path::root().attr("value"), Mark::Ephemeral),
        ),
    ]);

    let record = render_record(&values);
    assert!(!record.contains("tok-"));
    assert!(!record.contains("lease-1"));
    assert!(record.contains("ephemeral.demo_token.api = (not recorded)\n"));
    assert!(record.contains("  # This value is ephemeral and cannot be written to the run record.\n"));
    assert!(record.contains("ephemeral.demo_token.partial = (not recorded)\n"));
    assert!(record.contains("  # The value at .value is ephemeral and cannot be written to the run record.\n"));
}

#[test]
fn record_keeps_plain_values_and_redacts_sensitive_parts() {
    let values = BTreeMap::from([(
        "ephemeral.demo_token.plain".to_string(),
        MarkedValue::new(Value::object([
            ("id", Value::string("lease-1")),
            ("secret", Value::string("hidden")),
        ]))
        .mark_path(Path::root().attr("secret"), Mark::Sensitive),
    )]);

    assert_eq!(
        render_record(&values),
        "# eph run record\nephemeral.demo_token.plain = {id = \"lease-1\", secret = (sensitive value)}\n"
    );
}
