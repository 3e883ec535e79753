// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn sample() -> Value {
    Value::object([
        ("value", Value::string("abc123")),
        (
            "grants",
            Value::List(vec![Value::object([("role", Value::string("read"))])]),
        ),
    ])
}

#[test]
fn get_path_follows_attrs_and_indexes() {
    let v = sample();
    let path = Path::root().attr("grants").index(0).attr("role");
    assert_eq!(v.get_path(&path), Some(&Value::string("read")));
    assert_eq!(v.get_path(&Path::root()), Some(&v));
}

#[test]
fn get_path_returns_none_for_missing_steps() {
    let v = sample();
    assert_eq!(v.get_path(&Path::root().attr("missing")), None);
    assert_eq!(v.get_path(&Path::root().attr("grants").index(3)), None);
    assert_eq!(v.get_path(&Path::root().attr("value").index(0)), None);
}

#[test]
fn get_attr_on_non_object_is_null() {
    assert!(Value::string("x").get_attr("a").is_null());
    assert!(sample().get_attr("nope").is_null());
}

#[test]
fn wholly_known_looks_through_collections() {
    let v = Value::object([("a", Value::List(vec![Value::Unknown]))]);
    assert!(v.is_known());
    assert!(!v.is_wholly_known());
}

#[test]
fn path_display_matches_attribute_syntax() {
    let path = Path::root().attr("grants").index(0).attr("role");
    assert_eq!(path.to_string(), ".grants[0].role");
    assert_eq!(path.first_attr(), Some("grants"));
}

#[test]
fn path_prefix() {
    let parent = Path::root().attr("a");
    assert!(Path::root().is_prefix_of(&parent));
    assert!(parent.is_prefix_of(&parent.index(1)));
    assert!(!parent.index(1).is_prefix_of(&parent));
}

#[test]
fn display_renders_strings_quoted() {
    assert_eq!(Value::string("abc").to_string(), "\"abc\"");
    assert_eq!(
        Value::object([("n", Value::number(3))]).to_string(),
        "{n = 3}"
    );
}

#[test]
fn from_json_converts_nested_structures() {
    let json = serde_json::json!({"token": "t", "renewals": 2, "tags": ["a"]});
    let v = Value::from_json(json);
    assert_eq!(v.get_attr("token"), &Value::string("t"));
    assert_eq!(v.get_attr("renewals"), &Value::number(2));
    assert_eq!(
        v.get_attr("tags"),
        &Value::List(vec![Value::string("a")])
    );
}
