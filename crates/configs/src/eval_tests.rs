// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use eph_core::{Attribute, SourcePos, SourceRange};

fn range(line: usize) -> SourceRange {
    SourceRange {
        filename: "main.toml".to_string(),
        start: SourcePos {
            line,
            column: 1,
            byte: 0,
        },
        end: SourcePos::default(),
    }
}

fn token_schema() -> Schema {
    Schema::new()
        .attribute("prefix", Attribute::optional(AttrType::String))
        .attribute("value", Attribute::optional_computed(AttrType::String))
        .attribute("ttl_seconds", Attribute::optional(AttrType::Number))
        .attribute("renewals", Attribute::computed(AttrType::Number))
}

fn body(attrs: Vec<(&str, Expr)>) -> ConfigBody {
    attrs
        .into_iter()
        .enumerate()
        .fold(ConfigBody::new(range(1)), |body, (i, (name, expr))| {
            body.with_attribute(name, expr, range(i + 2))
        })
}

fn lit(v: impl Into<Value>) -> Expr {
    Expr::Literal(v.into())
}

#[test]
fn empty_body_yields_every_attribute_as_null() {
    let (value, diags) = evaluate_body(&body(vec![]), &token_schema(), &RepetitionData::default());
    assert!(diags.is_empty());
    assert_eq!(
        value.value(),
        &Value::object([
            ("prefix", Value::Null),
            ("renewals", Value::Null),
            ("ttl_seconds", Value::Null),
            ("value", Value::Null),
        ])
    );
}

#[test]
fn template_uses_count_index() {
    let data = RepetitionData {
        count_index: Some(1),
        ..Default::default()
    };
    let (value, diags) = evaluate_body(
        &body(vec![("prefix", Expr::Template("tok-{count.index}-".into()))]),
        &token_schema(),
        &data,
    );
    assert!(diags.is_empty());
    assert_eq!(value.value().get_attr("prefix"), &Value::string("tok-1-"));
}

#[test]
fn unsupported_argument_points_at_its_range() {
    let (_, diags) = evaluate_body(
        &body(vec![("colour", lit("blue"))]),
        &token_schema(),
        &RepetitionData::default(),
    );
    let diag = diags.iter().next().unwrap();
    assert_eq!(diag.summary, "Unsupported argument");
    assert_eq!(diag.attribute, Some(Path::root().attr("colour")));
    assert_eq!(diag.subject.as_ref().unwrap().start.line, 2);
}

#[test]
fn missing_required_argument_points_at_body() {
    let schema = Schema::new().attribute("value", Attribute::required(AttrType::String));
    let (_, diags) = evaluate_body(&body(vec![]), &schema, &RepetitionData::default());
    let diag = diags.iter().next().unwrap();
    assert_eq!(diag.summary, "Missing required argument");
    assert_eq!(diag.subject, Some(range(1)));
}

#[test]
fn computed_only_attribute_cannot_be_set() {
    let (value, diags) = evaluate_body(
        &body(vec![("renewals", lit(Value::number(3)))]),
        &token_schema(),
        &RepetitionData::default(),
    );
    assert!(diags.has_errors());
    assert_eq!(
        diags.iter().next().unwrap().summary,
        "Value for unconfigurable attribute"
    );
    assert_eq!(value.value().get_attr("renewals"), &Value::Null);
}

#[test]
fn numeric_string_converts_to_number() {
    let (value, diags) = evaluate_body(
        &body(vec![("ttl_seconds", lit("30"))]),
        &token_schema(),
        &RepetitionData::default(),
    );
    assert!(diags.is_empty());
    assert_eq!(value.value().get_attr("ttl_seconds"), &Value::number(30));
}

#[test]
fn wrong_type_is_reported() {
    let (_, diags) = evaluate_body(
        &body(vec![("ttl_seconds", lit(true))]),
        &token_schema(),
        &RepetitionData::default(),
    );
    let diag = diags.iter().next().unwrap();
    assert_eq!(diag.summary, "Incorrect attribute value type");
    assert!(diag.detail.contains("a number is required"));
}

#[test]
fn sensitive_wrapper_marks_attribute() {
    let (value, diags) = evaluate_body(
        &body(vec![("prefix", Expr::Sensitive(Box::new(lit("p-"))))]),
        &token_schema(),
        &RepetitionData::default(),
    );
    assert!(diags.is_empty());
    assert!(value
        .marks_at(&Path::root().attr("prefix"))
        .contains(&Mark::Sensitive));
    assert!(value.marks_at(&Path::root().attr("value")).is_empty());
}

#[test]
fn schema_sensitive_attribute_is_marked() {
    let schema = Schema::new().attribute(
        "password",
        Attribute::optional(AttrType::String).sensitive(),
    );
    let (value, _) = evaluate_body(&body(vec![]), &schema, &RepetitionData::default());
    assert!(value
        .marks_at(&Path::root().attr("password"))
        .contains(&Mark::Sensitive));
}

#[test]
fn bad_reference_is_reported_once() {
    let schema = Schema::new().attribute("value", Attribute::required(AttrType::String));
    let (value, diags) = evaluate_body(
        &body(vec![("value", Expr::Template("{count.index}".into()))]),
        &schema,
        &RepetitionData::default(),
    );
    assert_eq!(diags.len(), 1);
    assert_eq!(diags.iter().next().unwrap().summary, "Invalid reference");
    assert_eq!(value.value().get_attr("value"), &Value::Unknown);
}

#[test]
fn nested_single_block_is_checked() {
    let schema = Schema::new().block(
        "lease",
        NestingMode::Single,
        Schema::new().attribute("ttl", Attribute::required(AttrType::Number)),
    );
    let nested = Expr::Object([("ttl".to_string(), lit("x"))].into_iter().collect());
    let (_, diags) = evaluate_body(
        &body(vec![("lease", nested)]),
        &schema,
        &RepetitionData::default(),
    );
    let diag = diags.iter().next().unwrap();
    assert_eq!(
        diag.attribute,
        Some(Path::root().attr("lease").attr("ttl"))
    );
    assert_eq!(diag.subject.as_ref().unwrap().start.line, 2);
}

#[test]
fn absent_list_block_is_empty_list() {
    let schema = Schema::new().block("scope", NestingMode::List, Schema::new());
    let (value, diags) = evaluate_body(&body(vec![]), &schema, &RepetitionData::default());
    assert!(diags.is_empty());
    assert_eq!(value.value().get_attr("scope"), &Value::List(vec![]));
}

#[test]
fn equality_compares_numbers_and_strings_loosely() {
    let data = RepetitionData {
        count_index: Some(3),
        ..Default::default()
    };
    let expr = Expr::NotEqual(
        Box::new(Expr::Template("{count.index}".into())),
        Box::new(lit("3")),
    );
    assert_eq!(evaluate_expr(&expr, &data).unwrap().value(), &Value::Bool(false));
}

#[test]
fn comparison_with_unknown_is_unknown() {
    let expr = Expr::Equal(Box::new(Expr::Unknown), Box::new(lit("a")));
    assert_eq!(
        evaluate_expr(&expr, &RepetitionData::default()).unwrap().value(),
        &Value::Unknown
    );
}

#[test]
fn comparison_keeps_operand_marks() {
    let expr = Expr::Equal(
        Box::new(Expr::Sensitive(Box::new(lit("a")))),
        Box::new(lit("a")),
    );
    let result = evaluate_expr(&expr, &RepetitionData::default()).unwrap();
    assert_eq!(result.value(), &Value::Bool(true));
    assert!(result.is_wholly_marked(Mark::Sensitive));
}
