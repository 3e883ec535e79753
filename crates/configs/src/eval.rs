// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Evaluation of configuration bodies against a schema

use crate::template::{interpolate, TemplateError};
use eph_core::{
    AttrType, ConfigBody, Diagnostic, Diagnostics, Expr, Mark, MarkedValue, NestingMode, Path,
    PathMarks, RepetitionData, Schema, Severity, Value,
};
use std::collections::BTreeMap;

/// Evaluate a single expression for one instance
///
/// `{ sensitive = ... }` wrappers become Sensitive marks on the result.
pub fn evaluate_expr(expr: &Expr, data: &RepetitionData) -> Result<MarkedValue, TemplateError> {
    let mut marks = PathMarks::new();
    let value = eval(expr, data, &Path::root(), &mut marks)?;
    Ok(MarkedValue::new(value).mark_with_paths(&marks))
}

/// Evaluate a `config` body into an object conforming to `schema`
///
/// The result always has every schema attribute (null when unset) and every
/// nested block, so it can be compared attribute by attribute with what the
/// provider returns. Attributes the schema declares sensitive are marked.
pub fn evaluate_body(
    body: &ConfigBody,
    schema: &Schema,
    data: &RepetitionData,
) -> (MarkedValue, Diagnostics) {
    let mut diags = Diagnostics::new();
    let mut marks = PathMarks::new();
    let mut attrs = BTreeMap::new();

    for (name, attr) in &body.attributes {
        let path = Path::root().attr(name);
        match eval(&attr.expr, data, &path, &mut marks) {
            Ok(value) => {
                attrs.insert(name.clone(), value);
            }
            Err(e) => {
                diags.push(
                    Diagnostic::attribute_value(
                        Severity::Error,
                        "Invalid reference",
                        e.to_string(),
                        path,
                    )
                    .with_subject(attr.range.clone()),
                );
                attrs.insert(name.clone(), Value::Unknown);
            }
        }
    }

    let mut problems = Vec::new();
    let value = conform(attrs, schema, &Path::root(), &mut marks, &mut problems);
    for problem in problems {
        let subject = problem
            .path
            .first_attr()
            .and_then(|name| body.attribute_range(name))
            .unwrap_or(&body.range)
            .clone();
        diags.push(
            Diagnostic::attribute_value(
                Severity::Error,
                problem.summary,
                problem.detail,
                problem.path,
            )
            .with_subject(subject),
        );
    }

    (MarkedValue::new(value).mark_with_paths(&marks), diags)
}

struct Problem {
    path: Path,
    summary: &'static str,
    detail: String,
}

fn eval(
    expr: &Expr,
    data: &RepetitionData,
    path: &Path,
    marks: &mut PathMarks,
) -> Result<Value, TemplateError> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Template(template) => interpolate(template, data),
        Expr::Sensitive(inner) => {
            let value = eval(inner, data, path, marks)?;
            marks.insert(path.clone(), Mark::Sensitive);
            Ok(value)
        }
        Expr::Unknown => Ok(Value::Unknown),
        Expr::List(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| eval(item, data, &path.index(i), marks))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List),
        Expr::Object(attrs) => attrs
            .iter()
            .map(|(name, item)| Ok((name.clone(), eval(item, data, &path.attr(name), marks)?)))
            .collect::<Result<BTreeMap<_, _>, _>>()
            .map(Value::Object),
        Expr::Equal(a, b) => compare(a, b, data, path, marks, true),
        Expr::NotEqual(a, b) => compare(a, b, data, path, marks, false),
    }
}

fn compare(
    a: &Expr,
    b: &Expr,
    data: &RepetitionData,
    path: &Path,
    marks: &mut PathMarks,
    want_equal: bool,
) -> Result<Value, TemplateError> {
    // marks on either operand carry over to the comparison result
    let mut operand_marks = PathMarks::new();
    let a = eval(a, data, &Path::root(), &mut operand_marks)?;
    let b = eval(b, data, &Path::root(), &mut operand_marks)?;
    for (_, set) in operand_marks.iter() {
        for mark in set {
            marks.insert(path.clone(), *mark);
        }
    }
    if !a.is_wholly_known() || !b.is_wholly_known() {
        return Ok(Value::Unknown);
    }
    Ok(Value::Bool(loosely_equal(&a, &b) == want_equal))
}

/// Primitive values compare by their string form across types
fn loosely_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::String(s), Value::Number(n)) | (Value::Number(n), Value::String(s)) => {
            *s == n.to_string()
        }
        (Value::String(s), Value::Bool(x)) | (Value::Bool(x), Value::String(s)) => {
            *s == x.to_string()
        }
        _ => a == b,
    }
}

fn conform(
    mut attrs: BTreeMap<String, Value>,
    schema: &Schema,
    path: &Path,
    marks: &mut PathMarks,
    problems: &mut Vec<Problem>,
) -> Value {
    for name in attrs.keys() {
        if !schema.attributes.contains_key(name) && !schema.blocks.contains_key(name) {
            problems.push(Problem {
                path: path.attr(name),
                summary: "Unsupported argument",
                detail: format!("An argument named {:?} is not expected here.", name),
            });
        }
    }

    let mut out = BTreeMap::new();
    for (name, attr) in &schema.attributes {
        let attr_path = path.attr(name);
        let value = attrs.remove(name).unwrap_or_default();
        if attr.sensitive {
            marks.insert(attr_path.clone(), Mark::Sensitive);
        }
        if attr.is_computed_only() && !value.is_null() {
            problems.push(Problem {
                path: attr_path,
                summary: "Value for unconfigurable attribute",
                detail: format!(
                    "Can't configure a value for {:?}: its value will be decided automatically by the provider.",
                    name
                ),
            });
            out.insert(name.clone(), Value::Null);
            continue;
        }
        if attr.required && value.is_null() {
            problems.push(Problem {
                path: attr_path.clone(),
                summary: "Missing required argument",
                detail: format!(
                    "The argument {:?} is required, but no definition was found.",
                    name
                ),
            });
        }
        match convert(value, &attr.ty) {
            Ok(value) => {
                out.insert(name.clone(), value);
            }
            Err(msg) => {
                problems.push(Problem {
                    path: attr_path,
                    summary: "Incorrect attribute value type",
                    detail: format!("Inappropriate value for attribute {:?}: {}.", name, msg),
                });
                out.insert(name.clone(), Value::Null);
            }
        }
    }

    for (name, nested) in &schema.blocks {
        let block_path = path.attr(name);
        let value = attrs.remove(name).unwrap_or_default();
        let block_value = match (nested.nesting, value) {
            (_, Value::Unknown) => Value::Unknown,
            (NestingMode::Single, Value::Null) => Value::Null,
            (NestingMode::Single, Value::Object(inner)) => {
                conform(inner, &nested.block, &block_path, marks, problems)
            }
            (NestingMode::List, Value::Null) => Value::List(Vec::new()),
            (NestingMode::List, Value::List(items)) => Value::List(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, item)| match item {
                        Value::Object(inner) => {
                            conform(inner, &nested.block, &block_path.index(i), marks, problems)
                        }
                        Value::Unknown => Value::Unknown,
                        other => {
                            problems.push(unsupported_block(block_path.index(i), name, &other));
                            Value::Null
                        }
                    })
                    .collect(),
            ),
            (nesting, other) => {
                problems.push(unsupported_block(block_path, name, &other));
                match nesting {
                    NestingMode::Single => Value::Null,
                    NestingMode::List => Value::List(Vec::new()),
                }
            }
        };
        out.insert(name.clone(), block_value);
    }

    Value::Object(out)
}

fn unsupported_block(path: Path, name: &str, value: &Value) -> Problem {
    Problem {
        path,
        summary: "Unsupported block type",
        detail: format!(
            "Blocks of type {:?} must be written as tables, got {}.",
            name,
            value.type_name()
        ),
    }
}

fn describe(ty: &AttrType) -> &'static str {
    match ty {
        AttrType::String => "a string",
        AttrType::Number => "a number",
        AttrType::Bool => "a bool",
        AttrType::List(_) => "a list",
        AttrType::Map(_) => "a map",
        AttrType::Object(_) => "an object",
        AttrType::Dynamic => "any value",
    }
}

/// Convert a value to an attribute type, applying the usual primitive
/// conversions (number and bool to string, numeric strings to number)
fn convert(value: Value, ty: &AttrType) -> Result<Value, String> {
    match (ty, value) {
        (_, value @ (Value::Null | Value::Unknown)) => Ok(value),
        (AttrType::Dynamic, value) => Ok(value),
        (AttrType::String, Value::String(s)) => Ok(Value::String(s)),
        (AttrType::String, Value::Number(n)) => Ok(Value::String(n.to_string())),
        (AttrType::String, Value::Bool(b)) => Ok(Value::String(b.to_string())),
        (AttrType::Number, Value::Number(n)) => Ok(Value::Number(n)),
        (AttrType::Number, Value::String(s)) => s
            .parse::<serde_json::Number>()
            .map(Value::Number)
            .map_err(|_| format!("a number is required, got {:?}", s)),
        (AttrType::Bool, Value::Bool(b)) => Ok(Value::Bool(b)),
        (AttrType::Bool, Value::String(s)) if s == "true" || s == "false" => {
            Ok(Value::Bool(s == "true"))
        }
        (AttrType::List(elem), Value::List(items)) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| convert(item, elem).map_err(|e| format!("element {}: {}", i, e)))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List),
        (AttrType::Map(elem), Value::Object(attrs)) => attrs
            .into_iter()
            .map(|(k, v)| {
                let v = convert(v, elem).map_err(|e| format!("element {:?}: {}", k, e))?;
                Ok((k, v))
            })
            .collect::<Result<BTreeMap<_, _>, String>>()
            .map(Value::Object),
        (AttrType::Object(fields), Value::Object(mut attrs)) => {
            if let Some(extra) = attrs.keys().find(|k| !fields.contains_key(*k)) {
                return Err(format!("attribute {:?} is not expected", extra));
            }
            fields
                .iter()
                .map(|(name, field_ty)| {
                    let v = attrs.remove(name).unwrap_or_default();
                    let v = convert(v, field_ty)
                        .map_err(|e| format!("attribute {:?}: {}", name, e))?;
                    Ok((name.clone(), v))
                })
                .collect::<Result<BTreeMap<_, _>, String>>()
                .map(Value::Object)
        }
        (ty, other) => Err(format!("{} is required, got {}", describe(ty), other.type_name())),
    }
}

#[cfg(test)]
#[path = "eval_tests.rs"]
mod tests;
