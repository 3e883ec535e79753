// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Repetition placeholder interpolation

use eph_core::{RepetitionData, Value};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

// Regex pattern for {dotted.name} - this is a constant valid pattern
// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
pub(crate) static VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([a-zA-Z_][a-zA-Z0-9_]*(?:\.[a-zA-Z_][a-zA-Z0-9_]*)*)\}")
        .expect("constant regex pattern is valid")
});

/// Errors from resolving placeholders
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("{reference:?} is only available in a resource that sets {requires}")]
    NotAvailable {
        reference: String,
        requires: &'static str,
    },
    #[error("{reference:?} is a {type_name} and cannot be placed into a string")]
    NotAString {
        reference: String,
        type_name: &'static str,
    },
}

fn lookup(name: &str, data: &RepetitionData) -> Result<Option<Value>, TemplateError> {
    let missing = |requires| TemplateError::NotAvailable {
        reference: name.to_string(),
        requires,
    };
    match name {
        "count.index" => data
            .count_index
            .map(|i| Some(Value::number(i64::from(i))))
            .ok_or_else(|| missing("count")),
        "each.key" => data
            .each_key
            .clone()
            .map(|k| Some(Value::String(k)))
            .ok_or_else(|| missing("for_each")),
        "each.value" => data
            .each_value
            .clone()
            .map(Some)
            .ok_or_else(|| missing("for_each")),
        _ => Ok(None),
    }
}

fn as_fragment(reference: &str, value: &Value) -> Result<Option<String>, TemplateError> {
    match value {
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Null => Ok(Some(String::new())),
        Value::Unknown => Ok(None),
        other => Err(TemplateError::NotAString {
            reference: reference.to_string(),
            type_name: other.type_name(),
        }),
    }
}

/// Resolve `{count.index}`, `{each.key}` and `{each.value}` in a template
///
/// A template that is exactly one placeholder yields the referenced value
/// with its own type; otherwise the result is a string. An unknown
/// referenced value makes the whole result unknown. Other `{names}` are
/// left as-is.
pub fn interpolate(template: &str, data: &RepetitionData) -> Result<Value, TemplateError> {
    if let Some(caps) = VAR_PATTERN.captures(template) {
        if caps[0].len() == template.len() {
            if let Some(value) = lookup(&caps[1], data)? {
                return Ok(value);
            }
        }
    }

    let mut out = String::with_capacity(template.len());
    let mut last = 0;
    for caps in VAR_PATTERN.captures_iter(template) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&template[last..whole.start()]);
        last = whole.end();
        match lookup(&caps[1], data)? {
            Some(value) => match as_fragment(&caps[1], &value)? {
                Some(fragment) => out.push_str(&fragment),
                None => return Ok(Value::Unknown),
            },
            None => out.push_str(whole.as_str()),
        }
    }
    out.push_str(&template[last..]);
    Ok(Value::String(out))
}

/// Interpolate a message for display, falling back to the raw template
pub fn render(template: &str, data: &RepetitionData) -> String {
    match interpolate(template, data) {
        Ok(Value::String(s)) => s,
        Ok(Value::Unknown) | Err(_) => template.to_string(),
        Ok(other) => other.to_string(),
    }
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
