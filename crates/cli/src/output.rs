// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for CLI commands

use eph_core::{Diagnostic, Diagnostics, Mark, MarkedValue, Path, Severity, Value};
use std::collections::BTreeMap;
use std::fmt::{Display, Write};

/// Destination named in refusals of the run record
const RECORD: &str = "the run record";

/// Print diagnostics to stderr, errors and warnings alike
pub fn print_diagnostics(diagnostics: &Diagnostics) {
    for diag in diagnostics.iter() {
        eprintln!("{}", format_diagnostic(diag));
    }
}

pub fn format_diagnostic(diag: &Diagnostic) -> String {
    let label = match diag.severity {
        Severity::Error => "Error",
        Severity::Warning => "Warning",
    };
    let mut out = format!("{}: {}", label, diag.summary);
    if let Some(subject) = &diag.subject {
        let _ = write!(out, "\n  on {}", subject);
        if let Some(address) = &diag.address {
            let _ = write!(out, ", in {}", address);
        }
    } else if let Some(address) = &diag.address {
        let _ = write!(out, "\n  in {}", address);
    }
    if let Some(attribute) = diag.attribute.as_ref().filter(|p| !p.is_root()) {
        let _ = write!(out, "\n  attribute {}", attribute);
    }
    if !diag.detail.is_empty() {
        let _ = write!(out, "\n\n{}", diag.detail);
    }
    out.push('\n');
    out
}

/// Render a value, hiding marked parts unless `show_values` is set
///
/// Sensitive takes precedence over ephemeral in the placeholder.
pub fn render(value: &MarkedValue, show_values: bool) -> String {
    let mut out = String::new();
    render_at(value, value.value(), &Path::root(), show_values, &mut out);
    out
}

fn render_at(marked: &MarkedValue, value: &Value, path: &Path, show: bool, out: &mut String) {
    if !show {
        let marks = marked.marks_at(path);
        if marks.contains(&Mark::Sensitive) {
            out.push_str("(sensitive value)");
            return;
        }
        if marks.contains(&Mark::Ephemeral) && !matches!(value, Value::Object(_) | Value::List(_)) {
            out.push_str("(ephemeral value)");
            return;
        }
    }
    match value {
        Value::Object(attrs) => {
            out.push('{');
            for (i, (name, item)) in attrs.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                let _ = write!(out, "{} = ", name);
                render_at(marked, item, &path.attr(name.as_str()), show, out);
            }
            out.push('}');
        }
        Value::List(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                render_at(marked, item, &path.index(i), show, out);
            }
            out.push(']');
        }
        other => {
            let _ = write!(out, "{}", other);
        }
    }
}

/// Render the run record written by `eph open --record`
///
/// The record outlives the run, so a value with any ephemeral part is left
/// out and the refusal is written in its place. Sensitive parts of the
/// remaining values stay redacted.
pub fn render_record<K: Display>(values: &BTreeMap<K, MarkedValue>) -> String {
    let mut out = String::from("# eph run record\n");
    for (addr, value) in values {
        let refused = eph_core::reject_ephemeral(value, RECORD);
        if refused.is_empty() {
            let _ = writeln!(out, "{} = {}", addr, render(value, false));
            continue;
        }
        let _ = writeln!(out, "{} = (not recorded)", addr);
        for diag in refused.iter() {
            let _ = writeln!(out, "  # {}", diag.detail);
        }
    }
    out
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
